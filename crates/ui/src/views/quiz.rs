use dioxus::prelude::*;

use quiz_core::model::Difficulty;
use services::SessionState;

use crate::context::AppContext;
use crate::vm::{
    accuracy_display, map_answer_rows, map_feedback, map_option_texts, performance_message,
};

#[component]
pub fn QuizView() -> Element {
    let session = use_context::<Signal<SessionState>>();

    let snapshot = session.read();
    let phase = snapshot
        .quiz()
        .map(|quiz| (quiz.is_complete(), quiz.question_number()));
    drop(snapshot);

    match phase {
        None => rsx! { StartPanel {} },
        Some((true, _)) => rsx! { ResultPanel {} },
        Some((false, number)) => rsx! { QuestionPanel { key: "{number}" } },
    }
}

//
// ─── START ─────────────────────────────────────────────────────────────────────
//

#[component]
fn StartPanel() -> Element {
    let ctx = use_context::<AppContext>();
    let session = use_context::<Signal<SessionState>>();
    let mut difficulty = use_signal(|| Difficulty::Normal);
    let mut failed = use_signal(|| false);
    let mut loading = use_signal(|| false);

    let flow = ctx.quiz_flow();
    let settings = ctx.settings();
    let quiz_info = format!(
        "{} questions · {} points each",
        settings.questions_per_quiz(),
        settings.points_per_correct()
    );

    rsx! {
        div { class: "quiz-start",
            h2 { "🎮 Start a quiz" }

            div { class: "form-row",
                label { "Difficulty" }
                select {
                    onchange: move |evt| {
                        difficulty
                            .set(Difficulty::from_label(&evt.value()).unwrap_or(Difficulty::Normal));
                    },
                    for level in Difficulty::ALL {
                        option { value: "{level}", selected: level == difficulty(), "{level}" }
                    }
                }
                p { class: "hint", "{quiz_info}" }
            }

            button {
                disabled: loading(),
                onclick: move |_| {
                    if loading() {
                        return;
                    }
                    let flow = flow.clone();
                    let mut session = session;
                    spawn(async move {
                        loading.set(true);
                        let mut working = session();
                        match flow.start(&mut working, difficulty()).await {
                            Ok(()) => failed.set(false),
                            Err(_) => failed.set(true),
                        }
                        session.set(working);
                        loading.set(false);
                    });
                },
                if loading() { "Generating questions..." } else { "Start quiz!" }
            }

            if failed() {
                div { class: "error-panel",
                    p { class: "error", "💥 Question generation failed!" }
                    p { "Please check the following and press the button again:" }
                    ul {
                        li { "the AI API key is set correctly" }
                        li { "your internet connection is up" }
                        li { "your API quota is not exhausted" }
                    }
                }
            }

            if !ctx.questions_enabled() {
                div { class: "setup-hint",
                    h3 { "🔑 An AI API key is required" }
                    p { "Quizzes cannot start until QUIZ_AI_API_KEY is set." }
                }
            }
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

#[component]
fn QuestionPanel() -> Element {
    let ctx = use_context::<AppContext>();
    let mut session = use_context::<Signal<SessionState>>();
    let mut selected = use_signal(|| None::<usize>);
    let mut error = use_signal(|| None::<String>);

    let flow = ctx.quiz_flow();

    let snapshot = session.read();
    let Some(quiz) = snapshot.quiz() else {
        return rsx! {};
    };
    let Some(question) = quiz.current_question() else {
        return rsx! {};
    };
    let prompt = question.prompt().to_string();
    let option_texts = map_option_texts(question);
    let number = quiz.question_number();
    let total = quiz.total_questions();
    let score = quiz.score();
    let feedback = if snapshot.show_last_answer() {
        quiz.last_answer().map(map_feedback)
    } else {
        None
    };
    drop(snapshot);

    let feedback_panel = feedback.map(|vm| {
        rsx! {
            div { class: if vm.is_correct { "feedback correct" } else { "feedback wrong" },
                if vm.is_correct {
                    p { "Correct! 🎉" }
                } else {
                    p { "Wrong. 😢 The answer was {vm.correct_answer}" }
                }
                p { class: "explanation", "Explanation: {vm.explanation}" }
            }
        }
    });

    rsx! {
        div { class: "quiz-question",
            p { class: "progress", "Question {number} / {total}" }
            div { class: "score-banner", "Current score: {score}" }

            {feedback_panel}

            h2 { class: "prompt", "{prompt}" }

            div { class: "options",
                for (index, text) in option_texts.into_iter().enumerate() {
                    button {
                        class: if selected() == Some(index) { "option selected" } else { "option" },
                        onclick: move |_| {
                            selected.set(Some(index));
                            session.write().take_show_last_answer();
                        },
                        "{text}"
                    }
                }
            }

            button {
                class: "submit",
                disabled: selected().is_none(),
                onclick: move |_| {
                    let Some(choice) = selected() else {
                        return;
                    };
                    let flow = flow.clone();
                    spawn(async move {
                        let mut working = session();
                        match flow.answer_current(&mut working, choice).await {
                            Ok(_) => error.set(None),
                            Err(err) => error.set(Some(err.to_string())),
                        }
                        session.set(working);
                    });
                },
                "Submit answer"
            }

            if let Some(message) = error() {
                p { class: "error", "{message}" }
            }
        }
    }
}

//
// ─── RESULT ────────────────────────────────────────────────────────────────────
//

#[component]
fn ResultPanel() -> Element {
    let ctx = use_context::<AppContext>();
    let session = use_context::<Signal<SessionState>>();
    let mut error = use_signal(|| None::<String>);

    let flow = ctx.quiz_flow();
    let retry_flow = ctx.quiz_flow();

    let snapshot = session.read();
    let Some(quiz) = snapshot.quiz() else {
        return rsx! {};
    };
    let score = quiz.score();
    let correct = quiz.correct_count();
    let total = quiz.total_questions();
    let accuracy = accuracy_display(quiz.accuracy_percent());
    let message = performance_message(quiz.accuracy_percent());
    let recorded = quiz.result_id().is_some();
    let rows = map_answer_rows(quiz.answers());
    drop(snapshot);

    rsx! {
        div { class: "quiz-result",
            h2 { "🎉 Quiz complete!" }

            div { class: "summary",
                p { "Score: {score}" }
                p { "Accuracy: {accuracy}" }
                p { "Correct: {correct} / {total}" }
            }
            p { class: "message", "{message}" }

            if !recorded {
                div { class: "error-panel",
                    p { class: "error", "Your result could not be saved." }
                    button {
                        onclick: move |_| {
                            let flow = retry_flow.clone();
                            let mut session = session;
                            spawn(async move {
                                let mut working = session();
                                match flow.finalize_result(&mut working).await {
                                    Ok(_) => error.set(None),
                                    Err(err) => error.set(Some(err.to_string())),
                                }
                                session.set(working);
                            });
                        },
                        "Save again"
                    }
                }
            }

            h3 { "📋 Details" }
            ol { class: "breakdown",
                for row in rows {
                    li {
                        p { class: "prompt", "{row.prompt}" }
                        ul {
                            for option in row.options {
                                li { class: option.class, "{option.text}" }
                            }
                        }
                        p { class: "explanation", "{row.explanation}" }
                    }
                }
            }

            button {
                class: "primary",
                onclick: move |_| {
                    let mut session = session;
                    let mut working = session();
                    flow.reset(&mut working);
                    session.set(working);
                },
                "Start a new quiz"
            }

            if let Some(message) = error() {
                p { class: "error", "{message}" }
            }
        }
    }
}
