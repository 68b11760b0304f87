use dioxus::prelude::*;

use services::SessionState;

use crate::context::AppContext;
use crate::views::{AppView, AuthView, HistoryView, LeaderboardView, QuizView};

#[component]
pub fn App() -> Element {
    let ctx = use_context::<AppContext>();
    let session = use_context_provider(|| Signal::new(SessionState::new()));
    let view = use_context_provider(|| Signal::new(AppView::default()));

    // Without an identity every page falls back to the auth screen.
    let signed_in = session.read().identity().is_some();
    let active = if signed_in { view() } else { AppView::Auth };

    rsx! {
        document::Title { "AI Quiz" }

        div { class: "app-root",
            ErrorBoundary {
                handle_error: |errors: ErrorContext| rsx! {
                    div { class: "fatal",
                        h1 { "Something went wrong" }
                        pre { "{errors:?}" }
                    }
                },
                div { class: "layout",
                    Sidebar {}
                    main { class: "page",
                        if !ctx.auth_enabled() {
                            div { class: "demo-banner",
                                h3 { "Demo mode" }
                                p {
                                    "No database is configured, so scores live only in this session. "
                                    "Set QUIZ_DB_URL to enable accounts and the leaderboard."
                                }
                            }
                        }
                        match active {
                            AppView::Auth => rsx! { AuthView {} },
                            AppView::Quiz => rsx! { QuizView {} },
                            AppView::Leaderboard => rsx! { LeaderboardView {} },
                            AppView::History => rsx! { HistoryView {} },
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    let ctx = use_context::<AppContext>();
    let mut session = use_context::<Signal<SessionState>>();
    let mut view = use_context::<Signal<AppView>>();

    let snapshot = session.read();
    let identity = snapshot.identity().cloned();
    drop(snapshot);

    let Some(identity) = identity else {
        return rsx! {
            aside { class: "sidebar",
                h1 { "🧠 AI Quiz" }
                p { class: "hint", "Sign in or start a demo to play." }
            }
        };
    };

    let is_demo = identity.is_anonymous();
    let display_name = identity.display_name().to_string();
    let totals = identity
        .profile()
        .map(|profile| (profile.total_score(), profile.quiz_count()));

    rsx! {
        aside { class: "sidebar",
            h1 { "🧠 AI Quiz" }

            p { class: "greeting", "Hello, {display_name}!" }
            if let Some((total_score, quiz_count)) = totals {
                p { "Total score: {total_score}" }
                p { "Quizzes played: {quiz_count}" }
            } else {
                p { class: "hint", "🎯 Demo mode" }
            }

            nav { class: "nav",
                button { onclick: move |_| view.set(AppView::Quiz), "🎮 Quiz" }
                if ctx.auth_enabled() && !is_demo {
                    button { onclick: move |_| view.set(AppView::Leaderboard), "🏆 Leaderboard" }
                }
                button { onclick: move |_| view.set(AppView::History), "📊 My history" }
            }

            button {
                class: "secondary",
                onclick: move |_| {
                    session.write().sign_out();
                    view.set(AppView::Auth);
                },
                if is_demo { "End demo" } else { "Log out" }
            }
        }
    }
}
