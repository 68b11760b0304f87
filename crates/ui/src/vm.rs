//! Pure display mapping, testable without a renderer.

use chrono::{DateTime, Utc};

use quiz_core::model::{AnsweredQuestion, LeaderboardEntry, Question, QuizResultRecord};

/// Letter shown next to an option (A-D).
#[must_use]
pub fn option_label(index: usize) -> char {
    if index < 4 {
        (b'A' + index as u8) as char
    } else {
        '?'
    }
}

/// One-decimal percentage, e.g. "60.0%".
#[must_use]
pub fn accuracy_display(percent: f64) -> String {
    format!("{percent:.1}%")
}

/// Closing message on the result page, by accuracy band.
#[must_use]
pub fn performance_message(accuracy_percent: f64) -> &'static str {
    if accuracy_percent >= 80.0 {
        "Excellent! You really know your trivia."
    } else if accuracy_percent >= 60.0 {
        "Good result!"
    } else {
        "Keep practicing and try again!"
    }
}

/// Medal for the top three, plain rank otherwise.
#[must_use]
pub fn rank_badge(rank: usize) -> String {
    match rank {
        1 => "🥇".to_string(),
        2 => "🥈".to_string(),
        3 => "🥉".to_string(),
        n => format!("{n}."),
    }
}

/// Timestamp format used on history pages.
#[must_use]
pub fn format_recorded_at(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M").to_string()
}

/// One-decimal average, e.g. "23.3".
#[must_use]
pub fn average_display(average: f64) -> String {
    format!("{average:.1}")
}

//
// ─── QUESTION PAGE ─────────────────────────────────────────────────────────────
//

/// Feedback shown for the previously answered question.
#[derive(Clone, Debug, PartialEq)]
pub struct FeedbackVm {
    pub is_correct: bool,
    pub correct_answer: String,
    pub explanation: String,
}

#[must_use]
pub fn map_feedback(last: &AnsweredQuestion) -> FeedbackVm {
    let question = last.question();
    FeedbackVm {
        is_correct: last.is_correct(),
        correct_answer: format!(
            "{}. {}",
            option_label(question.correct_index()),
            question.correct_option()
        ),
        explanation: last.explanation().to_string(),
    }
}

/// Labelled options for the current question.
#[must_use]
pub fn map_option_texts(question: &Question) -> Vec<String> {
    question
        .options()
        .iter()
        .enumerate()
        .map(|(index, option)| format!("{}. {option}", option_label(index)))
        .collect()
}

//
// ─── RESULT PAGE ───────────────────────────────────────────────────────────────
//

#[derive(Clone, Debug, PartialEq)]
pub struct OptionVm {
    pub text: String,
    pub class: &'static str,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AnswerRowVm {
    pub prompt: String,
    pub options: Vec<OptionVm>,
    pub explanation: String,
}

#[must_use]
pub fn map_answer_rows(answers: &[AnsweredQuestion]) -> Vec<AnswerRowVm> {
    answers
        .iter()
        .map(|answered| {
            let question = answered.question();
            let options = question
                .options()
                .iter()
                .enumerate()
                .map(|(index, option)| {
                    let (class, mark) = if question.is_correct(index) {
                        ("option right", " ✅")
                    } else if index == answered.chosen_index() {
                        ("option chosen-wrong", " ❌")
                    } else {
                        ("option", "")
                    };
                    OptionVm {
                        text: format!("{}. {option}{mark}", option_label(index)),
                        class,
                    }
                })
                .collect();
            AnswerRowVm {
                prompt: question.prompt().to_string(),
                options,
                explanation: answered.explanation().to_string(),
            }
        })
        .collect()
}

//
// ─── LEADERBOARD / HISTORY ─────────────────────────────────────────────────────
//

#[derive(Clone, Debug, PartialEq)]
pub struct LeaderboardRowVm {
    pub badge: String,
    pub username: String,
    pub total_score: u32,
    pub quiz_count: u32,
}

#[must_use]
pub fn map_leaderboard_rows(entries: &[LeaderboardEntry]) -> Vec<LeaderboardRowVm> {
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| LeaderboardRowVm {
            badge: rank_badge(i + 1),
            username: entry.username.clone(),
            total_score: entry.total_score,
            quiz_count: entry.quiz_count,
        })
        .collect()
}

#[derive(Clone, Debug, PartialEq)]
pub struct HistoryRowVm {
    pub recorded_at: String,
    pub score: u32,
    pub accuracy: String,
    pub difficulty: String,
}

#[must_use]
pub fn map_history_rows(
    records: &[QuizResultRecord],
    points_per_correct: u32,
) -> Vec<HistoryRowVm> {
    records
        .iter()
        .map(|record| HistoryRowVm {
            recorded_at: format_recorded_at(record.recorded_at()),
            score: record.score(),
            accuracy: accuracy_display(record.accuracy_percent(points_per_correct)),
            difficulty: record.difficulty().to_string(),
        })
        .collect()
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
