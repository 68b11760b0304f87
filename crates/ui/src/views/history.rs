use dioxus::prelude::*;

use quiz_core::model::QuizResultRecord;
use services::{HistoryStats, SessionState};

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{average_display, map_history_rows};

const HISTORY_LIMIT: u32 = 20;

#[component]
pub fn HistoryView() -> Element {
    let session = use_context::<Signal<SessionState>>();

    let snapshot = session.read();
    let is_demo = snapshot.is_demo();
    drop(snapshot);

    if is_demo {
        rsx! { DemoHistory {} }
    } else {
        rsx! { PersistedHistory {} }
    }
}

#[component]
fn DemoHistory() -> Element {
    let session = use_context::<Signal<SessionState>>();

    let snapshot = session.read();
    let records: Vec<QuizResultRecord> = snapshot.demo_history().to_vec();
    drop(snapshot);

    rsx! {
        div { class: "history",
            h2 { "📊 My history (demo)" }
            p { class: "hint", "These results live only in this session." }
            HistoryBody { records }
        }
    }
}

#[component]
fn PersistedHistory() -> Element {
    let ctx = use_context::<AppContext>();
    let session = use_context::<Signal<SessionState>>();
    let scoreboard = ctx.scoreboard();

    let snapshot = session.read();
    let user_id = snapshot
        .identity()
        .and_then(|identity| identity.profile())
        .map(|profile| profile.id().clone());
    drop(snapshot);

    let resource = use_resource(move || {
        let scoreboard = scoreboard.clone();
        let user_id = user_id.clone();
        async move {
            let Some(user_id) = user_id else {
                return Ok(Vec::new());
            };
            scoreboard
                .history(&user_id, HISTORY_LIMIT)
                .await
                .map_err(|_| ViewError::Unavailable)
        }
    });

    let state = view_state_from_resource(&resource);
    let unavailable = ViewError::message();

    rsx! {
        div { class: "history",
            h2 { "📊 My history" }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(records) => rsx! {
                    HistoryBody { records }
                },
                ViewState::Error(_) => rsx! {
                    p { class: "error", "{unavailable}" }
                },
            }
        }
    }
}

#[component]
fn HistoryBody(records: Vec<QuizResultRecord>) -> Element {
    let ctx = use_context::<AppContext>();
    let stats = HistoryStats::from_records(&records);
    let average = average_display(stats.average_score);
    let rows = map_history_rows(&records, ctx.settings().points_per_correct());

    rsx! {
        if rows.is_empty() {
            p { "No quiz results yet. Start your first quiz!" }
        } else {
            div { class: "stats-row",
                div { class: "stat",
                    span { class: "label", "Quizzes" }
                    span { class: "value", "{stats.total_quizzes}" }
                }
                div { class: "stat",
                    span { class: "label", "Total score" }
                    span { class: "value", "{stats.total_score}" }
                }
                div { class: "stat",
                    span { class: "label", "Average" }
                    span { class: "value", "{average}" }
                }
            }

            h3 { "Recent quizzes" }
            ul { class: "records",
                for row in rows {
                    li {
                        span { class: "date", "{row.recorded_at}" }
                        span { "Score: {row.score}" }
                        span { "Accuracy: {row.accuracy}" }
                        span { "Difficulty: {row.difficulty}" }
                    }
                }
            }
        }
    }
}
