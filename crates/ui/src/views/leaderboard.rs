use dioxus::prelude::*;

use crate::context::AppContext;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{LeaderboardRowVm, map_leaderboard_rows};

const LEADERBOARD_LIMIT: u32 = 20;

#[derive(Clone, Debug, PartialEq)]
struct LeaderboardData {
    rows: Vec<LeaderboardRowVm>,
}

#[component]
pub fn LeaderboardView() -> Element {
    let ctx = use_context::<AppContext>();
    let scoreboard = ctx.scoreboard();

    let resource = use_resource(move || {
        let scoreboard = scoreboard.clone();
        async move {
            let entries = scoreboard
                .leaderboard(LEADERBOARD_LIMIT)
                .await
                .map_err(|_| ViewError::Unavailable)?;
            Ok(LeaderboardData {
                rows: map_leaderboard_rows(&entries),
            })
        }
    });

    let state = view_state_from_resource(&resource);
    let unavailable = ViewError::message();

    rsx! {
        div { class: "leaderboard",
            h2 { "🏆 Leaderboard" }

            match state {
                ViewState::Idle => rsx! {
                    p { "Idle" }
                },
                ViewState::Loading => rsx! {
                    p { "Loading..." }
                },
                ViewState::Ready(data) => rsx! {
                    if data.rows.is_empty() {
                        p { "No scores yet. Be the first to finish a quiz!" }
                    } else {
                        table {
                            thead {
                                tr {
                                    th { "Rank" }
                                    th { "Player" }
                                    th { "Total score" }
                                    th { "Quizzes" }
                                }
                            }
                            tbody {
                                for row in data.rows {
                                    tr {
                                        td { "{row.badge}" }
                                        td { "{row.username}" }
                                        td { "{row.total_score}" }
                                        td { "{row.quiz_count}" }
                                    }
                                }
                            }
                        }
                    }
                },
                ViewState::Error(_) => rsx! {
                    p { class: "error", "{unavailable}" }
                },
            }
        }
    }
}
