mod auth;
mod history;
mod leaderboard;
mod quiz;
mod state;

pub use auth::AuthView;
pub use history::HistoryView;
pub use leaderboard::LeaderboardView;
pub use quiz::QuizView;
pub use state::{ViewError, ViewState, view_state_from_resource};

/// Pages reachable from the sidebar.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AppView {
    #[default]
    Auth,
    Quiz,
    Leaderboard,
    History,
}
