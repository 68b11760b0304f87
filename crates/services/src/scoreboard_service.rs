use std::sync::Arc;

use quiz_core::model::{LeaderboardEntry, QuizResultRecord, UserId, UserProfile};
use storage::repository::{ScoreRepository, StorageError};

/// Read-side queries for the leaderboard and per-user history.
///
/// Failures pass through as `StorageError`; callers degrade to an empty
/// display instead of retrying.
#[derive(Clone)]
pub struct ScoreboardService {
    scores: Arc<dyn ScoreRepository>,
}

/// Summary over a list of history records.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoryStats {
    pub total_quizzes: usize,
    pub total_score: u32,
    pub average_score: f64,
}

impl HistoryStats {
    /// Computes summary stats for a history page. Works the same for demo
    /// and persisted histories.
    #[must_use]
    pub fn from_records(records: &[QuizResultRecord]) -> Self {
        let total_quizzes = records.len();
        let total_score = records
            .iter()
            .fold(0_u32, |acc, r| acc.saturating_add(r.score()));
        let average_score = if total_quizzes == 0 {
            0.0
        } else {
            f64::from(total_score) / total_quizzes as f64
        };
        Self {
            total_quizzes,
            total_score,
            average_score,
        }
    }
}

impl ScoreboardService {
    #[must_use]
    pub fn new(scores: Arc<dyn ScoreRepository>) -> Self {
        Self { scores }
    }

    /// Top `limit` players by total score, descending.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the backend is unavailable.
    pub async fn leaderboard(&self, limit: u32) -> Result<Vec<LeaderboardEntry>, StorageError> {
        self.scores.leaderboard(limit).await
    }

    /// The user's most recent results, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the backend is unavailable.
    pub async fn history(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<QuizResultRecord>, StorageError> {
        self.scores.user_history(user_id, limit).await
    }

    /// Fresh profile read, or `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the backend is unavailable.
    pub async fn profile(&self, user_id: &UserId) -> Result<Option<UserProfile>, StorageError> {
        self.scores.get_profile(user_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::Difficulty;
    use quiz_core::time::fixed_now;

    fn record(score: u32) -> QuizResultRecord {
        QuizResultRecord::new(score, 5, Difficulty::Normal, fixed_now()).unwrap()
    }

    #[test]
    fn stats_over_empty_history_are_zero() {
        let stats = HistoryStats::from_records(&[]);
        assert_eq!(stats.total_quizzes, 0);
        assert_eq!(stats.total_score, 0);
        assert!((stats.average_score - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn stats_aggregate_scores() {
        let stats = HistoryStats::from_records(&[record(30), record(50), record(10)]);
        assert_eq!(stats.total_quizzes, 3);
        assert_eq!(stats.total_score, 90);
        assert!((stats.average_score - 30.0).abs() < f64::EPSILON);
    }
}
