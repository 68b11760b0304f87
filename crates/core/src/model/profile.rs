use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{Difficulty, UserId};

//
// ─── IDENTITY ──────────────────────────────────────────────────────────────────
//

/// Who is playing the current session.
///
/// Persistence dispatch matches on the variant: anonymous results stay in the
/// session, authenticated results go to the score repository. Never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    /// Demo player; nothing about them survives the session.
    Anonymous { display_name: String },
    /// Signed-in player backed by a stored profile.
    Authenticated(UserProfile),
}

impl Identity {
    #[must_use]
    pub fn display_name(&self) -> &str {
        match self {
            Identity::Anonymous { display_name } => display_name,
            Identity::Authenticated(profile) => profile.username(),
        }
    }

    #[must_use]
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Identity::Anonymous { .. })
    }

    #[must_use]
    pub fn profile(&self) -> Option<&UserProfile> {
        match self {
            Identity::Anonymous { .. } => None,
            Identity::Authenticated(profile) => Some(profile),
        }
    }
}

//
// ─── USER PROFILE ──────────────────────────────────────────────────────────────
//

/// Persisted aggregate for an authenticated player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    id: UserId,
    username: String,
    email: String,
    total_score: u32,
    quiz_count: u32,
}

impl UserProfile {
    /// A brand-new profile with zeroed totals.
    #[must_use]
    pub fn new(id: UserId, username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            username: username.into(),
            email: email.into(),
            total_score: 0,
            quiz_count: 0,
        }
    }

    /// Rehydrate a profile from persisted storage.
    #[must_use]
    pub fn from_persisted(
        id: UserId,
        username: impl Into<String>,
        email: impl Into<String>,
        total_score: u32,
        quiz_count: u32,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            email: email.into(),
            total_score,
            quiz_count,
        }
    }

    #[must_use]
    pub fn id(&self) -> &UserId {
        &self.id
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn total_score(&self) -> u32 {
        self.total_score
    }

    #[must_use]
    pub fn quiz_count(&self) -> u32 {
        self.quiz_count
    }

    /// Folds one finished quiz into the running totals.
    pub fn apply_result(&mut self, score: u32) {
        self.total_score = self.total_score.saturating_add(score);
        self.quiz_count = self.quiz_count.saturating_add(1);
    }
}

//
// ─── QUIZ RESULT RECORD ────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ResultRecordError {
    #[error("a quiz result must cover at least one question")]
    NoQuestions,
}

/// One finished quiz, as stored in per-user history.
///
/// `total_questions` always holds the true question count of the quiz it
/// came from; accuracy is derived from it, never from a default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizResultRecord {
    score: u32,
    total_questions: u32,
    difficulty: Difficulty,
    recorded_at: DateTime<Utc>,
}

impl QuizResultRecord {
    /// Builds a history record.
    ///
    /// # Errors
    ///
    /// Returns `ResultRecordError::NoQuestions` when `total_questions` is zero.
    pub fn new(
        score: u32,
        total_questions: u32,
        difficulty: Difficulty,
        recorded_at: DateTime<Utc>,
    ) -> Result<Self, ResultRecordError> {
        if total_questions == 0 {
            return Err(ResultRecordError::NoQuestions);
        }
        Ok(Self {
            score,
            total_questions,
            difficulty,
            recorded_at,
        })
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }

    /// Accuracy for display, derived from the stored question count.
    #[must_use]
    pub fn accuracy_percent(&self, points_per_correct: u32) -> f64 {
        let max = f64::from(self.total_questions) * f64::from(points_per_correct.max(1));
        f64::from(self.score) / max * 100.0
    }
}

//
// ─── LEADERBOARD ───────────────────────────────────────────────────────────────
//

/// Derived ranking view; sorted by total score descending by the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub username: String,
    pub total_score: u32,
    pub quiz_count: u32,
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn profile_applies_results_additively() {
        let mut profile = UserProfile::new(UserId::new("u1"), "alice", "a@example.com");
        profile.apply_result(30);
        profile.apply_result(50);
        assert_eq!(profile.total_score(), 80);
        assert_eq!(profile.quiz_count(), 2);
    }

    #[test]
    fn identity_dispatch() {
        let demo = Identity::Anonymous {
            display_name: "guest".into(),
        };
        assert!(demo.is_anonymous());
        assert_eq!(demo.display_name(), "guest");
        assert!(demo.profile().is_none());

        let auth = Identity::Authenticated(UserProfile::new(
            UserId::new("u1"),
            "alice",
            "a@example.com",
        ));
        assert!(!auth.is_anonymous());
        assert_eq!(auth.display_name(), "alice");
    }

    #[test]
    fn record_accuracy_uses_stored_count() {
        let record = QuizResultRecord::new(30, 5, Difficulty::Easy, fixed_now()).unwrap();
        assert!((record.accuracy_percent(10) - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn record_rejects_zero_questions() {
        let err = QuizResultRecord::new(0, 0, Difficulty::Easy, fixed_now()).unwrap_err();
        assert_eq!(err, ResultRecordError::NoQuestions);
    }
}
