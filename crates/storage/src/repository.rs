use async_trait::async_trait;
use quiz_core::model::{LeaderboardEntry, QuizResultRecord, UserId, UserProfile};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Input for creating an account.
///
/// The password arrives already hashed; storage never sees plaintext.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub user_id: UserId,
    pub email: String,
    pub username: String,
    pub password_hash: String,
}

/// A stored account: the profile plus its credential hash.
#[derive(Debug, Clone)]
pub struct AccountRecord {
    pub profile: UserProfile,
    pub password_hash: String,
}

/// Repository contract for account credentials and profiles.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Create an account together with its zeroed profile.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` when the email is already registered,
    /// or other storage errors.
    async fn create_account(&self, account: &NewAccount) -> Result<UserProfile, StorageError>;

    /// Look up an account by email.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failure; an unknown email is `Ok(None)`.
    async fn find_by_email(&self, email: &str) -> Result<Option<AccountRecord>, StorageError>;
}

/// Repository contract for scores, history, and the leaderboard.
#[async_trait]
pub trait ScoreRepository: Send + Sync {
    /// Appends one history entry and additively updates the profile totals.
    ///
    /// Not idempotent: every call adds. Callers invoke it at most once per
    /// finished quiz.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` when the user does not exist, or
    /// other storage errors.
    async fn record_result(
        &self,
        user_id: &UserId,
        result: &QuizResultRecord,
    ) -> Result<i64, StorageError>;

    /// Top profiles by total score, descending, at most `limit` entries.
    ///
    /// Ties are returned in an arbitrary stable order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failure.
    async fn leaderboard(&self, limit: u32) -> Result<Vec<LeaderboardEntry>, StorageError>;

    /// The user's history, most recent first, at most `limit` entries.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failure.
    async fn user_history(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<QuizResultRecord>, StorageError>;

    /// The user's profile, or `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failure.
    async fn get_profile(&self, user_id: &UserId) -> Result<Option<UserProfile>, StorageError>;
}

//
// ─── IN-MEMORY BACKEND ─────────────────────────────────────────────────────────
//

#[derive(Debug, Clone)]
struct StoredAccount {
    email: String,
    username: String,
    password_hash: String,
    total_score: u32,
    quiz_count: u32,
}

impl StoredAccount {
    fn profile(&self, id: &UserId) -> UserProfile {
        UserProfile::from_persisted(
            id.clone(),
            self.username.clone(),
            self.email.clone(),
            self.total_score,
            self.quiz_count,
        )
    }
}

#[derive(Default)]
struct InMemoryState {
    accounts: HashMap<UserId, StoredAccount>,
    results: Vec<(i64, UserId, QuizResultRecord)>,
    next_result_id: i64,
}

/// In-memory repository: the second interchangeable backend, also used as a
/// test double. Nothing survives the process.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    state: Arc<Mutex<InMemoryState>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, InMemoryState>, StorageError> {
        self.state
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))
    }
}

#[async_trait]
impl AccountRepository for InMemoryRepository {
    async fn create_account(&self, account: &NewAccount) -> Result<UserProfile, StorageError> {
        let mut state = self.lock()?;
        if state.accounts.values().any(|a| a.email == account.email) {
            return Err(StorageError::Conflict);
        }
        let stored = StoredAccount {
            email: account.email.clone(),
            username: account.username.clone(),
            password_hash: account.password_hash.clone(),
            total_score: 0,
            quiz_count: 0,
        };
        let profile = stored.profile(&account.user_id);
        state.accounts.insert(account.user_id.clone(), stored);
        Ok(profile)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<AccountRecord>, StorageError> {
        let state = self.lock()?;
        Ok(state.accounts.iter().find_map(|(id, stored)| {
            (stored.email == email).then(|| AccountRecord {
                profile: stored.profile(id),
                password_hash: stored.password_hash.clone(),
            })
        }))
    }
}

#[async_trait]
impl ScoreRepository for InMemoryRepository {
    async fn record_result(
        &self,
        user_id: &UserId,
        result: &QuizResultRecord,
    ) -> Result<i64, StorageError> {
        let mut state = self.lock()?;
        let Some(account) = state.accounts.get_mut(user_id) else {
            return Err(StorageError::NotFound);
        };
        account.total_score = account.total_score.saturating_add(result.score());
        account.quiz_count = account.quiz_count.saturating_add(1);

        state.next_result_id += 1;
        let id = state.next_result_id;
        state.results.push((id, user_id.clone(), result.clone()));
        Ok(id)
    }

    async fn leaderboard(&self, limit: u32) -> Result<Vec<LeaderboardEntry>, StorageError> {
        let state = self.lock()?;
        let mut entries: Vec<LeaderboardEntry> = state
            .accounts
            .values()
            .map(|a| LeaderboardEntry {
                username: a.username.clone(),
                total_score: a.total_score,
                quiz_count: a.quiz_count,
            })
            .collect();
        entries.sort_by(|a, b| b.total_score.cmp(&a.total_score));
        entries.truncate(limit as usize);
        Ok(entries)
    }

    async fn user_history(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<QuizResultRecord>, StorageError> {
        let state = self.lock()?;
        Ok(state
            .results
            .iter()
            .rev()
            .filter(|(_, id, _)| id == user_id)
            .map(|(_, _, record)| record.clone())
            .take(limit as usize)
            .collect())
    }

    async fn get_profile(&self, user_id: &UserId) -> Result<Option<UserProfile>, StorageError> {
        let state = self.lock()?;
        Ok(state
            .accounts
            .get(user_id)
            .map(|stored| stored.profile(user_id)))
    }
}

//
// ─── STORAGE AGGREGATE ─────────────────────────────────────────────────────────
//

/// Aggregates the repositories behind trait objects for easy backend swapping.
///
/// Core logic never branches on which backend is active.
#[derive(Clone)]
pub struct Storage {
    pub accounts: Arc<dyn AccountRepository>,
    pub scores: Arc<dyn ScoreRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let accounts: Arc<dyn AccountRepository> = Arc::new(repo.clone());
        let scores: Arc<dyn ScoreRepository> = Arc::new(repo);
        Self { accounts, scores }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::Difficulty;
    use quiz_core::time::fixed_now;

    fn new_account(n: u32) -> NewAccount {
        NewAccount {
            user_id: UserId::new(format!("user-{n}")),
            email: format!("player{n}@example.com"),
            username: format!("player{n}"),
            password_hash: "hash".into(),
        }
    }

    fn result(score: u32) -> QuizResultRecord {
        QuizResultRecord::new(score, 5, Difficulty::Normal, fixed_now()).unwrap()
    }

    #[tokio::test]
    async fn create_account_rejects_duplicate_email() {
        let repo = InMemoryRepository::new();
        repo.create_account(&new_account(1)).await.unwrap();

        let mut dup = new_account(2);
        dup.email = "player1@example.com".into();
        let err = repo.create_account(&dup).await.unwrap_err();
        assert!(matches!(err, StorageError::Conflict));
    }

    #[tokio::test]
    async fn record_result_updates_totals_additively() {
        let repo = InMemoryRepository::new();
        let account = new_account(1);
        repo.create_account(&account).await.unwrap();

        repo.record_result(&account.user_id, &result(30)).await.unwrap();
        repo.record_result(&account.user_id, &result(50)).await.unwrap();

        let profile = repo.get_profile(&account.user_id).await.unwrap().unwrap();
        assert_eq!(profile.total_score(), 80);
        assert_eq!(profile.quiz_count(), 2);

        let history = repo.user_history(&account.user_id, 10).await.unwrap();
        assert_eq!(history.len(), 2);
        // most recent first
        assert_eq!(history[0].score(), 50);
    }

    #[tokio::test]
    async fn record_result_requires_existing_user() {
        let repo = InMemoryRepository::new();
        let err = repo
            .record_result(&UserId::new("ghost"), &result(10))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }

    #[tokio::test]
    async fn leaderboard_sorted_and_bounded() {
        let repo = InMemoryRepository::new();
        for (n, score) in [(1, 30), (2, 80), (3, 50)] {
            let account = new_account(n);
            repo.create_account(&account).await.unwrap();
            repo.record_result(&account.user_id, &result(score)).await.unwrap();
        }

        let top = repo.leaderboard(2).await.unwrap();
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].username, "player2");
        assert_eq!(top[0].total_score, 80);
        assert_eq!(top[1].total_score, 50);
    }
}
