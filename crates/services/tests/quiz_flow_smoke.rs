use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use quiz_core::model::{
    Difficulty, LeaderboardEntry, Question, QuizResultRecord, QuizSettings, UserId, UserProfile,
};
use quiz_core::time::fixed_clock;
use services::error::QuestionSourceError;
use services::{AccountService, QuestionSource, QuizFlowService, ScoreboardService, SessionState};
use storage::repository::{InMemoryRepository, ScoreRepository, StorageError};

struct FixedSource {
    correct: usize,
}

#[async_trait]
impl QuestionSource for FixedSource {
    async fn generate(
        &self,
        difficulty: Difficulty,
        count: usize,
    ) -> Result<Vec<Question>, QuestionSourceError> {
        Ok((0..count)
            .map(|n| {
                Question::new(
                    format!("Q{n}"),
                    vec!["a".into(), "b".into(), "c".into(), "d".into()],
                    self.correct,
                    format!("E{n}"),
                    difficulty,
                )
                .unwrap()
            })
            .collect())
    }
}

/// Wraps a repository and counts write calls, to pin down the
/// exactly-once persistence rule.
struct CountingScores {
    inner: InMemoryRepository,
    writes: AtomicUsize,
}

#[async_trait]
impl ScoreRepository for CountingScores {
    async fn record_result(
        &self,
        user_id: &UserId,
        result: &QuizResultRecord,
    ) -> Result<i64, StorageError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.record_result(user_id, result).await
    }

    async fn leaderboard(&self, limit: u32) -> Result<Vec<LeaderboardEntry>, StorageError> {
        self.inner.leaderboard(limit).await
    }

    async fn user_history(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<QuizResultRecord>, StorageError> {
        self.inner.user_history(user_id, limit).await
    }

    async fn get_profile(&self, user_id: &UserId) -> Result<Option<UserProfile>, StorageError> {
        self.inner.get_profile(user_id).await
    }
}

fn build_flow(correct: usize) -> (QuizFlowService, Arc<CountingScores>, Arc<InMemoryRepository>) {
    let repo = Arc::new(InMemoryRepository::new());
    let scores = Arc::new(CountingScores {
        inner: (*repo).clone(),
        writes: AtomicUsize::new(0),
    });
    let flow = QuizFlowService::new(
        fixed_clock(),
        QuizSettings::default(),
        Arc::new(FixedSource { correct }),
        scores.clone(),
    );
    (flow, scores, repo)
}

#[tokio::test]
async fn authenticated_quiz_persists_exactly_once() {
    let (flow, scores, repo) = build_flow(0);
    let accounts = AccountService::new(repo.clone());
    let profile = accounts
        .register("alice", "a@example.com", "secret1", "secret1")
        .await
        .unwrap();
    let user_id = profile.id().clone();

    let mut state = SessionState::new();
    state.sign_in(profile);

    flow.start(&mut state, Difficulty::Easy).await.unwrap();

    // answer 3 of 5 correctly (correct option is 0 for every question)
    for choice in [0, 0, 0, 1, 1] {
        flow.answer_current(&mut state, choice).await.unwrap();
    }

    let quiz = state.quiz().unwrap();
    assert!(quiz.is_complete());
    assert_eq!(quiz.score(), 30);
    assert!((quiz.accuracy_percent() - 60.0).abs() < f64::EPSILON);
    assert!(quiz.result_id().is_some());

    // exactly one write, with the true score, count, and difficulty
    assert_eq!(scores.writes.load(Ordering::SeqCst), 1);
    let history = repo.user_history(&user_id, 10).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].score(), 30);
    assert_eq!(history[0].total_questions(), 5);
    assert_eq!(history[0].difficulty(), Difficulty::Easy);

    // the held profile tracks the persisted totals
    let held = state.identity().unwrap().profile().unwrap();
    assert_eq!(held.total_score(), 30);
    assert_eq!(held.quiz_count(), 1);

    // nothing leaked into the demo history
    assert!(state.demo_history().is_empty());

    // finalize on an already recorded quiz is a no-op returning the same id
    let id = quiz.result_id().unwrap();
    assert_eq!(flow.finalize_result(&mut state).await.unwrap(), id);
    assert_eq!(scores.writes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn demo_quiz_never_reaches_the_repository() {
    let (flow, scores, repo) = build_flow(2);
    let mut state = SessionState::new();
    state.enter_demo("guest").unwrap();

    flow.start(&mut state, Difficulty::Hard).await.unwrap();
    for _ in 0..5 {
        flow.answer_current(&mut state, 2).await.unwrap();
    }

    assert_eq!(scores.writes.load(Ordering::SeqCst), 0);
    assert_eq!(state.demo_history().len(), 1);
    assert_eq!(state.demo_history()[0].score(), 50);
    assert_eq!(state.demo_history()[0].total_questions(), 5);
    assert!(state.quiz().unwrap().result_id().is_some());

    // a perfect run, all answers correct
    assert!((state.quiz().unwrap().accuracy_percent() - 100.0).abs() < f64::EPSILON);

    // leaderboard stays empty: demo results are invisible to the store
    let board = ScoreboardService::new(repo).leaderboard(10).await.unwrap();
    assert!(board.is_empty());
}

#[tokio::test]
async fn consecutive_quizzes_each_persist_once() {
    let (flow, scores, repo) = build_flow(0);
    let accounts = AccountService::new(repo.clone());
    let profile = accounts
        .register("bob", "b@example.com", "secret1", "secret1")
        .await
        .unwrap();
    let user_id = profile.id().clone();

    let mut state = SessionState::new();
    state.sign_in(profile);

    for _ in 0..3 {
        flow.start(&mut state, Difficulty::Normal).await.unwrap();
        for _ in 0..5 {
            flow.answer_current(&mut state, 0).await.unwrap();
        }
        flow.reset(&mut state);
    }

    assert_eq!(scores.writes.load(Ordering::SeqCst), 3);
    let stored = repo.get_profile(&user_id).await.unwrap().unwrap();
    assert_eq!(stored.quiz_count(), 3);
    assert_eq!(stored.total_score(), 150);
}
