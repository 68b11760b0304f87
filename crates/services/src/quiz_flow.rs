use std::sync::Arc;

use quiz_core::Clock;
use quiz_core::model::{
    AnsweredQuestion, Difficulty, Identity, QuizResultRecord, QuizSession, QuizSettings,
};
use storage::repository::ScoreRepository;

use crate::error::QuizFlowError;
use crate::question_source::QuestionSource;
use crate::session_state::SessionState;

/// Result of submitting one answer.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerOutcome {
    pub answered: AnsweredQuestion,
    pub is_complete: bool,
    pub result_id: Option<i64>,
}

/// Orchestrates the quiz lifecycle: start, answer, persist once, reset.
#[derive(Clone)]
pub struct QuizFlowService {
    clock: Clock,
    settings: QuizSettings,
    source: Arc<dyn QuestionSource>,
    scores: Arc<dyn ScoreRepository>,
}

impl QuizFlowService {
    #[must_use]
    pub fn new(
        clock: Clock,
        settings: QuizSettings,
        source: Arc<dyn QuestionSource>,
        scores: Arc<dyn ScoreRepository>,
    ) -> Self {
        Self {
            clock,
            settings,
            source,
            scores,
        }
    }

    #[must_use]
    pub fn settings(&self) -> QuizSettings {
        self.settings
    }

    /// Starts a new quiz for the session identity.
    ///
    /// Every source failure is normalized to `QuizFlowError::NoQuestions`;
    /// the session keeps no quiz, so the user can simply retry.
    ///
    /// # Errors
    ///
    /// Returns `QuizFlowError::NoIdentity` without a player,
    /// `QuizFlowError::AlreadyRunning` while a quiz is unfinished, and
    /// `QuizFlowError::NoQuestions` when the source fails.
    pub async fn start(
        &self,
        state: &mut SessionState,
        difficulty: Difficulty,
    ) -> Result<(), QuizFlowError> {
        if state.identity().is_none() {
            return Err(QuizFlowError::NoIdentity);
        }
        if state.quiz().is_some_and(|quiz| !quiz.is_complete()) {
            return Err(QuizFlowError::AlreadyRunning);
        }

        let count = self.settings.questions_per_quiz() as usize;
        let questions = match self.source.generate(difficulty, count).await {
            Ok(questions) => questions,
            Err(err) => {
                tracing::warn!(%difficulty, error = %err, "question generation failed");
                return Err(QuizFlowError::NoQuestions);
            }
        };

        // A wrong-sized batch is a broken source contract, not a different error.
        let quiz = QuizSession::new(difficulty, questions, self.settings, self.clock.now())
            .map_err(|err| {
                tracing::warn!(%difficulty, error = %err, "question source returned an unusable batch");
                QuizFlowError::NoQuestions
            })?;
        state.set_quiz(quiz);
        Ok(())
    }

    /// Submits an answer for the current question.
    ///
    /// Completing the last question triggers exactly one persistence dispatch
    /// on the identity variant: demo results stay in the session, signed-in
    /// results go to the score repository. Never both.
    ///
    /// # Errors
    ///
    /// Returns `QuizFlowError::NotStarted` without a quiz, propagates
    /// `QuizError` for invalid submissions, and `QuizFlowError::Storage` when
    /// the repository write fails (the result stays unrecorded for retry).
    pub async fn answer_current(
        &self,
        state: &mut SessionState,
        option_index: usize,
    ) -> Result<AnswerOutcome, QuizFlowError> {
        if state.identity().is_none() {
            return Err(QuizFlowError::NoIdentity);
        }
        let now = self.clock.now();

        let quiz = state.quiz_mut().ok_or(QuizFlowError::NotStarted)?;
        let answered = quiz.answer_current(option_index, now)?.clone();
        let is_complete = quiz.is_complete();

        if is_complete {
            self.persist_finished(state, now).await?;
        } else {
            state.set_show_last_answer(true);
        }

        Ok(AnswerOutcome {
            answered,
            is_complete,
            result_id: state.quiz().and_then(QuizSession::result_id),
        })
    }

    /// Retries persistence for a finished quiz whose recording failed.
    ///
    /// # Errors
    ///
    /// Returns `QuizFlowError::NotStarted` without a quiz,
    /// `QuizFlowError::NotFinished` before completion, and storage errors
    /// when the retry fails again.
    pub async fn finalize_result(&self, state: &mut SessionState) -> Result<i64, QuizFlowError> {
        let quiz = state.quiz().ok_or(QuizFlowError::NotStarted)?;
        if let Some(id) = quiz.result_id() {
            return Ok(id);
        }
        let finished_at = quiz.finished_at().ok_or(QuizFlowError::NotFinished)?;

        self.persist_finished(state, finished_at).await?;
        state
            .quiz()
            .and_then(QuizSession::result_id)
            .ok_or(QuizFlowError::NotFinished)
    }

    /// Returns to the start screen, keeping identity and history.
    pub fn reset(&self, state: &mut SessionState) {
        state.clear_quiz();
    }

    async fn persist_finished(
        &self,
        state: &mut SessionState,
        recorded_at: chrono::DateTime<chrono::Utc>,
    ) -> Result<(), QuizFlowError> {
        let quiz = state.quiz().ok_or(QuizFlowError::NotStarted)?;
        if quiz.result_id().is_some() {
            return Ok(());
        }

        let record = QuizResultRecord::new(
            quiz.score(),
            quiz.total_questions() as u32,
            quiz.difficulty(),
            recorded_at,
        )?;
        let identity = state.identity().cloned().ok_or(QuizFlowError::NoIdentity)?;

        match identity {
            Identity::Anonymous { .. } => {
                let id = state.push_demo_result(record);
                if let Some(quiz) = state.quiz_mut() {
                    quiz.set_result_id(id);
                }
            }
            Identity::Authenticated(profile) => {
                let id = self.scores.record_result(profile.id(), &record).await?;
                if let Some(quiz) = state.quiz_mut() {
                    quiz.set_result_id(id);
                }
                state.apply_result_to_profile(record.score());
            }
        }
        Ok(())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
