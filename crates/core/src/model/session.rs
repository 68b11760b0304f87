use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;

use crate::model::{
    AnsweredQuestion, Difficulty, OPTIONS_PER_QUESTION, Question, QuizSettings,
};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("no questions available to start a quiz")]
    Empty,

    #[error("expected {expected} questions, got {got}")]
    CountMismatch { expected: usize, got: usize },

    #[error("quiz is already finished")]
    Finished,

    #[error("option index {index} is out of range")]
    InvalidOption { index: usize },
}

//
// ─── PROGRESS ──────────────────────────────────────────────────────────────────
//

/// Snapshot of how far a quiz has advanced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub is_complete: bool,
}

//
// ─── QUIZ SESSION ──────────────────────────────────────────────────────────────
//

/// One run through a fixed list of questions.
///
/// Questions are presented in the exact order the source returned them.
/// Created on start, mutated by each answer, discarded on reset.
#[derive(Clone, PartialEq)]
pub struct QuizSession {
    difficulty: Difficulty,
    questions: Vec<Question>,
    settings: QuizSettings,
    current: usize,
    score: u32,
    answers: Vec<AnsweredQuestion>,
    started_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
    result_id: Option<i64>,
}

impl QuizSession {
    /// Starts a session over the given questions.
    ///
    /// `started_at` should come from the services layer clock.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Empty` when no questions are provided, or
    /// `QuizError::CountMismatch` when the count differs from the configured
    /// questions-per-quiz.
    pub fn new(
        difficulty: Difficulty,
        questions: Vec<Question>,
        settings: QuizSettings,
        started_at: DateTime<Utc>,
    ) -> Result<Self, QuizError> {
        if questions.is_empty() {
            return Err(QuizError::Empty);
        }
        let expected = settings.questions_per_quiz() as usize;
        if questions.len() != expected {
            return Err(QuizError::CountMismatch {
                expected,
                got: questions.len(),
            });
        }

        Ok(Self {
            difficulty,
            questions,
            settings,
            current: 0,
            score: 0,
            answers: Vec::new(),
            started_at,
            finished_at: None,
            result_id: None,
        })
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn settings(&self) -> QuizSettings {
        self.settings
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// Identifier of the persisted result, once the single persistence call
    /// for this quiz has happened.
    #[must_use]
    pub fn result_id(&self) -> Option<i64> {
        self.result_id
    }

    pub fn set_result_id(&mut self, id: i64) {
        self.result_id = Some(id);
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    /// 1-based number of the question currently shown.
    #[must_use]
    pub fn question_number(&self) -> usize {
        self.current.min(self.questions.len() - 1) + 1
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.finished_at.is_some() {
            None
        } else {
            self.questions.get(self.current)
        }
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn answers(&self) -> &[AnsweredQuestion] {
        &self.answers
    }

    #[must_use]
    pub fn last_answer(&self) -> Option<&AnsweredQuestion> {
        self.answers.last()
    }

    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_correct()).count()
    }

    /// Share of correct answers, in percent.
    #[must_use]
    pub fn accuracy_percent(&self) -> f64 {
        self.correct_count() as f64 / self.questions.len() as f64 * 100.0
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.finished_at.is_some()
    }

    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        QuizProgress {
            total: self.questions.len(),
            answered: self.answers.len(),
            remaining: self.questions.len().saturating_sub(self.answers.len()),
            is_complete: self.is_complete(),
        }
    }

    /// Submits an answer for the current question and advances.
    ///
    /// A correct answer adds the configured points. Answering the last
    /// question marks the session finished at `answered_at`.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Finished` when the session is already complete and
    /// `QuizError::InvalidOption` when the index is outside the option range.
    pub fn answer_current(
        &mut self,
        option_index: usize,
        answered_at: DateTime<Utc>,
    ) -> Result<&AnsweredQuestion, QuizError> {
        if option_index >= OPTIONS_PER_QUESTION {
            return Err(QuizError::InvalidOption {
                index: option_index,
            });
        }
        let Some(question) = self.current_question() else {
            return Err(QuizError::Finished);
        };

        let answered = AnsweredQuestion::new(question.clone(), option_index);
        if answered.is_correct() {
            self.score = self
                .score
                .saturating_add(self.settings.points_per_correct());
        }
        self.answers.push(answered);

        self.current += 1;
        if self.current >= self.questions.len() {
            self.finished_at = Some(answered_at);
        }

        self.answers.last().ok_or(QuizError::Finished)
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("difficulty", &self.difficulty)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("score", &self.score)
            .field("answers_len", &self.answers.len())
            .field("finished_at", &self.finished_at)
            .field("result_id", &self.result_id)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn build_question(n: usize, correct: usize) -> Question {
        Question::new(
            format!("Q{n}"),
            vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct,
            format!("E{n}"),
            Difficulty::Normal,
        )
        .unwrap()
    }

    fn five_questions() -> Vec<Question> {
        (0..5).map(|n| build_question(n, n % 4)).collect()
    }

    fn start() -> QuizSession {
        QuizSession::new(
            Difficulty::Normal,
            five_questions(),
            QuizSettings::default(),
            fixed_now(),
        )
        .unwrap()
    }

    #[test]
    fn rejects_empty_question_list() {
        let err = QuizSession::new(
            Difficulty::Easy,
            Vec::new(),
            QuizSettings::default(),
            fixed_now(),
        )
        .unwrap_err();
        assert_eq!(err, QuizError::Empty);
    }

    #[test]
    fn rejects_wrong_question_count() {
        let err = QuizSession::new(
            Difficulty::Easy,
            vec![build_question(0, 0)],
            QuizSettings::default(),
            fixed_now(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            QuizError::CountMismatch {
                expected: 5,
                got: 1
            }
        );
    }

    #[test]
    fn scores_ten_points_per_correct_answer() {
        let mut session = start();
        // correct indexes are 0,1,2,3,0: answer the first three right, the rest wrong
        for choice in [0, 1, 2, 0, 1] {
            session.answer_current(choice, fixed_now()).unwrap();
        }

        assert!(session.is_complete());
        assert_eq!(session.correct_count(), 3);
        assert_eq!(session.score(), 30);
        assert!((session.accuracy_percent() - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn preserves_source_order() {
        let session = start();
        let prompts: Vec<_> = session.questions().iter().map(Question::prompt).collect();
        assert_eq!(prompts, vec!["Q0", "Q1", "Q2", "Q3", "Q4"]);
    }

    #[test]
    fn advances_and_completes() {
        let mut session = start();
        assert_eq!(session.question_number(), 1);
        assert!(!session.is_complete());

        for _ in 0..4 {
            session.answer_current(0, fixed_now()).unwrap();
        }
        assert!(!session.is_complete());
        assert_eq!(session.progress().remaining, 1);

        session.answer_current(0, fixed_now()).unwrap();
        assert!(session.is_complete());
        assert_eq!(session.finished_at(), Some(fixed_now()));
        assert!(session.current_question().is_none());
    }

    #[test]
    fn refuses_answers_after_completion() {
        let mut session = start();
        for _ in 0..5 {
            session.answer_current(0, fixed_now()).unwrap();
        }
        let err = session.answer_current(0, fixed_now()).unwrap_err();
        assert_eq!(err, QuizError::Finished);
    }

    #[test]
    fn refuses_out_of_range_option() {
        let mut session = start();
        let err = session.answer_current(4, fixed_now()).unwrap_err();
        assert_eq!(err, QuizError::InvalidOption { index: 4 });
        // state unchanged
        assert_eq!(session.answers().len(), 0);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn records_every_answer_in_order() {
        let mut session = start();
        session.answer_current(0, fixed_now()).unwrap();
        session.answer_current(3, fixed_now()).unwrap();
        assert_eq!(session.answers().len(), 2);
        assert_eq!(session.answers()[0].question().prompt(), "Q0");
        assert_eq!(session.answers()[1].question().prompt(), "Q1");
        assert_eq!(session.last_answer().unwrap().chosen_index(), 3);
    }
}
