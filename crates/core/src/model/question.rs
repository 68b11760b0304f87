use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Every question carries exactly this many answer options.
pub const OPTIONS_PER_QUESTION: usize = 4;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("expected {expected} options, got {got}")]
    WrongOptionCount { expected: usize, got: usize },

    #[error("correct option index {index} is out of range")]
    CorrectIndexOutOfRange { index: usize },
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

/// Difficulty levels offered when starting a quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }

    /// Parses a difficulty label.
    ///
    /// Unknown labels yield `None`; callers fall back to the default framing.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Framing sent to the question source for this level.
    #[must_use]
    pub fn prompt_hint(self) -> &'static str {
        match self {
            Difficulty::Easy => "very basic general-knowledge that a primary school student would know",
            Difficulty::Normal => "general-knowledge at a secondary school level",
            Difficulty::Hard => "advanced general-knowledge that a university student or adult would know",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single four-option multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    prompt: String,
    options: Vec<String>,
    correct_index: usize,
    explanation: String,
    difficulty: Difficulty,
}

impl Question {
    /// Builds a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when the prompt is empty, the option count is
    /// not [`OPTIONS_PER_QUESTION`], or `correct_index` falls outside it.
    pub fn new(
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_index: usize,
        explanation: impl Into<String>,
        difficulty: Difficulty,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if options.len() != OPTIONS_PER_QUESTION {
            return Err(QuestionError::WrongOptionCount {
                expected: OPTIONS_PER_QUESTION,
                got: options.len(),
            });
        }
        if correct_index >= OPTIONS_PER_QUESTION {
            return Err(QuestionError::CorrectIndexOutOfRange {
                index: correct_index,
            });
        }

        Ok(Self {
            prompt,
            options,
            correct_index,
            explanation: explanation.into(),
            difficulty,
        })
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn option(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    #[must_use]
    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_index]
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Whether choosing `index` answers this question correctly.
    #[must_use]
    pub fn is_correct(&self, index: usize) -> bool {
        index == self.correct_index
    }
}

//
// ─── ANSWERED QUESTION ─────────────────────────────────────────────────────────
//

/// Record of one submitted answer. Append-only within a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnsweredQuestion {
    question: Question,
    chosen_index: usize,
    correct: bool,
}

impl AnsweredQuestion {
    #[must_use]
    pub fn new(question: Question, chosen_index: usize) -> Self {
        let correct = question.is_correct(chosen_index);
        Self {
            question,
            chosen_index,
            correct,
        }
    }

    #[must_use]
    pub fn question(&self) -> &Question {
        &self.question
    }

    #[must_use]
    pub fn chosen_index(&self) -> usize {
        self.chosen_index
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.correct
    }

    #[must_use]
    pub fn explanation(&self) -> &str {
        self.question.explanation()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Vec<String> {
        vec!["a".into(), "b".into(), "c".into(), "d".into()]
    }

    #[test]
    fn builds_valid_question() {
        let q = Question::new("Capital of France?", options(), 2, "Paris.", Difficulty::Easy)
            .unwrap();
        assert_eq!(q.correct_option(), "c");
        assert!(q.is_correct(2));
        assert!(!q.is_correct(0));
    }

    #[test]
    fn rejects_wrong_option_count() {
        let err = Question::new(
            "Q",
            vec!["a".into(), "b".into()],
            0,
            "",
            Difficulty::Normal,
        )
        .unwrap_err();
        assert_eq!(
            err,
            QuestionError::WrongOptionCount {
                expected: OPTIONS_PER_QUESTION,
                got: 2
            }
        );
    }

    #[test]
    fn rejects_out_of_range_correct_index() {
        let err = Question::new("Q", options(), 4, "", Difficulty::Normal).unwrap_err();
        assert_eq!(err, QuestionError::CorrectIndexOutOfRange { index: 4 });
    }

    #[test]
    fn rejects_blank_prompt() {
        let err = Question::new("   ", options(), 0, "", Difficulty::Hard).unwrap_err();
        assert_eq!(err, QuestionError::EmptyPrompt);
    }

    #[test]
    fn difficulty_labels_round_trip() {
        for level in Difficulty::ALL {
            assert_eq!(Difficulty::from_label(level.as_str()), Some(level));
        }
        assert_eq!(Difficulty::from_label("EASY"), Some(Difficulty::Easy));
        assert_eq!(Difficulty::from_label("impossible"), None);
    }

    #[test]
    fn answered_question_records_correctness() {
        let q = Question::new("Q", options(), 1, "because", Difficulty::Normal).unwrap();
        let right = AnsweredQuestion::new(q.clone(), 1);
        assert!(right.is_correct());
        let wrong = AnsweredQuestion::new(q, 3);
        assert!(!wrong.is_correct());
        assert_eq!(wrong.chosen_index(), 3);
        assert_eq!(wrong.explanation(), "because");
    }
}
