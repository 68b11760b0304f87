use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("questions per quiz must be > 0")]
    InvalidQuestionsPerQuiz,

    #[error("points per correct answer must be > 0")]
    InvalidPointsPerCorrect,
}

/// Configuration for quiz length and scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizSettings {
    questions_per_quiz: u32,
    points_per_correct: u32,
}

impl QuizSettings {
    /// Creates custom settings.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if either value is zero.
    pub fn new(questions_per_quiz: u32, points_per_correct: u32) -> Result<Self, SettingsError> {
        if questions_per_quiz == 0 {
            return Err(SettingsError::InvalidQuestionsPerQuiz);
        }
        if points_per_correct == 0 {
            return Err(SettingsError::InvalidPointsPerCorrect);
        }
        Ok(Self {
            questions_per_quiz,
            points_per_correct,
        })
    }

    #[must_use]
    pub fn questions_per_quiz(&self) -> u32 {
        self.questions_per_quiz
    }

    #[must_use]
    pub fn points_per_correct(&self) -> u32 {
        self.points_per_correct
    }

    /// Maximum score a single quiz can reach.
    #[must_use]
    pub fn max_score(&self) -> u32 {
        self.questions_per_quiz.saturating_mul(self.points_per_correct)
    }
}

impl Default for QuizSettings {
    /// Five questions per quiz, ten points per correct answer.
    fn default() -> Self {
        Self {
            questions_per_quiz: 5,
            points_per_correct: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings() {
        let settings = QuizSettings::default();
        assert_eq!(settings.questions_per_quiz(), 5);
        assert_eq!(settings.points_per_correct(), 10);
        assert_eq!(settings.max_score(), 50);
    }

    #[test]
    fn rejects_zero_values() {
        assert_eq!(
            QuizSettings::new(0, 10).unwrap_err(),
            SettingsError::InvalidQuestionsPerQuiz
        );
        assert_eq!(
            QuizSettings::new(5, 0).unwrap_err(),
            SettingsError::InvalidPointsPerCorrect
        );
    }
}
