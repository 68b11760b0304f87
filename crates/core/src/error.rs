use thiserror::Error;

use crate::model::{QuestionError, QuizError, SettingsError};

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),

    #[error(transparent)]
    Quiz(#[from] QuizError),

    #[error(transparent)]
    Settings(#[from] SettingsError),
}
