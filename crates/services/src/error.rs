//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{QuizError, ResultRecordError};
use storage::repository::StorageError;

/// Errors emitted by a question source.
///
/// The quiz flow collapses every variant into "no questions available"; the
/// variants exist so the failure can be logged with its actual cause.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuestionSourceError {
    #[error("question generation is not configured")]
    Disabled,
    #[error("question source returned an empty response")]
    EmptyResponse,
    #[error("question source request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("question source returned malformed data: {0}")]
    Malformed(String),
    #[error("question source produced {generated} of {requested} requested questions")]
    NotEnough { requested: usize, generated: usize },
}

/// User-input failures caught before any external call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("username cannot be empty")]
    EmptyUsername,
    #[error("email cannot be empty")]
    EmptyEmail,
    #[error("password cannot be empty")]
    EmptyPassword,
    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },
    #[error("passwords do not match")]
    PasswordMismatch,
}

/// Errors emitted by `AccountService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AccountError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("email is already registered")]
    EmailTaken,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `QuizFlowService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizFlowError {
    #[error("no questions available")]
    NoQuestions,
    #[error("no player identity for this session")]
    NoIdentity,
    #[error("a quiz is already in progress")]
    AlreadyRunning,
    #[error("no quiz in progress")]
    NotStarted,
    #[error("quiz is not finished yet")]
    NotFinished,
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Record(#[from] ResultRecordError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
