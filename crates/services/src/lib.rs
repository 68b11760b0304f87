#![forbid(unsafe_code)]

pub mod account_service;
pub mod error;
pub mod question_source;
pub mod quiz_flow;
pub mod scoreboard_service;
pub mod session_state;

pub use quiz_core::Clock;

pub use account_service::{AccountService, MIN_PASSWORD_LEN};
pub use error::{AccountError, QuestionSourceError, QuizFlowError, ValidationError};
pub use question_source::{OpenAiQuestionService, QuestionSource, QuestionSourceConfig};
pub use quiz_flow::{AnswerOutcome, QuizFlowService};
pub use scoreboard_service::{HistoryStats, ScoreboardService};
pub use session_state::SessionState;
