mod ids;
mod profile;
mod question;
mod session;
mod settings;

pub use ids::UserId;

pub use profile::{Identity, LeaderboardEntry, QuizResultRecord, ResultRecordError, UserProfile};
pub use question::{
    AnsweredQuestion, Difficulty, OPTIONS_PER_QUESTION, Question, QuestionError,
};
pub use session::{QuizError, QuizProgress, QuizSession};
pub use settings::{QuizSettings, SettingsError};
