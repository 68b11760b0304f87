use std::sync::Arc;

use quiz_core::model::QuizSettings;
use services::{AccountService, QuizFlowService, ScoreboardService};

/// What the binary must provide for the UI to run.
pub trait UiApp: Send + Sync {
    fn accounts(&self) -> Arc<AccountService>;
    fn quiz_flow(&self) -> Arc<QuizFlowService>;
    fn scoreboard(&self) -> Arc<ScoreboardService>;

    /// False when no persistence backend is configured; the UI then offers
    /// only the demo flow.
    fn auth_enabled(&self) -> bool;

    /// False when the question source has no API key; quizzes cannot start.
    fn questions_enabled(&self) -> bool;
}

#[derive(Clone)]
pub struct AppContext {
    accounts: Arc<AccountService>,
    quiz_flow: Arc<QuizFlowService>,
    scoreboard: Arc<ScoreboardService>,
    auth_enabled: bool,
    questions_enabled: bool,
    settings: QuizSettings,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        let quiz_flow = app.quiz_flow();
        let settings = quiz_flow.settings();
        Self {
            accounts: app.accounts(),
            quiz_flow,
            scoreboard: app.scoreboard(),
            auth_enabled: app.auth_enabled(),
            questions_enabled: app.questions_enabled(),
            settings,
        }
    }

    #[must_use]
    pub fn accounts(&self) -> Arc<AccountService> {
        Arc::clone(&self.accounts)
    }

    #[must_use]
    pub fn quiz_flow(&self) -> Arc<QuizFlowService> {
        Arc::clone(&self.quiz_flow)
    }

    #[must_use]
    pub fn scoreboard(&self) -> Arc<ScoreboardService> {
        Arc::clone(&self.scoreboard)
    }

    #[must_use]
    pub fn auth_enabled(&self) -> bool {
        self.auth_enabled
    }

    #[must_use]
    pub fn questions_enabled(&self) -> bool {
        self.questions_enabled
    }

    #[must_use]
    pub fn settings(&self) -> QuizSettings {
        self.settings
    }
}

// This context is provided by the application composition root (`crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
