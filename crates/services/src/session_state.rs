use quiz_core::model::{Identity, QuizResultRecord, QuizSession, UserProfile};

use crate::error::ValidationError;

/// Per-interaction session context.
///
/// Every state transition goes through this object; there are no ambient
/// globals. Demo history lives here and nowhere else — it is discarded with
/// the session.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    identity: Option<Identity>,
    quiz: Option<QuizSession>,
    show_last_answer: bool,
    demo_history: Vec<QuizResultRecord>,
}

impl SessionState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    #[must_use]
    pub fn is_demo(&self) -> bool {
        matches!(self.identity, Some(Identity::Anonymous { .. }))
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self.identity, Some(Identity::Authenticated(_)))
    }

    /// Adopts an authenticated profile as the session identity.
    pub fn sign_in(&mut self, profile: UserProfile) {
        self.identity = Some(Identity::Authenticated(profile));
        self.quiz = None;
        self.show_last_answer = false;
        self.demo_history.clear();
    }

    /// Enters demo mode under a display name.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyUsername` for a blank name.
    pub fn enter_demo(&mut self, display_name: &str) -> Result<(), ValidationError> {
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err(ValidationError::EmptyUsername);
        }
        self.identity = Some(Identity::Anonymous {
            display_name: display_name.to_string(),
        });
        self.quiz = None;
        self.show_last_answer = false;
        self.demo_history.clear();
        Ok(())
    }

    /// Clears identity and every quiz-related field. Demo history does not
    /// survive this.
    pub fn sign_out(&mut self) {
        self.identity = None;
        self.quiz = None;
        self.show_last_answer = false;
        self.demo_history.clear();
    }

    #[must_use]
    pub fn quiz(&self) -> Option<&QuizSession> {
        self.quiz.as_ref()
    }

    pub(crate) fn quiz_mut(&mut self) -> Option<&mut QuizSession> {
        self.quiz.as_mut()
    }

    pub(crate) fn set_quiz(&mut self, quiz: QuizSession) {
        self.quiz = Some(quiz);
        self.show_last_answer = false;
    }

    /// Drops the current quiz while keeping identity and history.
    pub fn clear_quiz(&mut self) {
        self.quiz = None;
        self.show_last_answer = false;
    }

    /// One-shot flag: whether the result of the previous answer should be
    /// shown above the next question.
    pub fn take_show_last_answer(&mut self) -> bool {
        std::mem::take(&mut self.show_last_answer)
    }

    #[must_use]
    pub fn show_last_answer(&self) -> bool {
        self.show_last_answer
    }

    pub(crate) fn set_show_last_answer(&mut self, show: bool) {
        self.show_last_answer = show;
    }

    #[must_use]
    pub fn demo_history(&self) -> &[QuizResultRecord] {
        &self.demo_history
    }

    /// Appends a demo result and returns its session-local sequence number.
    pub(crate) fn push_demo_result(&mut self, record: QuizResultRecord) -> i64 {
        self.demo_history.push(record);
        self.demo_history.len() as i64
    }

    /// Folds a freshly persisted result into the held profile so the sidebar
    /// totals match the store without a re-read.
    pub(crate) fn apply_result_to_profile(&mut self, score: u32) {
        if let Some(Identity::Authenticated(profile)) = self.identity.as_mut() {
            profile.apply_result(score);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{Difficulty, UserId};
    use quiz_core::time::fixed_now;

    #[test]
    fn enter_demo_requires_a_name() {
        let mut state = SessionState::new();
        assert_eq!(
            state.enter_demo("   ").unwrap_err(),
            ValidationError::EmptyUsername
        );
        assert!(state.identity().is_none());

        state.enter_demo("  guest  ").unwrap();
        assert!(state.is_demo());
        assert_eq!(state.identity().unwrap().display_name(), "guest");
    }

    #[test]
    fn sign_out_clears_everything() {
        let mut state = SessionState::new();
        state.enter_demo("guest").unwrap();
        state.push_demo_result(
            QuizResultRecord::new(30, 5, Difficulty::Easy, fixed_now()).unwrap(),
        );
        state.sign_out();

        assert!(state.identity().is_none());
        assert!(state.quiz().is_none());
        assert!(state.demo_history().is_empty());
    }

    #[test]
    fn clear_quiz_keeps_identity_and_history() {
        let mut state = SessionState::new();
        state.enter_demo("guest").unwrap();
        state.push_demo_result(
            QuizResultRecord::new(30, 5, Difficulty::Easy, fixed_now()).unwrap(),
        );
        state.clear_quiz();

        assert!(state.is_demo());
        assert_eq!(state.demo_history().len(), 1);
    }

    #[test]
    fn show_last_answer_is_one_shot() {
        let mut state = SessionState::new();
        state.set_show_last_answer(true);
        assert!(state.take_show_last_answer());
        assert!(!state.take_show_last_answer());
    }

    #[test]
    fn apply_result_updates_held_profile_only_when_authenticated() {
        let mut state = SessionState::new();
        state.enter_demo("guest").unwrap();
        state.apply_result_to_profile(30);
        assert!(state.identity().unwrap().profile().is_none());

        state.sign_in(UserProfile::new(UserId::new("u1"), "alice", "a@example.com"));
        state.apply_result_to_profile(30);
        let profile = state.identity().unwrap().profile().unwrap();
        assert_eq!(profile.total_score(), 30);
        assert_eq!(profile.quiz_count(), 1);
    }
}
