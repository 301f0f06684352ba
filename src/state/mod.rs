//! State management for AnalystTrack.
//!
//! This module provides centralized state management with a unidirectional
//! data flow pattern inspired by Redux/Elm architecture. Snapshots from
//! live subscriptions arrive as actions and replace their slice of state
//! wholesale.

mod app_state;
mod directory_state;
mod session_state;
mod submit_form;

pub use app_state::{AppState, InputMode, View};
pub use directory_state::{AnalystState, PredictionState};
pub use session_state::{AuthField, AuthForm, AuthMode, SessionState};
pub use submit_form::{SubmitField, SubmitForm};

use crate::model::{PredictionView, UserProfile};
use crate::services::Session;
use std::time::Instant;

/// Actions that can be dispatched to modify state.
#[derive(Debug, Clone)]
pub enum Action {
    // Navigation
    SetView(View),
    NextView,
    SetInputMode(InputMode),

    // Session
    SessionChanged(Option<Session>),
    SubmitAuth,
    AuthFailed(String),
    ToggleAuthMode,
    Logout,

    // Live data
    AnalystsLoaded(Vec<UserProfile>),
    PredictionsLoaded(Vec<PredictionView>),

    // Submission
    SubmitPrediction,
    PredictionSubmitted(String),
    SubmissionFailed(String),

    // Form editing
    InputChar(char),
    Paste(String),
    DeleteChar,
    NextField,
    PrevField,
    CycleOption(i32),

    // UI actions
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    GoToTop,
    GoToBottom,
    ToggleHelp,
    ShowNotification(Notification),
    DismissNotification,
    Tick,

    // Error handling
    SetError(String),
    ClearError,

    // Quit
    Quit,
}

/// A notification to display to the user.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    pub duration_secs: u64,
}

/// Notification severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl Notification {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Info,
            duration_secs: 3,
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Success,
            duration_secs: 3,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Warning,
            duration_secs: 5,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NotificationLevel::Error,
            duration_secs: 10,
        }
    }
}

/// The global state store.
#[derive(Debug, Default)]
pub struct Store {
    /// Application state.
    pub app: AppState,
    /// Session state.
    pub session: SessionState,
    /// Login / sign-up form.
    pub auth_form: AuthForm,
    /// Analyst directory.
    pub analysts: AnalystState,
    /// Prediction list.
    pub predictions: PredictionState,
    /// Submission form.
    pub submit_form: SubmitForm,
}

impl Store {
    /// Create an empty, signed-out store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether keystrokes currently go to a form.
    pub fn is_editing(&self) -> bool {
        !self.session.is_signed_in() || self.app.is_editing()
    }

    /// Apply an action to update state.
    pub fn reduce(&mut self, action: Action) {
        match action {
            // Navigation
            Action::SetView(view) => self.set_view(view),
            Action::NextView => self.set_view(self.app.current_view.next()),
            Action::SetInputMode(mode) => self.app.input_mode = mode,

            // Session
            Action::SessionChanged(session) => self.session_changed(session),
            Action::SubmitAuth => {
                self.auth_form.submitting = true;
                self.auth_form.error = None;
            }
            Action::AuthFailed(message) => {
                self.auth_form.submitting = false;
                self.auth_form.error = Some(message);
            }
            Action::ToggleAuthMode => self.auth_form.toggle_mode(),
            Action::Logout => {}

            // Live data
            Action::AnalystsLoaded(analysts) => self.analysts.replace(analysts),
            Action::PredictionsLoaded(predictions) => self.predictions.replace(predictions),

            // Submission
            Action::SubmitPrediction => self.submit_form.submitting = true,
            Action::PredictionSubmitted(_) => {
                self.submit_form.reset();
                self.app.input_mode = InputMode::Normal;
                self.app
                    .notify(Notification::success("Prediction submitted successfully!"));
            }
            Action::SubmissionFailed(message) => {
                self.submit_form.submitting = false;
                self.app.notify(Notification::error(message));
            }

            // Form editing
            Action::InputChar(c) => self.edit_form(|auth| auth.push_char(c), |form| form.push_char(c)),
            Action::Paste(text) => self.edit_form(
                |auth| text.chars().for_each(|c| auth.push_char(c)),
                |form| text.chars().for_each(|c| form.push_char(c)),
            ),
            Action::DeleteChar => self.edit_form(AuthForm::pop_char, SubmitForm::pop_char),
            Action::NextField => self.edit_form(|auth| auth.move_focus(1), |form| form.move_focus(1)),
            Action::PrevField => {
                self.edit_form(|auth| auth.move_focus(-1), |form| form.move_focus(-1))
            }
            Action::CycleOption(delta) => self.edit_form(
                |auth| auth.cycle_option(delta),
                |form| form.cycle_option(delta),
            ),

            // UI actions
            Action::ScrollUp => self.scroll(-1),
            Action::ScrollDown => self.scroll(1),
            Action::PageUp => self.scroll(-10),
            Action::PageDown => self.scroll(10),
            Action::GoToTop => self.go_to_top(),
            Action::GoToBottom => self.go_to_bottom(),
            Action::ToggleHelp => self.app.show_help = !self.app.show_help,
            Action::ShowNotification(notification) => self.app.notify(notification),
            Action::DismissNotification => self.app.dismiss_notification(),
            Action::Tick => self.app.expire_notification(Instant::now()),

            // Error handling
            Action::SetError(error) => {
                self.app.error = Some(error);
            }
            Action::ClearError => {
                self.app.error = None;
            }

            // Quit
            Action::Quit => {
                self.app.should_quit = true;
            }
        }
    }

    fn set_view(&mut self, view: View) {
        if self.app.current_view == View::Submit && view != View::Submit {
            // Unsaved edits are discarded on the way out.
            self.submit_form.reset();
        }
        let changed = view != self.app.current_view;
        self.app.current_view = view;
        self.app.input_mode = InputMode::Normal;
        if !changed {
            // The open feed keeps running; no new snapshot is coming.
            return;
        }
        match view {
            View::Browse => self.analysts.loading = true,
            View::Predictions => self.predictions.loading = true,
            View::Submit => {}
        }
    }

    fn session_changed(&mut self, session: Option<Session>) {
        self.session.resolved = true;
        self.auth_form.submitting = false;
        match session {
            Some(session) => {
                self.session.current = Some(session);
                self.auth_form.clear();
            }
            None => {
                self.session.current = None;
                self.analysts = AnalystState::default();
                self.predictions = PredictionState::default();
                self.submit_form.reset();
                self.app.current_view = View::default();
                self.app.input_mode = InputMode::Normal;
            }
        }
    }

    fn edit_form(&mut self, auth: impl FnOnce(&mut AuthForm), submit: impl FnOnce(&mut SubmitForm)) {
        if !self.session.is_signed_in() {
            if !self.auth_form.submitting {
                auth(&mut self.auth_form);
            }
        } else if self.app.current_view == View::Submit && self.app.is_editing() {
            submit(&mut self.submit_form);
        }
    }

    fn scroll(&mut self, delta: i32) {
        match self.app.current_view {
            View::Browse => {
                self.analysts.selected_index =
                    scrolled(self.analysts.selected_index, delta, self.analysts.analysts.len());
            }
            View::Predictions => {
                self.predictions.selected_index = scrolled(
                    self.predictions.selected_index,
                    delta,
                    self.predictions.predictions.len(),
                );
            }
            View::Submit => {}
        }
    }

    fn go_to_top(&mut self) {
        match self.app.current_view {
            View::Browse if !self.analysts.analysts.is_empty() => {
                self.analysts.selected_index = Some(0)
            }
            View::Predictions if !self.predictions.predictions.is_empty() => {
                self.predictions.selected_index = Some(0)
            }
            _ => {}
        }
    }

    fn go_to_bottom(&mut self) {
        match self.app.current_view {
            View::Browse => {
                self.analysts.selected_index = self.analysts.analysts.len().checked_sub(1);
            }
            View::Predictions => {
                self.predictions.selected_index = self.predictions.predictions.len().checked_sub(1);
            }
            View::Submit => {}
        }
    }
}

fn scrolled(current: Option<usize>, delta: i32, len: usize) -> Option<usize> {
    let max_index = len.checked_sub(1)? as i32;
    let current = current.unwrap_or(0) as i32;
    Some((current + delta).clamp(0, max_index) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Principal;
    use pretty_assertions::assert_eq;

    fn store() -> Store {
        Store::new()
    }

    fn signed_in(store: &mut Store) {
        store.reduce(Action::SessionChanged(Some(Session {
            principal: Principal {
                uid: "u1".into(),
                email: "jane@example.com".into(),
                display_name: Some("Jane Doe".into()),
            },
            profile: Some(UserProfile::new("u1", "Jane Doe", "jane@example.com", "")),
        })));
    }

    fn type_text(store: &mut Store, text: &str) {
        for c in text.chars() {
            store.reduce(Action::InputChar(c));
        }
    }

    #[test]
    fn test_signed_out_typing_goes_to_login_form() {
        let mut store = store();
        assert!(store.is_editing());
        type_text(&mut store, "jane@example.com");
        assert_eq!(store.auth_form.email, "jane@example.com");
    }

    #[test]
    fn test_auth_failure_shows_inline_error() {
        let mut store = store();
        store.reduce(Action::SubmitAuth);
        assert!(store.auth_form.submitting);
        store.reduce(Action::AuthFailed("The password is invalid.".into()));
        assert!(!store.auth_form.submitting);
        assert_eq!(store.auth_form.error.as_deref(), Some("The password is invalid."));
    }

    #[test]
    fn test_session_change_clears_login_form() {
        let mut store = store();
        type_text(&mut store, "jane@example.com");
        signed_in(&mut store);
        assert!(store.session.is_signed_in());
        assert_eq!(store.session.display_name(), Some("Jane Doe"));
        assert!(store.auth_form.email.is_empty());
        assert!(!store.is_editing());
    }

    #[test]
    fn test_typing_ignored_outside_submit_editing() {
        let mut store = store();
        signed_in(&mut store);
        store.reduce(Action::SetView(View::Submit));
        type_text(&mut store, "aapl");
        assert!(store.submit_form.draft.stock.is_empty());

        store.reduce(Action::SetInputMode(InputMode::Editing));
        type_text(&mut store, "aapl");
        assert_eq!(store.submit_form.draft.stock, "aapl");
    }

    #[test]
    fn test_leaving_submit_discards_draft() {
        let mut store = store();
        signed_in(&mut store);
        store.reduce(Action::SetView(View::Submit));
        store.reduce(Action::SetInputMode(InputMode::Editing));
        type_text(&mut store, "msft");

        store.reduce(Action::NextView);
        assert_eq!(store.app.current_view, View::Browse);
        assert_eq!(store.app.input_mode, InputMode::Normal);
        assert!(store.submit_form.draft.stock.is_empty());
    }

    #[test]
    fn test_successful_submit_resets_form() {
        let mut store = store();
        signed_in(&mut store);
        store.reduce(Action::SetView(View::Submit));
        store.reduce(Action::SetInputMode(InputMode::Editing));
        type_text(&mut store, "aapl");
        store.reduce(Action::SubmitPrediction);
        assert!(store.submit_form.submitting);

        store.reduce(Action::PredictionSubmitted("p1".into()));
        assert!(store.submit_form.draft.stock.is_empty());
        assert!(!store.submit_form.submitting);
        assert_eq!(
            store.app.notification,
            Some(Notification::success("Prediction submitted successfully!"))
        );
    }

    #[test]
    fn test_failed_submit_keeps_draft() {
        let mut store = store();
        signed_in(&mut store);
        store.reduce(Action::SetView(View::Submit));
        store.reduce(Action::SetInputMode(InputMode::Editing));
        type_text(&mut store, "aapl");
        store.reduce(Action::SubmitPrediction);
        store.reduce(Action::SubmissionFailed("Failed to submit prediction. Please try again.".into()));

        assert_eq!(store.submit_form.draft.stock, "aapl");
        assert!(!store.submit_form.submitting);
        assert_eq!(
            store.app.notification.map(|n| n.level),
            Some(NotificationLevel::Error)
        );
    }

    #[test]
    fn test_sign_out_resets_everything() {
        let mut store = store();
        signed_in(&mut store);
        store.reduce(Action::SetView(View::Predictions));
        store.reduce(Action::AnalystsLoaded(vec![UserProfile::new("a", "A", "", "")]));
        store.reduce(Action::SessionChanged(None));

        assert!(!store.session.is_signed_in());
        assert!(store.session.resolved);
        assert_eq!(store.app.current_view, View::Browse);
        assert!(store.analysts.analysts.is_empty());
    }

    #[test]
    fn test_paste_goes_to_focused_field() {
        let mut store = store();
        store.reduce(Action::Paste("jane@example.com".into()));
        assert_eq!(store.auth_form.email, "jane@example.com");
    }

    #[test]
    fn test_tick_expires_old_notification() {
        let mut store = store();
        store.reduce(Action::ShowNotification(Notification::info("Saved")));
        store.reduce(Action::Tick);
        assert!(store.app.notification.is_some());

        store.app.notification_shown_at = Instant::now().checked_sub(std::time::Duration::from_secs(4));
        store.reduce(Action::Tick);
        assert_eq!(store.app.notification, None);
    }

    #[test]
    fn test_reselecting_current_tab_keeps_loaded_list() {
        let mut store = store();
        signed_in(&mut store);
        store.reduce(Action::AnalystsLoaded(vec![]));
        assert!(!store.analysts.loading);

        store.reduce(Action::SetView(View::Browse));
        assert_eq!(store.app.current_view, View::Browse);
        assert!(!store.analysts.loading);

        store.reduce(Action::SetView(View::Predictions));
        assert!(store.predictions.loading);
    }

    #[test]
    fn test_scroll_stays_in_bounds() {
        let mut store = store();
        signed_in(&mut store);
        store.reduce(Action::AnalystsLoaded(vec![
            UserProfile::new("a", "A", "", ""),
            UserProfile::new("b", "B", "", ""),
        ]));
        store.reduce(Action::PageDown);
        assert_eq!(store.analysts.selected_index, Some(1));
        store.reduce(Action::PageUp);
        assert_eq!(store.analysts.selected_index, Some(0));
        store.reduce(Action::GoToBottom);
        assert_eq!(store.analysts.selected_index, Some(1));
    }
}
