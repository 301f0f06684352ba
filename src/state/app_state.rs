//! Application-level state.

use super::Notification;
use std::time::{Duration, Instant};

/// The tabs shown once signed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Browse,
    Predictions,
    Submit,
}

impl View {
    /// Every tab, in display order.
    pub const ALL: [View; 3] = [View::Browse, View::Predictions, View::Submit];

    /// The tab after this one, wrapping around.
    pub fn next(self) -> Self {
        match self {
            Self::Browse => Self::Predictions,
            Self::Predictions => Self::Submit,
            Self::Submit => Self::Browse,
        }
    }

    /// Tab label.
    pub fn title(self) -> &'static str {
        match self {
            Self::Browse => "Browse Analysts",
            Self::Predictions => "All Predictions",
            Self::Submit => "Submit Prediction",
        }
    }
}

/// Input mode for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Keystrokes go into the focused form field.
    Editing,
}

/// Global application state.
#[derive(Debug, Default)]
pub struct AppState {
    /// Current view.
    pub current_view: View,
    /// Current input mode.
    pub input_mode: InputMode,
    /// Whether to show help overlay.
    pub show_help: bool,
    /// Current notification.
    pub notification: Option<Notification>,
    /// When the current notification appeared.
    pub notification_shown_at: Option<Instant>,
    /// Current error message.
    pub error: Option<String>,
    /// Whether the app should quit.
    pub should_quit: bool,
}

impl AppState {
    /// Check if keystrokes go to a form.
    pub fn is_editing(&self) -> bool {
        self.input_mode == InputMode::Editing
    }

    /// Show a notification, replacing any current one.
    pub fn notify(&mut self, notification: Notification) {
        self.notification = Some(notification);
        self.notification_shown_at = Some(Instant::now());
    }

    /// Hide the current notification.
    pub fn dismiss_notification(&mut self) {
        self.notification = None;
        self.notification_shown_at = None;
    }

    /// Hide the notification once it has been visible for its duration.
    pub fn expire_notification(&mut self, now: Instant) {
        let (Some(notification), Some(shown_at)) = (&self.notification, self.notification_shown_at)
        else {
            return;
        };
        if now.saturating_duration_since(shown_at) >= Duration::from_secs(notification.duration_secs) {
            self.dismiss_notification();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_cycle_visits_every_tab() {
        let mut view = View::default();
        let mut seen = Vec::new();
        for _ in 0..View::ALL.len() {
            seen.push(view);
            view = view.next();
        }
        assert_eq!(seen, View::ALL);
        assert_eq!(view, View::Browse);
    }
}
