//! UI rendering using ratatui.
//!
//! This module contains all TUI components and rendering logic.

mod layout;
mod widgets;

pub use layout::Layout;
pub use widgets::{
    AnalystList, HelpPanel, LoginForm, PredictionList, StatusBar, SubmitFormView, TabBar,
};

use crate::config::Config;
use crate::state::{Store, View};
use ratatui::Frame;

/// Main UI renderer.
pub struct Ui;

impl Ui {
    /// Render the entire UI.
    pub fn render(frame: &mut Frame, store: &Store, config: &Config) {
        let layout = Layout::new(frame.area(), config.ui.show_status_bar);

        StatusBar::render(frame, layout.status_area, store);

        if store.session.is_signed_in() {
            TabBar::render(frame, layout.tab_area, store);

            match store.app.current_view {
                View::Browse => AnalystList::render(frame, layout.main_area, store),
                View::Predictions => PredictionList::render(frame, layout.main_area, store),
                View::Submit => SubmitFormView::render(frame, layout.main_area, store),
            }
        } else {
            LoginForm::render(frame, layout.main_area, store);
        }

        // Render help panel if visible
        if store.app.show_help {
            HelpPanel::render(frame, frame.area(), &config.keybindings);
        }

        // Render notification if present
        if let Some(notification) = &store.app.notification {
            widgets::render_notification(frame, layout.notification_area, notification);
        }

        // Render error if present
        if let Some(error) = &store.app.error {
            widgets::render_error(frame, layout.notification_area, error);
        }
    }
}
