//! Event handler for processing input events.

use super::{Event, InputEvent};
use crate::config::KeyBindings;
use crate::state::{Action, InputMode, Store, View};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind};

/// Turns terminal events into actions.
pub struct EventHandler {
    /// Key bindings.
    keybindings: KeyBindings,
    /// Store state relevant to key handling.
    store_snapshot: Option<StoreSnapshot>,
}

/// Snapshot of relevant store state for event handling.
#[derive(Debug, Clone, Copy)]
struct StoreSnapshot {
    signed_in: bool,
    input_mode: InputMode,
    current_view: View,
    has_error: bool,
    has_notification: bool,
}

impl EventHandler {
    /// Create a new event handler with the given key bindings.
    pub fn new(keybindings: KeyBindings) -> Self {
        Self {
            keybindings,
            store_snapshot: None,
        }
    }

    /// Update the store snapshot for state-aware event handling.
    pub fn update_store_snapshot(&mut self, store: &Store) {
        self.store_snapshot = Some(StoreSnapshot {
            signed_in: store.session.is_signed_in(),
            input_mode: store.app.input_mode,
            current_view: store.app.current_view,
            has_error: store.app.error.is_some(),
            has_notification: store.app.notification.is_some(),
        });
    }

    /// Map a terminal event to an action, if it means anything.
    pub fn handle_event(&self, event: &Event) -> Option<Action> {
        match event {
            Event::Key(key) => self.handle_key(*key),
            Event::Mouse(mouse) => self.handle_mouse(*mouse),
            Event::Paste(text) => self.handle_paste(text),
            Event::Tick => Some(Action::Tick),
            Event::Resize(_, _) => None,
        }
    }

    /// Handle a key event and return an optional action.
    fn handle_key(&self, key: KeyEvent) -> Option<Action> {
        // Only process key press events
        if key.kind != KeyEventKind::Press {
            return None;
        }

        let input = InputEvent::from(key);
        if input.matches("Ctrl+c") {
            return Some(Action::Quit);
        }

        let snapshot = self.store_snapshot?;
        if !snapshot.signed_in {
            return self.handle_login_form(key, input);
        }

        match snapshot.input_mode {
            InputMode::Normal => self.handle_normal_mode(key, input, snapshot),
            InputMode::Editing => self.handle_submit_form(key, input),
        }
    }

    /// Handle a mouse event and return an optional action.
    fn handle_mouse(&self, mouse: MouseEvent) -> Option<Action> {
        let snapshot = self.store_snapshot?;
        if !snapshot.signed_in || snapshot.input_mode == InputMode::Editing {
            return None;
        }
        match mouse.kind {
            MouseEventKind::ScrollUp => Some(Action::ScrollUp),
            MouseEventKind::ScrollDown => Some(Action::ScrollDown),
            _ => None,
        }
    }

    /// Pasted text goes into the focused field, single-line.
    fn handle_paste(&self, text: &str) -> Option<Action> {
        let snapshot = self.store_snapshot?;
        let editing = !snapshot.signed_in || snapshot.input_mode == InputMode::Editing;
        let text: String = text.chars().filter(|c| !c.is_control()).collect();
        (editing && !text.is_empty()).then_some(Action::Paste(text))
    }

    fn handle_login_form(&self, key: KeyEvent, input: InputEvent) -> Option<Action> {
        if input.matches(&self.keybindings.toggle_auth_mode) {
            return Some(Action::ToggleAuthMode);
        }
        self.handle_form_keys(key, input, Action::SubmitAuth)
    }

    fn handle_submit_form(&self, key: KeyEvent, input: InputEvent) -> Option<Action> {
        if input.matches(&self.keybindings.back) {
            return Some(Action::SetInputMode(InputMode::Normal));
        }
        self.handle_form_keys(key, input, Action::SubmitPrediction)
    }

    /// Keys shared by both forms.
    fn handle_form_keys(&self, key: KeyEvent, input: InputEvent, submit: Action) -> Option<Action> {
        match key.code {
            KeyCode::Enter => Some(submit),
            KeyCode::Tab | KeyCode::Down => Some(Action::NextField),
            KeyCode::BackTab | KeyCode::Up => Some(Action::PrevField),
            KeyCode::Left => Some(Action::CycleOption(-1)),
            KeyCode::Right => Some(Action::CycleOption(1)),
            KeyCode::Backspace => Some(Action::DeleteChar),
            _ => input.typed_char().map(Action::InputChar),
        }
    }

    fn handle_normal_mode(
        &self,
        key: KeyEvent,
        input: InputEvent,
        snapshot: StoreSnapshot,
    ) -> Option<Action> {
        // Global shortcuts
        if input.matches(&self.keybindings.quit) {
            return Some(Action::Quit);
        }

        if input.matches(&self.keybindings.help) {
            return Some(Action::ToggleHelp);
        }

        if input.matches(&self.keybindings.logout) {
            return Some(Action::Logout);
        }

        if input.matches(&self.keybindings.back) {
            if snapshot.has_error {
                return Some(Action::ClearError);
            }
            if snapshot.has_notification {
                return Some(Action::DismissNotification);
            }
            return None;
        }

        // View switching
        if input.matches(&self.keybindings.browse) {
            return Some(Action::SetView(View::Browse));
        }
        if input.matches(&self.keybindings.predictions) {
            return Some(Action::SetView(View::Predictions));
        }
        if input.matches(&self.keybindings.submit) {
            return Some(Action::SetView(View::Submit));
        }
        if input.matches(&self.keybindings.next_tab) {
            return Some(Action::NextView);
        }

        // Navigation
        if input.matches(&self.keybindings.up) || key.code == KeyCode::Up {
            return Some(Action::ScrollUp);
        }
        if input.matches(&self.keybindings.down) || key.code == KeyCode::Down {
            return Some(Action::ScrollDown);
        }

        match key.code {
            KeyCode::PageUp => return Some(Action::PageUp),
            KeyCode::PageDown => return Some(Action::PageDown),
            KeyCode::Home | KeyCode::Char('g') => return Some(Action::GoToTop),
            KeyCode::End | KeyCode::Char('G') => return Some(Action::GoToBottom),
            _ => {}
        }

        // View-specific actions
        match snapshot.current_view {
            View::Submit => {
                if input.matches(&self.keybindings.edit) || input.matches(&self.keybindings.select) {
                    return Some(Action::SetInputMode(InputMode::Editing));
                }
                None
            }
            View::Browse | View::Predictions => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Principal;
    use crate::services::Session;
    use crossterm::event::KeyModifiers;

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn handler_for(store: &Store) -> EventHandler {
        let mut handler = EventHandler::new(KeyBindings::default());
        handler.update_store_snapshot(store);
        handler
    }

    fn signed_in_store() -> Store {
        let mut store = Store::new();
        store.reduce(Action::SessionChanged(Some(Session {
            principal: Principal {
                uid: "u1".into(),
                email: "a@b.io".into(),
                display_name: None,
            },
            profile: None,
        })));
        store
    }

    #[test]
    fn test_login_form_types_letters() {
        let store = Store::new();
        let handler = handler_for(&store);

        assert!(matches!(
            handler.handle_event(&press(KeyCode::Char('q'))),
            Some(Action::InputChar('q'))
        ));
        assert!(matches!(handler.handle_event(&press(KeyCode::Enter)), Some(Action::SubmitAuth)));
        assert!(matches!(
            handler.handle_event(&Event::Key(KeyEvent::new(KeyCode::Char('t'), KeyModifiers::CONTROL))),
            Some(Action::ToggleAuthMode)
        ));
    }

    #[test]
    fn test_normal_mode_shortcuts() {
        let store = signed_in_store();
        let handler = handler_for(&store);

        assert!(matches!(handler.handle_event(&press(KeyCode::Char('q'))), Some(Action::Quit)));
        assert!(matches!(
            handler.handle_event(&press(KeyCode::Char('2'))),
            Some(Action::SetView(View::Predictions))
        ));
        assert!(matches!(handler.handle_event(&press(KeyCode::Tab)), Some(Action::NextView)));
        assert!(matches!(handler.handle_event(&press(KeyCode::Char('x'))), Some(Action::Logout)));
    }

    #[test]
    fn test_submit_view_enter_starts_editing() {
        let mut store = signed_in_store();
        store.reduce(Action::SetView(View::Submit));
        let handler = handler_for(&store);
        assert!(matches!(
            handler.handle_event(&press(KeyCode::Enter)),
            Some(Action::SetInputMode(InputMode::Editing))
        ));

        store.reduce(Action::SetInputMode(InputMode::Editing));
        let handler = handler_for(&store);
        assert!(matches!(
            handler.handle_event(&press(KeyCode::Char('q'))),
            Some(Action::InputChar('q'))
        ));
        assert!(matches!(handler.handle_event(&press(KeyCode::Enter)), Some(Action::SubmitPrediction)));
        assert!(matches!(
            handler.handle_event(&press(KeyCode::Esc)),
            Some(Action::SetInputMode(InputMode::Normal))
        ));
    }

    #[test]
    fn test_ctrl_c_always_quits() {
        let store = Store::new();
        let handler = handler_for(&store);
        assert!(matches!(
            handler.handle_event(&Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))),
            Some(Action::Quit)
        ));
    }
}
