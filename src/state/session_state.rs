//! Session and login-form state.

use crate::model::SPECIALTIES;
use crate::services::Session;

/// What the app knows about the current session.
#[derive(Debug, Default)]
pub struct SessionState {
    /// The signed-in session, if any.
    pub current: Option<Session>,
    /// Whether the first session state has arrived.
    pub resolved: bool,
}

impl SessionState {
    /// Whether someone is signed in.
    pub fn is_signed_in(&self) -> bool {
        self.current.is_some()
    }

    /// Display name of the signed-in analyst.
    pub fn display_name(&self) -> Option<&str> {
        let session = self.current.as_ref()?;
        session
            .profile
            .as_ref()
            .map(|p| p.name.as_str())
            .or(session.principal.display_name.as_deref())
    }

    /// Accuracy of the signed-in analyst, 0 when unknown.
    pub fn accuracy(&self) -> f64 {
        self.current
            .as_ref()
            .and_then(|s| s.profile.as_ref())
            .map(|p| p.stats.accuracy)
            .unwrap_or(0.0)
    }
}

/// Whether the login form signs in or creates an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    SignIn,
    SignUp,
}

/// Fields of the login form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthField {
    DisplayName,
    #[default]
    Email,
    Password,
    Specialty,
}

/// Login / sign-up form.
#[derive(Debug, Default)]
pub struct AuthForm {
    pub mode: AuthMode,
    pub focus: AuthField,
    pub display_name: String,
    pub email: String,
    pub password: String,
    /// Index into [`SPECIALTIES`]; `None` means no specialty.
    pub specialty: Option<usize>,
    /// Inline error from the last attempt.
    pub error: Option<String>,
    /// Whether a request is in flight.
    pub submitting: bool,
}

impl AuthForm {
    /// Fields shown in the current mode, top to bottom.
    pub fn fields(&self) -> &'static [AuthField] {
        match self.mode {
            AuthMode::SignIn => &[AuthField::Email, AuthField::Password],
            AuthMode::SignUp => &[
                AuthField::DisplayName,
                AuthField::Email,
                AuthField::Password,
                AuthField::Specialty,
            ],
        }
    }

    /// Switch between sign-in and sign-up.
    pub fn toggle_mode(&mut self) {
        self.mode = match self.mode {
            AuthMode::SignIn => AuthMode::SignUp,
            AuthMode::SignUp => AuthMode::SignIn,
        };
        self.focus = self.fields()[0];
        self.error = None;
    }

    /// Move focus by `delta` fields, wrapping around.
    pub fn move_focus(&mut self, delta: i32) {
        let fields = self.fields();
        let len = fields.len() as i32;
        let index = fields.iter().position(|f| *f == self.focus).unwrap_or(0) as i32;
        self.focus = fields[(index + delta).rem_euclid(len) as usize];
    }

    /// Type a character into the focused text field.
    pub fn push_char(&mut self, c: char) {
        if let Some(field) = self.focused_text_mut() {
            field.push(c);
        }
    }

    /// Delete the last character of the focused text field.
    pub fn pop_char(&mut self) {
        if let Some(field) = self.focused_text_mut() {
            field.pop();
        }
    }

    /// Cycle the specialty choice when it has focus.
    pub fn cycle_option(&mut self, delta: i32) {
        if self.focus != AuthField::Specialty {
            return;
        }
        // Position 0 is "no specialty".
        let len = SPECIALTIES.len() as i32 + 1;
        let current = self.specialty.map(|i| i as i32 + 1).unwrap_or(0);
        let next = (current + delta).rem_euclid(len);
        self.specialty = (next > 0).then(|| (next - 1) as usize);
    }

    /// Chosen specialty, empty when none.
    pub fn specialty_label(&self) -> &'static str {
        self.specialty
            .and_then(|i| SPECIALTIES.get(i).copied())
            .unwrap_or("")
    }

    /// Forget everything typed, keeping the mode.
    pub fn clear(&mut self) {
        *self = Self {
            mode: self.mode,
            focus: self.fields()[0],
            ..Self::default()
        };
    }

    fn focused_text_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            AuthField::DisplayName => Some(&mut self.display_name),
            AuthField::Email => Some(&mut self.email),
            AuthField::Password => Some(&mut self.password),
            AuthField::Specialty => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_mode_changes_fields() {
        let mut form = AuthForm::default();
        assert_eq!(form.fields().len(), 2);
        form.toggle_mode();
        assert_eq!(form.mode, AuthMode::SignUp);
        assert_eq!(form.focus, AuthField::DisplayName);
        assert_eq!(form.fields().len(), 4);
    }

    #[test]
    fn test_typing_goes_to_focused_field() {
        let mut form = AuthForm::default();
        for c in "a@b.io".chars() {
            form.push_char(c);
        }
        form.move_focus(1);
        form.push_char('x');
        form.pop_char();
        form.push_char('y');
        assert_eq!(form.email, "a@b.io");
        assert_eq!(form.password, "y");
    }

    #[test]
    fn test_specialty_cycles_through_none() {
        let mut form = AuthForm::default();
        form.toggle_mode();
        form.focus = AuthField::Specialty;

        form.cycle_option(1);
        assert_eq!(form.specialty_label(), "Technology Stocks");
        form.cycle_option(-1);
        assert_eq!(form.specialty_label(), "");
        form.cycle_option(-1);
        assert_eq!(form.specialty_label(), "ESG Investing");
    }

    #[test]
    fn test_clear_keeps_mode() {
        let mut form = AuthForm::default();
        form.toggle_mode();
        form.display_name = "Jane".into();
        form.error = Some("nope".into());
        form.clear();
        assert_eq!(form.mode, AuthMode::SignUp);
        assert!(form.display_name.is_empty());
        assert!(form.error.is_none());
    }
}
