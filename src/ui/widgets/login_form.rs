//! Sign-in / sign-up screen.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use super::super::layout::centered_rect;
use crate::state::{AuthField, AuthForm, AuthMode, Store};

/// Shown instead of the tabs while nobody is signed in.
pub struct LoginForm;

impl LoginForm {
    /// Render the login form.
    pub fn render(frame: &mut Frame, area: Rect, store: &Store) {
        let form = &store.auth_form;
        let popup_area = centered_rect(50, 70, area);
        frame.render_widget(Clear, popup_area);

        let title = match form.mode {
            AuthMode::SignIn => " Sign In ",
            AuthMode::SignUp => " Create Analyst Account ",
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(popup_area);
        frame.render_widget(block, popup_area);

        if !store.session.resolved {
            let waiting = Paragraph::new(Line::from(Span::styled(
                "Checking session...",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::ITALIC),
            )));
            frame.render_widget(waiting, inner);
            return;
        }

        let fields = form.fields();
        let mut constraints = vec![Constraint::Length(3); fields.len()];
        constraints.push(Constraint::Length(2)); // Error
        constraints.push(Constraint::Min(1)); // Hints

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(inner);

        for (i, field) in fields.iter().enumerate() {
            render_field(frame, chunks[i], form, *field);
        }

        if let Some(error) = &form.error {
            let error = Paragraph::new(Line::from(vec![
                Span::styled(
                    "✗ ",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(error.as_str(), Style::default().fg(Color::Red)),
            ]))
            .wrap(Wrap { trim: true });
            frame.render_widget(error, chunks[fields.len()]);
        }

        let key = Style::default().fg(Color::Cyan);
        let dim = Style::default().fg(Color::DarkGray);
        let hints = if form.submitting {
            vec![Line::from(Span::styled(
                "Please wait...",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::ITALIC),
            ))]
        } else {
            let switch = match form.mode {
                AuthMode::SignIn => "Don't have an account? Sign up",
                AuthMode::SignUp => "Already have an account? Sign in",
            };
            vec![
                Line::from(vec![
                    Span::styled("Enter", key),
                    Span::styled(" submit  ", dim),
                    Span::styled("Tab", key),
                    Span::styled(" next field  ", dim),
                    Span::styled("Ctrl+c", key),
                    Span::styled(" quit", dim),
                ]),
                Line::from(vec![
                    Span::styled("Ctrl+t", key),
                    Span::styled(format!(" {}", switch), dim),
                ]),
            ]
        };
        frame.render_widget(Paragraph::new(hints), chunks[fields.len() + 1]);
    }
}

fn render_field(frame: &mut Frame, area: Rect, form: &AuthForm, field: AuthField) {
    let focused = form.focus == field && !form.submitting;

    let (label, value) = match field {
        AuthField::DisplayName => ("Display Name", form.display_name.clone()),
        AuthField::Email => ("Email", form.email.clone()),
        AuthField::Password => ("Password", "•".repeat(form.password.chars().count())),
        AuthField::Specialty => {
            let label = form.specialty_label();
            let value = if label.is_empty() { "(none)" } else { label };
            ("Specialty", format!("◀ {} ▶", value))
        }
    };

    let mut spans = vec![Span::raw(value)];
    if focused && field != AuthField::Specialty {
        spans.push(Span::styled("█", Style::default().fg(Color::Yellow)));
    }

    let border_style = if focused {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let input = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .title(format!(" {} ", label))
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    frame.render_widget(input, area);
}
