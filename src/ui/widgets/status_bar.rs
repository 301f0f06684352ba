//! Status bar widget.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::state::{Store, View};

/// Status bar widget.
pub struct StatusBar;

impl StatusBar {
    /// Render the status bar.
    pub fn render(frame: &mut Frame, area: Rect, store: &Store) {
        if area.height == 0 {
            return;
        }

        let analyst = match store.session.display_name() {
            Some(name) => Span::styled(name.to_string(), Style::default().fg(Color::White)),
            None if store.session.is_signed_in() => {
                Span::styled("Analyst", Style::default().fg(Color::White))
            }
            None => Span::styled("○ Signed out", Style::default().fg(Color::Red)),
        };

        let accuracy = if store.session.is_signed_in() {
            Span::styled(
                format!(" | Accuracy: {:.1}%", store.session.accuracy()),
                Style::default().fg(Color::Green),
            )
        } else {
            Span::raw("")
        };

        let loading = match store.app.current_view {
            View::Browse if store.analysts.loading => true,
            View::Predictions if store.predictions.loading => true,
            View::Submit if store.submit_form.submitting => true,
            _ => store.auth_form.submitting || !store.session.resolved,
        };
        let loading = if loading {
            Span::styled(
                " Loading... ",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::ITALIC),
            )
        } else {
            Span::raw("")
        };

        let help_hint = Span::styled(" Press ? for help ", Style::default().fg(Color::DarkGray));

        let left_content = vec![
            Span::styled(
                " 📈 AnalystTrack ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" | "),
            analyst,
            accuracy,
            loading,
        ];

        let status_line = Line::from(left_content);

        // Calculate padding for right-aligned help hint
        let left_len = status_line.width();
        let right_len = help_hint.width();
        let padding = (area.width as usize).saturating_sub(left_len + right_len);

        let mut full_line = status_line.spans;
        full_line.push(Span::raw(" ".repeat(padding)));
        full_line.push(help_hint);

        let paragraph =
            Paragraph::new(Line::from(full_line)).style(Style::default().bg(Color::DarkGray));

        frame.render_widget(paragraph, area);
    }
}
