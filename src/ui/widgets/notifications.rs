//! Notification and error popups.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::state::{Notification, NotificationLevel};

/// Render a notification popup.
pub fn render_notification(frame: &mut Frame, area: Rect, notification: &Notification) {
    let (color, icon) = match notification.level {
        NotificationLevel::Info => (Color::Cyan, "ℹ"),
        NotificationLevel::Success => (Color::Green, "✓"),
        NotificationLevel::Warning => (Color::Yellow, "⚠"),
        NotificationLevel::Error => (Color::Red, "✗"),
    };

    render_popup(
        frame,
        area,
        color,
        Span::styled(format!("{} ", icon), Style::default().fg(color)),
        &notification.message,
    );
}

/// Render an error popup.
pub fn render_error(frame: &mut Frame, area: Rect, error: &str) {
    render_popup(
        frame,
        area,
        Color::Red,
        Span::styled(
            "✗ Error: ",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        error,
    );
}

fn render_popup(frame: &mut Frame, area: Rect, color: Color, prefix: Span<'_>, message: &str) {
    frame.render_widget(Clear, area);

    let paragraph = Paragraph::new(Line::from(vec![prefix, Span::raw(message)]))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title_bottom(Line::from(" Esc to dismiss ").right_aligned()),
        )
        .style(Style::default().fg(Color::White));

    frame.render_widget(paragraph, area);
}
