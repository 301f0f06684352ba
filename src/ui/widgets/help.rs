//! Help panel widget.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use super::super::layout::centered_rect;
use crate::config::KeyBindings;

/// Help panel showing keybindings.
pub struct HelpPanel;

impl HelpPanel {
    /// Render the help panel.
    pub fn render(frame: &mut Frame, area: Rect, keys: &KeyBindings) {
        let popup_area = centered_rect(60, 80, area);

        // Clear the area behind the popup
        frame.render_widget(Clear, popup_area);

        let sections: [(&str, Vec<(String, &str)>); 4] = [
            (
                "Navigation",
                vec![
                    (format!("{}/↓", keys.down), "Move down"),
                    (format!("{}/↑", keys.up), "Move up"),
                    ("g/G".to_string(), "Go to top / bottom"),
                    ("PgUp/PgDn".to_string(), "Page up / down"),
                    (keys.next_tab.clone(), "Next tab"),
                ],
            ),
            (
                "Views",
                vec![
                    (keys.browse.clone(), "Browse analysts"),
                    (keys.predictions.clone(), "All predictions"),
                    (keys.submit.clone(), "Submit a prediction"),
                ],
            ),
            (
                "Submit Form",
                vec![
                    (format!("{}/{}", keys.edit, keys.select), "Start editing"),
                    ("Tab/↑↓".to_string(), "Move between fields"),
                    ("←/→".to_string(), "Change timeframe / confidence"),
                    ("Enter".to_string(), "Submit"),
                    (keys.back.clone(), "Stop editing"),
                ],
            ),
            (
                "Actions",
                vec![
                    (keys.back.clone(), "Dismiss message"),
                    (keys.logout.clone(), "Sign out"),
                    (keys.help.clone(), "Toggle help"),
                    (keys.quit.clone(), "Quit"),
                ],
            ),
        ];

        let mut help_text = Vec::new();
        for (i, (title, entries)) in sections.into_iter().enumerate() {
            if i > 0 {
                help_text.push(Line::from(""));
            }
            help_text.push(Line::from(vec![Span::styled(
                title,
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )]));
            help_text.push(Line::from(""));
            for (key, description) in entries {
                help_text.push(Line::from(vec![
                    Span::styled(format!("  {:<10}", key), Style::default().fg(Color::Cyan)),
                    Span::raw(description),
                ]));
            }
        }

        let help = Paragraph::new(help_text)
            .block(
                Block::default()
                    .title(" Help ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow)),
            )
            .style(Style::default().fg(Color::White));

        frame.render_widget(help, popup_area);
    }
}
