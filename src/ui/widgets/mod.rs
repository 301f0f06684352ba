//! TUI widgets.

mod analyst_list;
mod help;
mod login_form;
mod notifications;
mod prediction_list;
mod status_bar;
mod submit_form;
mod tab_bar;

pub use analyst_list::AnalystList;
pub use help::HelpPanel;
pub use login_form::LoginForm;
pub use notifications::{render_error, render_notification};
pub use prediction_list::PredictionList;
pub use status_bar::StatusBar;
pub use submit_form::SubmitFormView;
pub use tab_bar::TabBar;

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Wrap},
};

/// Shorten to `max_len` characters, ending in "...".
fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

fn render_empty(frame: &mut Frame, area: Rect, block: Block, message: &str) {
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let top = inner.height / 2;
    let text_area = Rect {
        y: inner.y + top.saturating_sub(1),
        height: inner.height - top.saturating_sub(1),
        ..inner
    };
    let empty = Paragraph::new(Line::from(Span::styled(
        message,
        Style::default().fg(Color::DarkGray),
    )))
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true });
    frame.render_widget(empty, text_area);
}

fn render_loading(frame: &mut Frame, area: Rect) {
    let loading = Line::from(vec![Span::styled(
        "Loading...",
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::ITALIC),
    )]);

    let inner = Block::bordered().inner(area);
    if inner.width < 15 || inner.height == 0 {
        return;
    }

    // Render at bottom right
    let loading_area = Rect {
        x: inner.x + inner.width - 15,
        y: inner.y + inner.height - 1,
        width: 15,
        height: 1,
    };

    frame.render_widget(Paragraph::new(loading), loading_area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string_counts_chars() {
        assert_eq!(truncate_string("AAPL", 10), "AAPL");
        assert_eq!(truncate_string("Jane Doe the Analyst", 10), "Jane Do...");
        assert_eq!(truncate_string("éééééé", 5), "éé...");
    }
}
