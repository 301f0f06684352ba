//! Analyst directory widget.

use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
};

use super::{render_empty, render_loading, truncate_string};
use crate::state::Store;

const EMPTY_MESSAGE: &str = "No analysts found. Be the first to make predictions!";

/// Top analysts, best accuracy first.
pub struct AnalystList;

impl AnalystList {
    /// Render the analyst directory.
    pub fn render(frame: &mut Frame, area: Rect, store: &Store) {
        let analysts = &store.analysts.analysts;

        let block = Block::default()
            .title(format!(" Top Analysts ({}) ", analysts.len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        if analysts.is_empty() {
            if store.analysts.loading {
                frame.render_widget(block, area);
                render_loading(frame, area);
            } else {
                render_empty(frame, area, block, EMPTY_MESSAGE);
            }
            return;
        }

        let header_cells = ["#", "Analyst", "Specialty", "Accuracy", "Correct", "Avg Return"]
            .iter()
            .map(|h| {
                Cell::from(*h).style(
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )
            });
        let header = Row::new(header_cells).height(1).bottom_margin(1);

        let rows = analysts.iter().enumerate().map(|(i, analyst)| {
            let stats = &analyst.stats;
            let name = if analyst.verified {
                format!("{} ✓", analyst.name)
            } else {
                analyst.name.clone()
            };
            let return_style = if stats.avg_return < 0.0 {
                Style::default().fg(Color::Red)
            } else {
                Style::default().fg(Color::Green)
            };

            let cells = vec![
                Cell::from(format!("{}", i + 1)).style(Style::default().fg(Color::DarkGray)),
                Cell::from(truncate_string(&name, 30)),
                Cell::from(analyst.specialty().unwrap_or("-").to_string())
                    .style(Style::default().fg(Color::Blue)),
                Cell::from(format!("{:.1}%", stats.accuracy)),
                Cell::from(format!(
                    "{}/{}",
                    stats.correct_predictions, stats.total_predictions
                )),
                Cell::from(format!("{:+.1}%", stats.avg_return)).style(return_style),
            ];

            Row::new(cells).height(1)
        });

        let table = Table::new(
            rows,
            [
                Constraint::Length(4),
                Constraint::Percentage(30),
                Constraint::Percentage(25),
                Constraint::Length(10),
                Constraint::Length(10),
                Constraint::Length(12),
            ],
        )
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("▶ ");

        let mut state = TableState::default();
        state.select(store.analysts.selected_index);

        frame.render_stateful_widget(table, area, &mut state);
    }
}
