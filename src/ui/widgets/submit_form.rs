//! Prediction submission form widget.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::state::{Store, SubmitField};

/// Submission form.
pub struct SubmitFormView;

impl SubmitFormView {
    /// Render the form.
    pub fn render(frame: &mut Frame, area: Rect, store: &Store) {
        let form = &store.submit_form;
        let editing = store.app.is_editing();

        let block = Block::default()
            .title(" Submit Prediction ")
            .borders(Borders::ALL)
            .border_style(if editing {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::Cyan)
            });
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut constraints: Vec<Constraint> = SubmitField::ALL
            .iter()
            .map(|field| match field {
                SubmitField::Reasoning => Constraint::Min(3),
                _ => Constraint::Length(3),
            })
            .collect();
        constraints.push(Constraint::Length(2));

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(inner);

        for (i, field) in SubmitField::ALL.into_iter().enumerate() {
            let focused = editing && form.focus == field;
            let value = form.value(field);

            let content = if field.is_choice() {
                let arrows = Style::default().fg(Color::DarkGray);
                Line::from(vec![
                    Span::styled("◀ ", arrows),
                    Span::raw(value),
                    Span::styled(" ▶", arrows),
                ])
            } else if focused {
                Line::from(vec![
                    Span::raw(value),
                    Span::styled("█", Style::default().fg(Color::Yellow)),
                ])
            } else {
                Line::from(value)
            };

            let border_style = if focused {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };

            let input = Paragraph::new(content).wrap(Wrap { trim: false }).block(
                Block::default()
                    .title(format!(" {} ", field.label()))
                    .borders(Borders::ALL)
                    .border_style(border_style),
            );
            frame.render_widget(input, chunks[i]);
        }

        let hint = if form.submitting {
            Line::from(Span::styled(
                "Submitting...",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::ITALIC),
            ))
        } else if editing {
            Line::from(Span::styled(
                "Enter submit · Tab/↑↓ move · ←/→ change option · Esc stop editing",
                Style::default().fg(Color::DarkGray),
            ))
        } else {
            Line::from(Span::styled(
                "Press i or Enter to start editing",
                Style::default().fg(Color::DarkGray),
            ))
        };
        frame.render_widget(Paragraph::new(hint), chunks[SubmitField::ALL.len()]);
    }
}
