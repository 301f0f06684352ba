//! Prediction ledger widget.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap},
};

use super::{render_empty, render_loading, truncate_string};
use crate::model::{Confidence, PredictionStatus, PredictionView};
use crate::state::Store;

const EMPTY_MESSAGE: &str = "No predictions yet. Be the first to submit a stock prediction!";

/// Every prediction, newest first, with a detail pane for the selection.
pub struct PredictionList;

impl PredictionList {
    /// Render the prediction list.
    pub fn render(frame: &mut Frame, area: Rect, store: &Store) {
        let predictions = &store.predictions.predictions;

        let block = Block::default()
            .title(format!(" All Predictions ({}) ", predictions.len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        if predictions.is_empty() {
            if store.predictions.loading {
                frame.render_widget(block, area);
                render_loading(frame, area);
            } else {
                render_empty(frame, area, block, EMPTY_MESSAGE);
            }
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(7)])
            .split(area);

        let header_cells = [
            "Analyst",
            "Symbol",
            "Current → Target",
            "Upside",
            "Timeframe",
            "Confidence",
            "Status",
            "Reasoning",
        ]
        .iter()
        .map(|h| {
            Cell::from(*h).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        });
        let header = Row::new(header_cells).height(1).bottom_margin(1);

        let rows = predictions.iter().map(|view| {
            let p = &view.prediction;
            let upside = p.upside_percent();
            let upside_style = if upside.is_sign_negative() {
                Style::default().fg(Color::Red)
            } else {
                Style::default().fg(Color::Green)
            };

            let cells = vec![
                Cell::from(truncate_string(&view.analyst, 20)),
                Cell::from(p.stock.clone()).style(Style::default().add_modifier(Modifier::BOLD)),
                Cell::from(format!("${:.2} → ${:.2}", p.current_price, p.target_price)),
                Cell::from(format!("{:+.1}%", upside)).style(upside_style),
                Cell::from(p.timeframe.to_string()),
                Cell::from(p.confidence.to_string()).style(confidence_style(p.confidence)),
                Cell::from(p.status.to_string()).style(status_style(p.status)),
                Cell::from(truncate_string(&p.reasoning, 40)),
            ];

            Row::new(cells).height(1)
        });

        let table = Table::new(
            rows,
            [
                Constraint::Length(20),
                Constraint::Length(8),
                Constraint::Length(22),
                Constraint::Length(8),
                Constraint::Length(10),
                Constraint::Length(11),
                Constraint::Length(10),
                Constraint::Min(10),
            ],
        )
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("▶ ");

        let mut state = TableState::default();
        state.select(store.predictions.selected_index);

        frame.render_stateful_widget(table, chunks[0], &mut state);

        if let Some(selected) = store.predictions.selected() {
            render_detail(frame, chunks[1], selected);
        }
    }
}

fn render_detail(frame: &mut Frame, area: Rect, view: &PredictionView) {
    let p = &view.prediction;
    let mut byline = vec![
        Span::styled(view.analyst.clone(), Style::default().fg(Color::Cyan)),
    ];
    if !view.analyst_specialty.is_empty() {
        byline.push(Span::raw(format!(" · {}", view.analyst_specialty)));
    }
    if view.analyst_rating > 0.0 {
        byline.push(Span::raw(format!(" · rated {:.1}", view.analyst_rating)));
    }
    byline.push(Span::styled(
        format!(" · {}", p.created_at.format("%Y-%m-%d %H:%M")),
        Style::default().fg(Color::DarkGray),
    ));

    let text = vec![Line::from(byline), Line::from(""), Line::from(p.reasoning.as_str())];

    let detail = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(format!(" {} ", p.stock))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(detail, area);
}

fn confidence_style(confidence: Confidence) -> Style {
    match confidence {
        Confidence::Low => Style::default().fg(Color::Red),
        Confidence::Medium => Style::default().fg(Color::Yellow),
        Confidence::High => Style::default().fg(Color::Green),
    }
}

fn status_style(status: PredictionStatus) -> Style {
    match status {
        PredictionStatus::Active => Style::default().fg(Color::Blue),
        PredictionStatus::Correct => Style::default().fg(Color::Green),
        PredictionStatus::Incorrect => Style::default().fg(Color::Red),
        PredictionStatus::Expired | PredictionStatus::Unknown => {
            Style::default().fg(Color::DarkGray)
        }
    }
}
