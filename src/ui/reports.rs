//! QC report list view

use crate::app::App;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    if app.state.reports.is_empty() {
        let content = Paragraph::new("No reports yet.\nPress 'n' to request a QC report.")
            .style(Style::default().fg(Color::DarkGray))
            .block(
                Block::default()
                    .title(" Reports ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            );
        frame.render_widget(content, area);
        return;
    }

    let items: Vec<ListItem> = app
        .state
        .reports
        .iter()
        .enumerate()
        .map(|(idx, report)| {
            let is_selected = idx == app.state.selected_index;
            let prefix = if is_selected { "▸" } else { " " };

            let status_color = match report.status.as_str() {
                "ready" => Color::Green,
                "failed" => Color::Red,
                _ => Color::Yellow,
            };

            let line = Line::from(vec![
                Span::raw(format!("{prefix} ")),
                Span::styled(
                    format!("{:<28}", report.title),
                    if is_selected {
                        Style::default().add_modifier(Modifier::BOLD)
                    } else {
                        Style::default()
                    },
                ),
                Span::styled(
                    format!("[{}] ", report.status),
                    Style::default().fg(status_color),
                ),
                Span::raw(format!("{:<5}", report.format.to_uppercase())),
                Span::styled(
                    format!("{:<18}", report.inspector),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(
                    report.created_at.format("%Y-%m-%d").to_string(),
                    Style::default().fg(Color::Blue),
                ),
            ]);

            let style = if is_selected {
                Style::default().bg(Color::Rgb(40, 40, 50))
            } else {
                Style::default()
            };
            ListItem::new(line).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .title(format!(" Reports ({}) ", app.state.reports.len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(list, area);
}
