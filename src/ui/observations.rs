//! Observation list view

use crate::app::App;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

fn severity_color(severity: u8) -> Color {
    match severity {
        5 => Color::Red,
        4 => Color::LightRed,
        3 => Color::Yellow,
        _ => Color::Green,
    }
}

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    if app.state.observations.is_empty() {
        let content = Paragraph::new("No observations recorded.\nPress 'n' to record a new observation.")
            .style(Style::default().fg(Color::DarkGray))
            .block(
                Block::default()
                    .title(" Observations ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            );
        frame.render_widget(content, area);
        return;
    }

    let items: Vec<ListItem> = app
        .state
        .observations
        .iter()
        .enumerate()
        .map(|(idx, obs)| {
            let is_selected = idx == app.state.selected_index;
            let prefix = if is_selected { "▸" } else { " " };

            let code = obs.code_label.as_deref().unwrap_or(&obs.code);
            let snapshot_mark = if obs.snapshot.is_some() { "📷" } else { "  " };

            let line = Line::from(vec![
                Span::raw(format!("{prefix} ")),
                Span::styled(
                    format!("{:<8}", obs.code),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("S{} ", obs.severity),
                    Style::default().fg(severity_color(obs.severity)),
                ),
                Span::raw(format!("{:>7.1}m  ", obs.distance)),
                Span::styled(format!("{:<28}", code), Style::default().fg(Color::DarkGray)),
                Span::raw(format!("{snapshot_mark} ")),
                Span::styled(
                    obs.observed_at.format("%Y-%m-%d %H:%M").to_string(),
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
            .title(format!(" Observations ({}) ", app.state.observations.len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(list, area);
}
