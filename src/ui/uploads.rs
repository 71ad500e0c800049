//! Upload list view (read-only)

use crate::app::App;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    if app.state.uploads.is_empty() {
        let content = Paragraph::new("No uploads tracked.\nUploads arrive from field capture devices.")
            .style(Style::default().fg(Color::DarkGray))
            .block(
                Block::default()
                    .title(" Uploads ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            );
        frame.render_widget(content, area);
        return;
    }

    let items: Vec<ListItem> = app
        .state
        .uploads
        .iter()
        .enumerate()
        .map(|(idx, upload)| {
            let is_selected = idx == app.state.selected_index;
            let prefix = if is_selected { "▸" } else { " " };

            let status_color = match upload.status.as_str() {
                "processed" => Color::Green,
                "failed" => Color::Red,
                _ => Color::Yellow,
            };

            let line = Line::from(vec![
                Span::raw(format!("{prefix} ")),
                Span::styled(
                    format!("{:<32}", upload.file_name),
                    if is_selected {
                        Style::default().add_modifier(Modifier::BOLD)
                    } else {
                        Style::default()
                    },
                ),
                Span::raw(format!("{:>10}  ", upload.human_size())),
                Span::styled(
                    format!("[{}] ", upload.status),
                    Style::default().fg(status_color),
                ),
                Span::styled(
                    upload.uploaded_at.format("%Y-%m-%d %H:%M").to_string(),
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
            .title(format!(" Uploads ({}) ", app.state.uploads.len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(list, area);
}
