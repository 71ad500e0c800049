//! Project list view

use crate::app::App;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    if app.state.projects.is_empty() {
        let content = Paragraph::new("No projects found.\nProjects are created from the backend.")
            .style(Style::default().fg(Color::DarkGray))
            .block(
                Block::default()
                    .title(" Projects ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            );
        frame.render_widget(content, area);
        return;
    }

    let items: Vec<ListItem> = app
        .state
        .projects
        .iter()
        .enumerate()
        .map(|(idx, project)| {
            let is_selected = idx == app.state.selected_index;
            let prefix = if is_selected { "▸" } else { " " };

            let material = project.pipe_material.as_deref().unwrap_or("-");
            let line = Line::from(vec![
                Span::raw(format!("{prefix} ")),
                Span::styled(
                    format!("{:<24}", project.name),
                    if is_selected {
                        Style::default().add_modifier(Modifier::BOLD)
                    } else {
                        Style::default()
                    },
                ),
                Span::styled(
                    format!("{:<18}", project.site),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(format!("{:<10}", material)),
                Span::styled(
                    format!(
                        "{} obs / {} reports",
                        project.observation_count, project.report_count
                    ),
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
            .title(format!(" Projects ({}) ", app.state.projects.len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(list, area);
}
