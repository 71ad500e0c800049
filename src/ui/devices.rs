//! Device list view

use crate::app::App;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let devices = app.state.sorted_devices();

    let hidden = app
        .state
        .devices
        .iter()
        .filter(|d| d.status == "offline")
        .count();
    let filter_label = if hidden > 0 && !app.state.show_offline_devices {
        format!("(hiding {hidden} offline)")
    } else {
        String::new()
    };

    if devices.is_empty() {
        let message = if hidden > 0 && !app.state.show_offline_devices {
            "No online devices. Press 'f' to show offline devices.\nPress 'n' to register a new device."
        } else {
            "No devices registered.\nPress 'n' to register a new device."
        };
        let content = Paragraph::new(message)
            .style(Style::default().fg(Color::DarkGray))
            .block(
                Block::default()
                    .title(" Devices ")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            );
        frame.render_widget(content, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(area);

    let sort_label = format!(
        "Sort: {} {}",
        app.state.device_sort_field.label(),
        app.state.device_sort_direction.symbol()
    );
    let header = Paragraph::new(Line::from(vec![
        Span::styled(sort_label, Style::default().fg(Color::Cyan)),
        Span::styled(" [s]cycle [x]dir", Style::default().fg(Color::DarkGray)),
        Span::raw(" | "),
        Span::styled(filter_label, Style::default().fg(Color::DarkGray)),
        Span::styled(" [f]toggle", Style::default().fg(Color::DarkGray)),
    ]));
    frame.render_widget(header, chunks[0]);

    let items: Vec<ListItem> = devices
        .iter()
        .enumerate()
        .map(|(idx, device)| {
            let is_selected = idx == app.state.selected_index;
            let prefix = if is_selected { "▸" } else { " " };

            let status_color = match device.status.as_str() {
                "online" => Color::Green,
                "offline" => Color::DarkGray,
                _ => Color::Yellow,
            };

            let endpoint = device
                .ip_address
                .as_deref()
                .or(device.operator.as_deref())
                .unwrap_or("-");

            let line = Line::from(vec![
                Span::raw(format!("{prefix} ")),
                Span::styled(
                    format!("{:<20}", device.name),
                    if is_selected {
                        Style::default().add_modifier(Modifier::BOLD)
                    } else {
                        Style::default()
                    },
                ),
                Span::styled(
                    format!("[{}] ", device.status),
                    Style::default().fg(status_color),
                ),
                Span::raw(format!("{:<18}", device.device_type)),
                Span::styled(
                    format!("{:<16}", device.location),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(endpoint.to_string(), Style::default().fg(Color::Blue)),
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
            .title(format!(" Devices ({}) ", devices.len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(list, chunks[1]);
}
