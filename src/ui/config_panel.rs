//! Config view: effective settings, read-only

use crate::app::App;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn setting<'a>(label: &'a str, value: String) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{label:<22}"), Style::default().fg(Color::DarkGray)),
        Span::raw(value),
    ])
}

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let connection = if app.state.api_connected {
        "connected"
    } else {
        "disconnected"
    };

    let lines = vec![
        Line::from(Span::styled(
            "Effective settings",
            Style::default().fg(Color::Cyan),
        )),
        Line::raw(""),
        setting("Backend", connection.to_string()),
        setting(
            "API URL override",
            std::env::var("SEWERVISION_API_URL").unwrap_or_else(|_| "(not set)".to_string()),
        ),
        setting(
            "Device sort",
            format!(
                "{} {}",
                app.state.device_sort_field.label(),
                app.state.device_sort_direction.symbol()
            ),
        ),
        setting(
            "Show offline devices",
            app.state.show_offline_devices.to_string(),
        ),
        Line::raw(""),
        Line::from(Span::styled(
            "Edit config.json in the user config directory to change defaults.",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let content = Paragraph::new(lines).block(
        Block::default()
            .title(" Config ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    frame.render_widget(content, area);
}
