//! Layout components (sidebar, status bar)

use super::components::{render_sidebar_button, BUTTON_HEIGHT};
use crate::app::App;
use crate::state::{Severity, View};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Sidebar items with their switch keys
const SIDEBAR_ITEMS: &[(&str, &str)] = &[
    ("1", "Devices"),
    ("2", "Projects"),
    ("3", "Observations"),
    ("4", "Reports"),
    ("5", "Uploads"),
    ("6", "Config"),
];

/// Create the main layout with sidebar
pub fn create_layout(area: Rect) -> (Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(20), // Sidebar
            Constraint::Min(0),     // Main content
        ])
        .split(area);

    // Reserve bottom line for status bar
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(chunks[1]);

    let sidebar_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Sidebar content
            Constraint::Length(1), // Status bar continuation
        ])
        .split(chunks[0]);

    (sidebar_chunks[0], main_chunks[0])
}

/// Draw the sidebar with boxed buttons
pub fn draw_sidebar(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),                // Top padding (flex)
            Constraint::Length(BUTTON_HEIGHT), // Devices
            Constraint::Length(BUTTON_HEIGHT), // Projects
            Constraint::Length(BUTTON_HEIGHT), // Observations
            Constraint::Length(BUTTON_HEIGHT), // Reports
            Constraint::Length(BUTTON_HEIGHT), // Uploads
            Constraint::Length(BUTTON_HEIGHT), // Config
            Constraint::Min(0),                // Bottom padding (flex)
        ])
        .split(area);

    for (idx, (key, label)) in SIDEBAR_ITEMS.iter().enumerate() {
        let is_selected = match idx {
            0 => matches!(app.state.current_view, View::Devices | View::DeviceWizard),
            1 => matches!(app.state.current_view, View::Projects),
            2 => matches!(
                app.state.current_view,
                View::Observations | View::ObservationWizard
            ),
            3 => matches!(app.state.current_view, View::Reports | View::ReportWizard),
            4 => matches!(app.state.current_view, View::Uploads),
            5 => matches!(app.state.current_view, View::Config),
            _ => false,
        };

        render_sidebar_button(frame, chunks[idx + 1], key, label, is_selected);
    }
}

/// Draw the status bar
pub fn draw_status_bar(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let status_area = Rect {
        x: 0,
        y: area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };

    let mut spans = vec![];

    // Connection status
    let conn_status = if app.state.api_connected {
        Span::styled(" ● ", Style::default().fg(Color::Green))
    } else {
        Span::styled(" ○ ", Style::default().fg(Color::Red))
    };
    spans.push(conn_status);

    // View-specific hints
    let hints = get_view_hints(&app.state.current_view);
    spans.push(Span::styled(hints, Style::default().fg(Color::DarkGray)));

    // Pending notice
    if let Some(notice) = &app.state.notice {
        let color = match notice.severity {
            Severity::Info => Color::Gray,
            Severity::Success => Color::Green,
            Severity::Error => Color::Red,
        };
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(&notice.message, Style::default().fg(color)));
    }

    // First-run tour hint, dismissible with 't'
    if app.state.show_tour_hint && !app.state.current_view.is_wizard() {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(
            "New here? 1-6 switch screens, n opens a form (t:dismiss)",
            Style::default().fg(Color::Yellow),
        ));
    }

    let quit_hint = " q:quit ";

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, status_area);

    let quit_area = Rect {
        x: area.width.saturating_sub(quit_hint.len() as u16),
        y: area.height.saturating_sub(1),
        width: quit_hint.len() as u16,
        height: 1,
    };
    let quit_widget =
        Paragraph::new(quit_hint).style(Style::default().bg(Color::DarkGray).fg(Color::Gray));
    frame.render_widget(quit_widget, quit_area);
}

/// Platform-specific copy shortcut hint
#[cfg(target_os = "macos")]
const COPY_HINT: &str = "Cmd+Y:copy-id";
#[cfg(not(target_os = "macos"))]
const COPY_HINT: &str = "^Y:copy-id";

/// Get keyboard hints for the current view
fn get_view_hints(view: &View) -> String {
    match view {
        View::Devices => format!("j/k:nav  n:new  r:refresh  s/x:sort  f:offline  {COPY_HINT}"),
        View::Projects => "j/k:nav  r:refresh".to_string(),
        View::Observations => format!("j/k:nav  n:new  r:refresh  {COPY_HINT}"),
        View::Reports => format!("j/k:nav  n:new  r:refresh  {COPY_HINT}"),
        View::Uploads => "j/k:nav  r:refresh".to_string(),
        View::Config => "1-6:switch view".to_string(),
        View::DeviceWizard | View::ObservationWizard | View::ReportWizard => {
            "Tab:next field  Enter:advance  Esc:cancel".to_string()
        }
    }
}
