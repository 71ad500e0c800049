//! Boxed button widgets for the sidebar and the wizard button row

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Rows a boxed button occupies (content plus top and bottom border)
pub const BUTTON_HEIGHT: u16 = 3;

/// Narrowest rendered button, so short labels like "Back" still read as
/// buttons
const MIN_BUTTON_WIDTH: u16 = 10;

/// Columns a button needs: label, side borders, and one space of padding
/// each side
pub fn button_width(label: &str) -> u16 {
    (label.len() as u16 + 4).max(MIN_BUTTON_WIDTH)
}

/// Render one boxed button
pub fn render_button(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    is_selected: bool,
    is_enabled: bool,
) {
    let (border_style, label_style) = match (is_selected, is_enabled) {
        (true, true) => (
            Style::default().fg(Color::Cyan),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        // Selected but inert, e.g. Submit while a submission is in flight
        (true, false) => (
            Style::default().fg(Color::Yellow),
            Style::default().fg(Color::Yellow),
        ),
        (false, true) => (Style::default().fg(Color::DarkGray), Style::default()),
        (false, false) => (
            Style::default().fg(Color::DarkGray),
            Style::default().fg(Color::DarkGray),
        ),
    };

    let widget = Paragraph::new(format!(" {label} "))
        .style(label_style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style),
        );
    frame.render_widget(widget, area);
}

/// Render a horizontal row of buttons sized to their labels, with at most
/// one selected. A disabled row renders every button dimmed.
pub fn render_button_row(
    frame: &mut Frame,
    area: Rect,
    labels: &[&str],
    selected: Option<usize>,
    is_enabled: bool,
) {
    let mut constraints: Vec<Constraint> = labels
        .iter()
        .map(|label| Constraint::Length(button_width(label)))
        .collect();
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (idx, label) in labels.iter().enumerate() {
        render_button(frame, chunks[idx], label, selected == Some(idx), is_enabled);
    }
}

/// Render a sidebar entry as a boxed button prefixed with its switch key
pub fn render_sidebar_button(
    frame: &mut Frame,
    area: Rect,
    key: &str,
    label: &str,
    is_selected: bool,
) {
    render_button(frame, area, &format!("{key} {label}"), is_selected, true);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_button_width_has_a_floor() {
        assert_eq!(button_width("Back"), MIN_BUTTON_WIDTH);
        assert_eq!(button_width("Submitting"), 14);
    }

    #[test]
    fn test_button_row_renders_every_label() {
        let backend = TestBackend::new(48, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                render_button_row(
                    frame,
                    frame.area(),
                    &["Back", "Cancel", "Next"],
                    Some(2),
                    true,
                );
            })
            .unwrap();
        let rendered = format!("{:?}", terminal.backend().buffer());
        assert!(rendered.contains("Back"));
        assert!(rendered.contains("Cancel"));
        assert!(rendered.contains("Next"));
    }

    #[test]
    fn test_sidebar_button_shows_key_and_label() {
        let backend = TestBackend::new(20, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                render_sidebar_button(frame, frame.area(), "1", "Devices", false);
            })
            .unwrap();
        let rendered = format!("{:?}", terminal.backend().buffer());
        assert!(rendered.contains("1 Devices"));
    }
}
