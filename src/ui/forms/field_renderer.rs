//! Field rendering for wizard steps

use crate::state::wizard::{FieldControl, FieldSpec, WizardState};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Rows a field occupies, including its border and an error line when one
/// is pending
pub fn field_height(wizard: &WizardState, field: &FieldSpec) -> u16 {
    let base = match field.control {
        FieldControl::Text { multiline: true } => 5,
        _ => 3,
    };
    if wizard.errors().contains(field.name) {
        base + 1
    } else {
        base
    }
}

/// Draw one wizard field with its label, value, and any validation error
pub fn draw_field(frame: &mut Frame, area: Rect, wizard: &WizardState, field: &FieldSpec, is_active: bool) {
    let error = wizard.errors().message(field.name);

    let (field_area, error_area) = if error.is_some() {
        let field_area = Rect {
            height: area.height.saturating_sub(1),
            ..area
        };
        let error_area = Rect {
            y: area.y + area.height.saturating_sub(1),
            height: 1,
            ..area
        };
        (field_area, Some(error_area))
    } else {
        (area, None)
    };

    let border_style = if error.is_some() {
        Style::default().fg(Color::Red)
    } else if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let title = if field.is_required(wizard.draft()) {
        format!(" {} * ", field.label)
    } else {
        format!(" {} ", field.label)
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);

    let content = match field.control {
        FieldControl::Text { multiline } => text_content(wizard, field, is_active, multiline),
        FieldControl::Choice { .. } => choice_content(wizard, field, is_active),
        FieldControl::Toggle { .. } => toggle_content(wizard, field, is_active),
        FieldControl::Slider { min, max, .. } => slider_content(wizard, field, is_active, min, max),
    };

    frame.render_widget(content.wrap(Wrap { trim: false }).block(block), field_area);

    if let (Some(message), Some(error_area)) = (error, error_area) {
        let line = Paragraph::new(format!("  ✗ {message}")).style(Style::default().fg(Color::Red));
        frame.render_widget(line, error_area);
    }
}

fn value_style(is_active: bool) -> Style {
    if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    }
}

fn text_content<'a>(
    wizard: &'a WizardState,
    field: &FieldSpec,
    is_active: bool,
    multiline: bool,
) -> Paragraph<'a> {
    let value = wizard.draft().text(field.name);
    let display = if value.is_empty() && !is_active {
        "(empty)"
    } else {
        value
    };
    let cursor = if is_active { "▌" } else { "" };

    if multiline {
        let mut lines: Vec<Line> = display.lines().map(|l| Line::from(l.to_string())).collect();
        if is_active {
            let cursor_span = Span::styled(cursor, Style::default().fg(Color::Cyan));
            match lines.last_mut() {
                Some(last) => last.spans.push(cursor_span),
                None => lines.push(Line::from(cursor_span)),
            }
        }
        Paragraph::new(lines)
    } else {
        Paragraph::new(Line::from(vec![
            Span::styled(display.to_string(), value_style(is_active)),
            Span::styled(cursor, Style::default().fg(Color::Cyan)),
        ]))
    }
}

fn choice_content<'a>(wizard: &'a WizardState, field: &FieldSpec, is_active: bool) -> Paragraph<'a> {
    let label = wizard.draft().choice_label(field.name);
    let display = if label.is_empty() { "(select)" } else { label };

    let line = if is_active {
        Line::from(vec![
            Span::styled("◀ ", Style::default().fg(Color::Cyan)),
            Span::styled(display.to_string(), value_style(true)),
            Span::styled(" ▶", Style::default().fg(Color::Cyan)),
        ])
    } else {
        Line::from(Span::raw(display.to_string()))
    };
    Paragraph::new(line)
}

fn toggle_content<'a>(wizard: &'a WizardState, field: &FieldSpec, is_active: bool) -> Paragraph<'a> {
    let on = wizard.draft().toggle(field.name);
    let display = if on { "[x] On" } else { "[ ] Off" };
    Paragraph::new(Line::from(Span::styled(display, value_style(is_active))))
}

fn slider_content<'a>(
    wizard: &'a WizardState,
    field: &FieldSpec,
    is_active: bool,
    min: u32,
    max: u32,
) -> Paragraph<'a> {
    let value = wizard.draft().slider(field.name);
    let span = (max - min).max(1);
    let filled = ((value.saturating_sub(min)) * 20 / span) as usize;
    let bar: String = "█".repeat(filled) + &"░".repeat(20 - filled.min(20));
    Paragraph::new(Line::from(vec![
        Span::styled(bar, value_style(is_active)),
        Span::raw(format!(" {value}")),
    ]))
}
