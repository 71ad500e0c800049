//! Generic wizard step renderer.
//!
//! One renderer serves all three wizards; everything it needs comes from the
//! step descriptors and the wizard state.

use super::field_renderer::{draw_field, field_height};
use crate::app::App;
use crate::platform::SUBMIT_SHORTCUT;
use crate::state::wizard::WizardState;
use crate::ui::components::{render_button_row, BUTTON_HEIGHT};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn draw(frame: &mut Frame, area: Rect, app: &App) {
    let Some(wizard) = &app.state.wizard else {
        return;
    };

    let title = format!(
        " {} - Step {} of {}: {} ",
        wizard.kind().label(),
        wizard.step(),
        wizard.step_count(),
        wizard.step_title()
    );
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let fields = wizard.visible_fields();
    let mut constraints: Vec<Constraint> = Vec::with_capacity(fields.len() + 3);
    for field in &fields {
        constraints.push(Constraint::Length(field_height(wizard, field)));
    }
    if wizard.is_last_step() {
        // Leave room for the draft summary on the review step
        constraints.push(Constraint::Min(0));
    }
    constraints.push(Constraint::Length(BUTTON_HEIGHT));
    constraints.push(Constraint::Length(1));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    for (idx, field) in fields.iter().enumerate() {
        draw_field(frame, chunks[idx], wizard, field, idx == wizard.active_field);
    }

    let mut next_chunk = fields.len();
    if wizard.is_last_step() {
        draw_summary(frame, chunks[next_chunk], wizard);
        next_chunk += 1;
    }

    draw_buttons(frame, chunks[next_chunk], wizard);
    draw_hint_line(frame, chunks[next_chunk + 1], wizard);
}

/// Review summary: every visible field across all steps with its value
fn draw_summary(frame: &mut Frame, area: Rect, wizard: &WizardState) {
    let mut lines = Vec::new();
    for step in wizard.spec().steps {
        for field in step.fields {
            if !field.is_visible(wizard.draft()) {
                continue;
            }
            let value = wizard
                .draft()
                .get(field.name)
                .map(|v| v.display())
                .unwrap_or_default();
            if value.is_empty() {
                continue;
            }
            lines.push(Line::from(vec![
                Span::styled(
                    format!("{}: ", field.label),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(value),
            ]));
        }
    }
    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "Nothing entered yet",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let block = Block::default()
        .title(" Review ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_buttons(frame: &mut Frame, area: Rect, wizard: &WizardState) {
    let labels: Vec<&str> = wizard
        .buttons()
        .iter()
        .map(|label| {
            if *label == "Submit" && wizard.is_submitting() {
                "Submitting"
            } else {
                *label
            }
        })
        .collect();
    let selected = wizard.on_button_row().then_some(wizard.selected_button);
    render_button_row(frame, area, &labels, selected, !wizard.is_submitting());
}

fn draw_hint_line(frame: &mut Frame, area: Rect, wizard: &WizardState) {
    let line = if wizard.is_submitting() {
        Line::from(Span::styled(
            "Submitting...",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ))
    } else if wizard.is_last_step() {
        Line::from(Span::styled(
            format!("Tab:next  Space:toggle  ◀/▶:change  {SUBMIT_SHORTCUT}:submit  Esc:cancel"),
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(Span::styled(
            "Tab:next  Space:toggle  ◀/▶:change  Enter:advance  Esc:cancel",
            Style::default().fg(Color::DarkGray),
        ))
    };
    frame.render_widget(Paragraph::new(line), area);
}
