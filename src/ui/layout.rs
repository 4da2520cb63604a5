//! Layout components (action panel, status bar)

use super::components::{render_action_button, BUTTON_HEIGHT};
use crate::app::App;
use crate::platform::{COPY_SHORTCUT, SUBMIT_SHORTCUT};
use crate::state::{Focus, FormButton};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Split the screen into form (left) and action panel (right), leaving the
/// bottom line for the status bar
pub fn create_layout(area: Rect) -> (Rect, Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(40),    // Form area
            Constraint::Length(24), // Action panel
        ])
        .split(rows[0]);

    (chunks[0], chunks[1])
}

/// Draw the action buttons and the key hints below them
pub fn draw_action_panel(frame: &mut Frame, area: Rect, app: &App) {
    let focus = app.focus();
    let is_focused = matches!(focus, Focus::Button(_));
    let border_color = if is_focused {
        Color::Cyan
    } else {
        Color::DarkGray
    };

    let block = Block::default()
        .title(" Actions ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut constraints: Vec<Constraint> = FormButton::ALL
        .iter()
        .map(|_| Constraint::Length(BUTTON_HEIGHT))
        .collect();
    constraints.push(Constraint::Min(0)); // Key hints
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    let is_submitting = app.form.status().is_submitting;
    for (idx, button) in FormButton::ALL.iter().enumerate() {
        let (is_enabled, accent) = match button {
            FormButton::Submit => (app.can_submit(), Some(Color::Green)),
            _ => (true, None),
        };
        let label = match button {
            FormButton::Submit if is_submitting => "Submitting",
            _ => button.label(),
        };
        render_action_button(
            frame,
            chunks[idx],
            label,
            focus == Focus::Button(*button),
            is_enabled,
            accent,
        );
    }

    let hints: Vec<Line> = key_hints()
        .into_iter()
        .map(|(key, action)| {
            Line::from(vec![
                Span::styled(
                    format!("{key:>6} "),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(action, Style::default().fg(Color::DarkGray)),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(hints), chunks[FormButton::ALL.len()]);
}

fn key_hints() -> Vec<(&'static str, &'static str)> {
    vec![
        ("Tab", "next"),
        ("S-Tab", "previous"),
        (SUBMIT_SHORTCUT, "submit"),
        ("^R", "reset"),
        ("^G", "get values"),
        (COPY_SHORTCUT, "copy values"),
        ("^U", "set value"),
        ("^T", "trigger"),
        ("^A", "add phone"),
        ("^X", "remove phone"),
        ("^C", "quit"),
    ]
}

/// Draw the status bar with the derived form flags
pub fn draw_status_bar(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let status_area = Rect {
        x: 0,
        y: area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    };

    let form = &app.form;
    let status = form.status();
    let flags = [
        (format!("Dirty {}", form.dirty_fields().len()), form.is_dirty()),
        (format!("Touched {}", form.touched_fields().len()), !form.touched_fields().is_empty()),
        ("Valid".to_string(), form.is_valid()),
        ("Submitting".to_string(), status.is_submitting),
        ("Submitted".to_string(), status.is_submitted),
        ("Successful".to_string(), status.is_submit_successful),
    ];

    let mut spans = vec![Span::raw(" ")];
    for (label, on) in flags {
        let (marker, color) = if on {
            ("●", Color::Green)
        } else {
            ("○", Color::Gray)
        };
        spans.push(Span::styled(
            format!("{marker} {label}  "),
            Style::default().fg(color),
        ));
    }
    spans.push(Span::styled(
        format!("Count: {}", status.submit_count),
        Style::default().fg(Color::White),
    ));

    if let Some(msg) = &app.state.status_message {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(msg, Style::default().fg(Color::Yellow)));
    }

    let bar = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(bar, status_area);
}
