//! Channel form rendering

use super::field_renderer::{draw_field, FieldView};
use crate::app::App;
use crate::state::{FieldPath, Focus};
use crate::ui::components::{render_button, BUTTON_HEIGHT};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const FIELD_HEIGHT: u16 = 3;

/// Draw the form: fixed fields in two columns, then the phone list
pub fn draw_channel_form(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(" YouTube Form ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let (left, right) = FieldPath::STATIC.split_at(5);
    let column_height = FIELD_HEIGHT * left.len() as u16;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(column_height), // Fixed fields
            Constraint::Min(0),                // Phone list
        ])
        .margin(1)
        .split(inner);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[0]);

    draw_column(frame, columns[0], app, left);
    draw_column(frame, columns[1], app, right);
    draw_phone_list(frame, chunks[1], app);
}

fn draw_column(frame: &mut Frame, area: Rect, app: &App, paths: &[FieldPath]) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(paths.iter().map(|_| Constraint::Length(FIELD_HEIGHT)))
        .split(area);

    for (path, row) in paths.iter().zip(rows.iter()) {
        draw_form_field(frame, *row, app, *path, None);
    }
}

fn draw_phone_list(frame: &mut Frame, area: Rect, app: &App) {
    let count = app.rows();
    let mut constraints = vec![Constraint::Length(1)]; // Heading
    constraints.extend((0..count).map(|_| Constraint::Length(FIELD_HEIGHT)));
    constraints.push(Constraint::Length(BUTTON_HEIGHT)); // Add control
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    let heading = Paragraph::new("List of phone numbers")
        .style(Style::default().add_modifier(Modifier::BOLD));
    frame.render_widget(heading, chunks[0]);

    for index in 0..count {
        // The first row cannot be removed
        let action = (index > 0).then_some("^X Remove");
        draw_form_field(
            frame,
            chunks[index + 1],
            app,
            FieldPath::PhNumber(index),
            action,
        );
    }

    let add_area = Rect {
        width: chunks[count + 1].width.min(26),
        ..chunks[count + 1]
    };
    render_button(
        frame,
        add_area,
        "+ Add Phone Numbers",
        app.focus() == Focus::AddPhone,
        true,
    );
}

fn draw_form_field(frame: &mut Frame, area: Rect, app: &App, path: FieldPath, action: Option<&str>) {
    // Unregistered paths render as plain inputs
    let binding = app.form.binding(path);
    let value = app.input_text(path);
    let label = path.label();
    let field = FieldView {
        label: &label,
        value: &value,
        is_active: app.focus() == Focus::Field(path),
        is_disabled: binding.is_some_and(|b| b.is_disabled(&app.form)),
        error: binding
            .and_then(|b| b.error(&app.form))
            .map(|e| e.message.as_str()),
        action,
    };
    draw_field(frame, area, &field);
}
