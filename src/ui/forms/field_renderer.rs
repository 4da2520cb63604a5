//! Field rendering utilities for forms

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Everything needed to draw one input
pub struct FieldView<'a> {
    pub label: &'a str,
    pub value: &'a str,
    pub is_active: bool,
    pub is_disabled: bool,
    pub error: Option<&'a str>,
    /// Right-aligned title, e.g. a remove hint on list rows
    pub action: Option<&'a str>,
}

/// Draw a bordered input; the error message sits on the bottom border
pub fn draw_field(frame: &mut Frame, area: Rect, field: &FieldView) {
    let border_style = if field.error.is_some() {
        Style::default().fg(Color::Red)
    } else if field.is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let text_style = if field.is_disabled {
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::DIM)
    } else if field.is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let display = if field.is_disabled {
        "(disabled)"
    } else if field.value.is_empty() && !field.is_active {
        "(empty)"
    } else {
        field.value
    };

    let mut spans = vec![Span::styled(display, text_style)];
    if field.is_active && !field.is_disabled {
        spans.push(Span::styled("▌", Style::default().fg(Color::Cyan)));
    }

    let mut block = Block::default()
        .title(format!(" {} ", field.label))
        .borders(Borders::ALL)
        .border_style(border_style);

    if let Some(action) = field.action {
        block = block.title(
            Line::from(Span::styled(
                format!(" {action} "),
                Style::default().fg(Color::Yellow),
            ))
            .right_aligned(),
        );
    }
    if let Some(error) = field.error {
        block = block.title_bottom(Span::styled(
            format!(" {error} "),
            Style::default().fg(Color::Red),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}
