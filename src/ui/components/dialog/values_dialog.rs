//! Form values dialog

use super::base::{render_dialog, DialogConfig};
use ratatui::{
    style::{Color, Modifier, Style},
    text::Span,
    Frame,
};

/// Render the pretty-printed form values
pub fn render_values_dialog(frame: &mut Frame, json: &str, copy_shortcut: &str) {
    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let hint = vec![
        Span::styled(copy_shortcut, key_style),
        Span::raw(" copy  "),
        Span::styled("Esc", key_style),
        Span::raw(" close"),
    ];

    render_dialog(
        frame,
        DialogConfig {
            title: "Form Values",
            title_color: Color::Cyan,
            border_color: Color::Cyan,
            message: json,
            hint: Some(hint),
            max_width: 70,
        },
    );
}
