//! UI module for rendering the TUI

mod components;
mod forms;
mod layout;

use crate::app::App;
use crate::platform::COPY_SHORTCUT;
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let (form_area, action_area) = layout::create_layout(frame.area());

    forms::draw_channel_form(frame, form_area, app);
    layout::draw_action_panel(frame, action_area, app);
    layout::draw_status_bar(frame, app);

    // Overlays, error dialog on top
    if let Some(json) = &app.state.values_panel {
        components::render_values_dialog(frame, json, COPY_SHORTCUT);
    }
    if let Some(error) = app.state.current_error() {
        components::render_error_dialog(frame, error, app.state.error_queue.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TuiConfig;
    use crate::remote::MockRecordServiceTrait;
    use ratatui::{backend::TestBackend, Terminal};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn render(app: &App) -> String {
        let backend = TestBackend::new(110, 50);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn app() -> App {
        let mut mock = MockRecordServiceTrait::new();
        mock.expect_email_exists().returning(|_| Ok(false));
        App::with_service(Arc::new(mock), TuiConfig::default()).unwrap()
    }

    #[test]
    fn test_draws_fields_and_actions() {
        let screen = render(&app());
        assert!(screen.contains("YouTube Form"));
        assert!(screen.contains("Username"));
        assert!(screen.contains("Phone No #1"));
        assert!(screen.contains("Add Phone Numbers"));
        assert!(screen.contains("Manually Trigger"));
        assert!(screen.contains("Count: 0"));
    }

    #[tokio::test]
    async fn test_draws_inline_errors_and_remove_hint() {
        let mut app = app();
        app.append_phone().await;
        app.trigger().await;
        let screen = render(&app);
        assert!(screen.contains("Username is required"));
        assert!(screen.contains("Email address is required"));
        assert!(screen.contains("^X Remove"));
    }

    #[test]
    fn test_submit_button_shows_submission_in_flight() {
        let mut app = app();
        // The status bar always carries the flag label
        assert_eq!(render(&app).matches("Submitting").count(), 1);

        app.form.begin_submit();
        let screen = render(&app);
        assert_eq!(screen.matches("Submitting").count(), 2);
        assert!(screen.contains("● Submitting"));
    }

    #[test]
    fn test_status_bar_counts_dirty_and_touched() {
        let screen = render(&app());
        assert!(screen.contains("○ Dirty 0"));
        assert!(screen.contains("○ Touched 0"));
        assert!(screen.contains("○ Valid"));
    }

    #[test]
    fn test_draws_error_dialog_over_form() {
        let mut app = app();
        app.state.push_error("Submission failed: timeout".to_string());
        let screen = render(&app);
        assert!(screen.contains("Submission failed: timeout"));
        assert!(screen.contains("to dismiss"));
    }
}
