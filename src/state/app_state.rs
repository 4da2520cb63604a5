//! Application state definitions

use super::forms::FieldPath;
use std::collections::VecDeque;

/// Action buttons below the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormButton {
    Submit,
    Reset,
    GetValues,
    SetValue,
    Trigger,
}

impl FormButton {
    pub const ALL: [FormButton; 5] = [
        FormButton::Submit,
        FormButton::Reset,
        FormButton::GetValues,
        FormButton::SetValue,
        FormButton::Trigger,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Submit => "Submit",
            Self::Reset => "Reset",
            Self::GetValues => "Get Values",
            Self::SetValue => "Set Value",
            Self::Trigger => "Manually Trigger",
        }
    }
}

/// Something that can hold keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Field(FieldPath),
    /// "Add Phone Numbers" control under the phone list
    AddPhone,
    Button(FormButton),
}

impl Focus {
    pub fn field(&self) -> Option<FieldPath> {
        match self {
            Focus::Field(path) => Some(*path),
            _ => None,
        }
    }
}

/// UI state that lives outside the form controller
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Index into the focus ring
    pub focus_index: usize,
    /// Raw date of birth input; the form only holds parsed dates
    pub dob_input: String,
    /// Pretty-printed values shown by "Get Values"
    pub values_panel: Option<String>,
    /// One-line feedback in the status bar
    pub status_message: Option<String>,
    /// Errors waiting to be shown in a dialog
    pub error_queue: VecDeque<String>,
}

impl AppState {
    /// Focus ring in render order for a form with `rows` phone rows
    pub fn focus_targets(rows: usize) -> Vec<Focus> {
        let mut targets: Vec<Focus> = FieldPath::STATIC.iter().copied().map(Focus::Field).collect();
        targets.extend((0..rows).map(|i| Focus::Field(FieldPath::PhNumber(i))));
        targets.push(Focus::AddPhone);
        targets.extend(FormButton::ALL.iter().copied().map(Focus::Button));
        targets
    }

    pub fn focus(&self, rows: usize) -> Focus {
        let targets = Self::focus_targets(rows);
        let index = self.focus_index.min(targets.len() - 1);
        targets[index]
    }

    pub fn next_focus(&mut self, rows: usize) {
        let count = Self::focus_targets(rows).len();
        self.focus_index = (self.focus_index + 1) % count;
    }

    pub fn prev_focus(&mut self, rows: usize) {
        let count = Self::focus_targets(rows).len();
        if self.focus_index == 0 {
            self.focus_index = count - 1;
        } else {
            self.focus_index = (self.focus_index - 1).min(count - 1);
        }
    }

    /// Move focus to `target`; ignored if it is not in the ring
    pub fn set_focus(&mut self, target: Focus, rows: usize) {
        if let Some(index) = Self::focus_targets(rows).iter().position(|t| *t == target) {
            self.focus_index = index;
        }
    }

    /// Push an error message to the error queue for display
    pub fn push_error(&mut self, message: String) {
        tracing::warn!("{message}");
        self.error_queue.push_back(message);
    }

    pub fn current_error(&self) -> Option<&str> {
        self.error_queue.front().map(String::as_str)
    }

    pub fn dismiss_error(&mut self) {
        self.error_queue.pop_front();
    }

    /// Clear per-form UI state (focus stays where it is)
    pub fn clear_form(&mut self) {
        self.dob_input.clear();
        self.values_panel = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod focus {
        use super::*;

        #[test]
        fn test_ring_order() {
            let targets = AppState::focus_targets(2);
            assert_eq!(targets[0], Focus::Field(FieldPath::Username));
            assert_eq!(targets[10], Focus::Field(FieldPath::PhNumber(0)));
            assert_eq!(targets[11], Focus::Field(FieldPath::PhNumber(1)));
            assert_eq!(targets[12], Focus::AddPhone);
            assert_eq!(targets.last(), Some(&Focus::Button(FormButton::Trigger)));
        }

        #[test]
        fn test_next_focus_wraps() {
            let mut state = AppState::default();
            let count = AppState::focus_targets(1).len();
            for _ in 0..count {
                state.next_focus(1);
            }
            assert_eq!(state.focus_index, 0);
        }

        #[test]
        fn test_prev_focus_wraps() {
            let mut state = AppState::default();
            state.prev_focus(1);
            assert_eq!(state.focus(1), Focus::Button(FormButton::Trigger));
        }

        #[test]
        fn test_focus_clamps_after_rows_removed() {
            let mut state = AppState::default();
            state.set_focus(Focus::Button(FormButton::Trigger), 3);
            assert_eq!(state.focus(1), Focus::Button(FormButton::Trigger));
        }

        #[test]
        fn test_set_focus_ignores_missing_targets() {
            let mut state = AppState::default();
            state.set_focus(Focus::Field(FieldPath::PhNumber(4)), 1);
            assert_eq!(state.focus_index, 0);
            state.set_focus(Focus::AddPhone, 1);
            assert_eq!(state.focus(1), Focus::AddPhone);
        }
    }

    mod errors {
        use super::*;

        #[test]
        fn test_queue_is_fifo() {
            let mut state = AppState::default();
            state.push_error("first".to_string());
            state.push_error("second".to_string());
            assert_eq!(state.current_error(), Some("first"));
            state.dismiss_error();
            assert_eq!(state.current_error(), Some("second"));
            state.dismiss_error();
            assert!(state.current_error().is_none());
        }
    }

    #[test]
    fn test_button_labels() {
        assert_eq!(FormButton::Trigger.label(), "Manually Trigger");
        assert_eq!(FormButton::ALL.len(), 5);
    }
}
