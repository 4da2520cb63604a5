//! Dialog components for TUI

mod base;
mod error_dialog;
mod values_dialog;

pub use error_dialog::render_error_dialog;
pub use values_dialog::render_values_dialog;
