//! Form rendering module
//!
//! - `field_renderer`: single input with inline error
//! - `channel_form`: the channel sign-up form

mod channel_form;
mod field_renderer;

pub use channel_form::draw_channel_form;
