//! Form domain layer
//!
//! Typed values, path-addressed bindings, validation rules and the
//! controller that derives form state from them. `channel_form` wires the
//! concrete sign-up form on top.

mod channel_form;
mod controller;
mod error;
mod field;
mod path;
mod rules;
mod values;

pub use channel_form::channel_form;
pub use controller::{FieldBinding, FormController, SetValueOptions, SubmitOutcome, ValidationMode};
pub use error::{FieldError, FieldErrorKind, FieldErrors, FormError};
pub use field::FieldValue;
pub use path::{FieldArrayName, FieldKind, FieldPath, SocialField};
pub use rules::{AsyncValidator, Rule};
pub use values::{FormValues, PhNumber};
