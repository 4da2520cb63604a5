//! Form and field error types

use super::FieldPath;
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors raised by form operations (not validation failures)
#[derive(Debug, Error)]
pub enum FormError {
    #[error("invalid field path: {0}")]
    InvalidPath(String),
    #[error("field path {0} does not address a value in the form")]
    UnknownPath(FieldPath),
    #[error("unknown field array: {0}")]
    UnknownFieldArray(String),
    #[error("value for {path} must be {expected}")]
    TypeMismatch {
        path: FieldPath,
        expected: &'static str,
    },
    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Which rule produced a field error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldErrorKind {
    Required,
    MinLength,
    MaxLength,
    Min,
    Max,
    Pattern,
    /// Named custom predicate
    Validate(&'static str),
    /// Named async predicate that could not reach a verdict
    Indeterminate(&'static str),
}

/// A single, user-correctable validation failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub kind: FieldErrorKind,
    pub message: String,
}

impl FieldError {
    pub fn new(kind: FieldErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validation errors keyed by field path
pub type FieldErrors = BTreeMap<FieldPath, FieldError>;
