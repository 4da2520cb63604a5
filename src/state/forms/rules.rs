//! Declarative validation rules

use super::{FieldError, FieldErrorKind, FieldValue, FormError};
use async_trait::async_trait;
use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// Synchronous custom predicate: `Ok(())` or the error message
pub type SyncCheck = Arc<dyn Fn(&FieldValue) -> Result<(), String> + Send + Sync>;

/// A predicate that needs an external lookup to reach a verdict
#[async_trait]
pub trait AsyncValidator: Send + Sync {
    /// `Ok(Ok(()))` passes, `Ok(Err(message))` fails the field,
    /// `Err(_)` means the lookup itself failed.
    async fn validate(&self, value: &FieldValue) -> anyhow::Result<Result<(), String>>;

    /// Message shown when the lookup failed
    fn indeterminate_message(&self) -> String {
        "Validation could not be completed, please retry".to_string()
    }
}

/// One validation rule with its literal message
#[derive(Clone)]
pub enum Rule {
    Required { message: String },
    MinLength { value: usize, message: String },
    MaxLength { value: usize, message: String },
    Min { value: i64, message: String },
    Max { value: i64, message: String },
    Pattern { regex: Regex, message: String },
    Validate { name: &'static str, check: SyncCheck },
    ValidateAsync {
        name: &'static str,
        check: Arc<dyn AsyncValidator>,
    },
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Required { message } => write!(f, "Required({message:?})"),
            Rule::MinLength { value, .. } => write!(f, "MinLength({value})"),
            Rule::MaxLength { value, .. } => write!(f, "MaxLength({value})"),
            Rule::Min { value, .. } => write!(f, "Min({value})"),
            Rule::Max { value, .. } => write!(f, "Max({value})"),
            Rule::Pattern { regex, .. } => write!(f, "Pattern({})", regex.as_str()),
            Rule::Validate { name, .. } => write!(f, "Validate({name})"),
            Rule::ValidateAsync { name, .. } => write!(f, "ValidateAsync({name})"),
        }
    }
}

impl Rule {
    pub fn required(message: impl Into<String>) -> Self {
        Rule::Required {
            message: message.into(),
        }
    }

    pub fn min_length(value: usize, message: impl Into<String>) -> Self {
        Rule::MinLength {
            value,
            message: message.into(),
        }
    }

    pub fn max_length(value: usize, message: impl Into<String>) -> Self {
        Rule::MaxLength {
            value,
            message: message.into(),
        }
    }

    pub fn min(value: i64, message: impl Into<String>) -> Self {
        Rule::Min {
            value,
            message: message.into(),
        }
    }

    pub fn max(value: i64, message: impl Into<String>) -> Self {
        Rule::Max {
            value,
            message: message.into(),
        }
    }

    pub fn pattern(pattern: &str, message: impl Into<String>) -> Result<Self, FormError> {
        Ok(Rule::Pattern {
            regex: Regex::new(pattern)?,
            message: message.into(),
        })
    }

    pub fn validate<F>(name: &'static str, check: F) -> Self
    where
        F: Fn(&FieldValue) -> Result<(), String> + Send + Sync + 'static,
    {
        Rule::Validate {
            name,
            check: Arc::new(check),
        }
    }

    pub fn validate_async(name: &'static str, check: Arc<dyn AsyncValidator>) -> Self {
        Rule::ValidateAsync { name, check }
    }

    /// Run a synchronous rule. Async rules always pass here; the
    /// controller awaits them separately.
    ///
    /// Length, range and pattern rules skip empty values so that only
    /// `required` reports absence.
    pub fn check(&self, value: &FieldValue) -> Option<FieldError> {
        let fail = |kind, message: &String| Some(FieldError::new(kind, message.clone()));

        match self {
            Rule::Required { message } if value.is_empty() => fail(FieldErrorKind::Required, message),
            Rule::MinLength { value: min, message }
                if !value.is_empty() && value.as_text().chars().count() < *min =>
            {
                fail(FieldErrorKind::MinLength, message)
            }
            Rule::MaxLength { value: max, message }
                if !value.is_empty() && value.as_text().chars().count() > *max =>
            {
                fail(FieldErrorKind::MaxLength, message)
            }
            Rule::Min { value: min, message } if value.as_number().is_some_and(|n| n < *min) => {
                fail(FieldErrorKind::Min, message)
            }
            Rule::Max { value: max, message } if value.as_number().is_some_and(|n| n > *max) => {
                fail(FieldErrorKind::Max, message)
            }
            Rule::Pattern { regex, message }
                if !value.is_empty() && !regex.is_match(value.as_text()) =>
            {
                fail(FieldErrorKind::Pattern, message)
            }
            Rule::Validate { name, check } => check(value)
                .err()
                .map(|message| FieldError::new(FieldErrorKind::Validate(*name), message)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod required {
        use super::*;

        #[test]
        fn test_fails_on_empty_values() {
            let rule = Rule::required("needed");
            for value in [
                FieldValue::text(""),
                FieldValue::Number(None),
                FieldValue::Date(None),
            ] {
                let err = rule.check(&value).unwrap();
                assert_eq!(err.kind, FieldErrorKind::Required);
                assert_eq!(err.message, "needed");
            }
        }

        #[test]
        fn test_passes_on_present_values() {
            let rule = Rule::required("needed");
            assert!(rule.check(&FieldValue::text("a")).is_none());
            assert!(rule.check(&FieldValue::Number(Some(0))).is_none());
        }
    }

    mod lengths {
        use super::*;

        #[test]
        fn test_min_length_counts_chars() {
            let rule = Rule::min_length(4, "short");
            assert!(rule.check(&FieldValue::text("abc")).is_some());
            assert!(rule.check(&FieldValue::text("abcd")).is_none());
            assert!(rule.check(&FieldValue::text("ééé")).is_some());
        }

        #[test]
        fn test_length_rules_skip_empty() {
            assert!(Rule::min_length(4, "short")
                .check(&FieldValue::text(""))
                .is_none());
        }

        #[test]
        fn test_max_length() {
            let rule = Rule::max_length(2, "long");
            assert_eq!(
                rule.check(&FieldValue::text("abc")).unwrap().kind,
                FieldErrorKind::MaxLength
            );
        }
    }

    mod ranges {
        use super::*;

        #[test]
        fn test_min_boundary() {
            let rule = Rule::min(18, "too young");
            assert_eq!(
                rule.check(&FieldValue::Number(Some(17))).unwrap().message,
                "too young"
            );
            assert!(rule.check(&FieldValue::Number(Some(18))).is_none());
            assert!(rule.check(&FieldValue::Number(None)).is_none());
        }

        #[test]
        fn test_max_boundary() {
            let rule = Rule::max(120, "too old");
            assert!(rule.check(&FieldValue::Number(Some(121))).is_some());
            assert!(rule.check(&FieldValue::Number(Some(120))).is_none());
        }
    }

    #[test]
    fn test_pattern() {
        let rule = Rule::pattern(r"^\d+$", "digits only").unwrap();
        assert!(rule.check(&FieldValue::text("12a")).is_some());
        assert!(rule.check(&FieldValue::text("123")).is_none());
        assert!(rule.check(&FieldValue::text("")).is_none());
    }

    #[test]
    fn test_invalid_pattern_is_an_error() {
        assert!(matches!(
            Rule::pattern("(", "never"),
            Err(FormError::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_custom_predicate() {
        let rule = Rule::validate("notBob", |v| {
            if v.as_text() == "bob" {
                Err("no bobs".to_string())
            } else {
                Ok(())
            }
        });
        let err = rule.check(&FieldValue::text("bob")).unwrap();
        assert_eq!(err.kind, FieldErrorKind::Validate("notBob"));
        assert!(rule.check(&FieldValue::text("alice")).is_none());
    }

    #[test]
    fn test_debug_names_rule() {
        let rule = Rule::min_length(4, "x");
        assert_eq!(format!("{rule:?}"), "MinLength(4)");
    }
}
