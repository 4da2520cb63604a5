//! Form field value objects

use super::FieldKind;
use chrono::NaiveDate;

/// Date format accepted for date inputs
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Type-safe field values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Number(Option<i64>),
    Date(Option<NaiveDate>),
}

impl Default for FieldValue {
    fn default() -> Self {
        FieldValue::Text(String::new())
    }
}

impl FieldValue {
    /// Create a text value
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    /// Parse raw input the way a typed input would (`valueAsNumber`/`valueAsDate`).
    /// Unparseable numbers and dates become absent.
    pub fn from_input(kind: FieldKind, raw: &str) -> Self {
        match kind {
            FieldKind::Text => FieldValue::Text(raw.to_string()),
            FieldKind::Number => FieldValue::Number(raw.trim().parse().ok()),
            FieldKind::Date => {
                FieldValue::Date(NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok())
            }
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::Text(_) => FieldKind::Text,
            FieldValue::Number(_) => FieldKind::Number,
            FieldValue::Date(_) => FieldKind::Date,
        }
    }

    /// Empty string or absent number/date
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::Number(n) => n.is_none(),
            FieldValue::Date(d) => d.is_none(),
        }
    }

    /// Get the text value (returns empty string for other kinds)
    pub fn as_text(&self) -> &str {
        match self {
            FieldValue::Text(s) => s,
            _ => "",
        }
    }

    pub fn as_number(&self) -> Option<i64> {
        match self {
            FieldValue::Number(n) => *n,
            _ => None,
        }
    }

    /// Push a character typed into the field
    pub fn push_char(&mut self, c: char) {
        match self {
            FieldValue::Text(s) => s.push(c),
            FieldValue::Number(n) => {
                if let Some(d) = c.to_digit(10) {
                    *n = Some(n.unwrap_or(0).saturating_mul(10).saturating_add(d as i64));
                }
            }
            // Dates are edited through a raw input buffer
            FieldValue::Date(_) => {}
        }
    }

    /// Remove the last character from the field value
    pub fn pop_char(&mut self) {
        match self {
            FieldValue::Text(s) => {
                s.pop();
            }
            FieldValue::Number(n) => {
                *n = n.and_then(|v| if v.abs() < 10 { None } else { Some(v / 10) });
            }
            FieldValue::Date(_) => {}
        }
    }

    /// Get the display value for rendering
    pub fn display_value(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Number(n) => n.map(|v| v.to_string()).unwrap_or_default(),
            FieldValue::Date(d) => d
                .map(|v| v.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty_text() {
        let value = FieldValue::default();
        assert_eq!(value, FieldValue::Text(String::new()));
        assert!(value.is_empty());
    }

    #[test]
    fn test_is_empty_per_kind() {
        assert!(FieldValue::Number(None).is_empty());
        assert!(!FieldValue::Number(Some(0)).is_empty());
        assert!(FieldValue::Date(None).is_empty());
        assert!(!FieldValue::text("x").is_empty());
    }

    #[test]
    fn test_number_typing() {
        let mut value = FieldValue::Number(None);
        value.push_char('1');
        value.push_char('8');
        value.push_char('x');
        assert_eq!(value.as_number(), Some(18));
        value.pop_char();
        assert_eq!(value.as_number(), Some(1));
        value.pop_char();
        assert_eq!(value.as_number(), None);
    }

    #[test]
    fn test_text_typing() {
        let mut value = FieldValue::text("ab");
        value.push_char('c');
        assert_eq!(value.as_text(), "abc");
        value.pop_char();
        assert_eq!(value.display_value(), "ab");
    }

    #[test]
    fn test_from_input_parses_dates() {
        let value = FieldValue::from_input(FieldKind::Date, "2001-02-03");
        assert_eq!(value, FieldValue::Date(NaiveDate::from_ymd_opt(2001, 2, 3)));
        assert_eq!(value.display_value(), "2001-02-03");

        let partial = FieldValue::from_input(FieldKind::Date, "2001-02");
        assert_eq!(partial, FieldValue::Date(None));
    }

    #[test]
    fn test_from_input_parses_numbers() {
        assert_eq!(
            FieldValue::from_input(FieldKind::Number, "42"),
            FieldValue::Number(Some(42))
        );
        assert_eq!(
            FieldValue::from_input(FieldKind::Number, "4x"),
            FieldValue::Number(None)
        );
    }
}
