//! The typed record behind the channel form

use super::{FieldKind, FieldPath, FieldValue, FormError, SocialField};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Social handles group
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Social {
    pub twitter: String,
    pub facebook: String,
    pub linkedin: String,
}

/// One row of the `phNumbers` field array
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhNumber {
    /// Stable row key, independent of the row's position
    #[serde(skip, default = "Uuid::new_v4")]
    pub id: Uuid,
    pub number: String,
}

impl PhNumber {
    pub fn new(number: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            number: number.into(),
        }
    }
}

impl Default for PhNumber {
    fn default() -> Self {
        Self::new("")
    }
}

// Row keys are identity, not content
impl PartialEq for PhNumber {
    fn eq(&self, other: &Self) -> bool {
        self.number == other.number
    }
}

impl Eq for PhNumber {}

/// All values of the channel form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormValues {
    pub username: String,
    pub email: String,
    pub channel: String,
    pub age: Option<i64>,
    pub dob: Option<NaiveDate>,
    pub social: Social,
    pub phone_numbers: [String; 2],
    pub ph_numbers: Vec<PhNumber>,
}

impl Default for FormValues {
    fn default() -> Self {
        Self {
            username: String::new(),
            email: String::new(),
            channel: String::new(),
            age: None,
            dob: None,
            social: Social::default(),
            phone_numbers: [String::new(), String::new()],
            ph_numbers: vec![PhNumber::default()],
        }
    }
}

impl FormValues {
    /// Whether `path` addresses an existing value
    pub fn contains(&self, path: FieldPath) -> bool {
        self.get(path).is_some()
    }

    /// Read the value at `path`
    pub fn get(&self, path: FieldPath) -> Option<FieldValue> {
        let value = match path {
            FieldPath::Username => FieldValue::Text(self.username.clone()),
            FieldPath::Email => FieldValue::Text(self.email.clone()),
            FieldPath::Channel => FieldValue::Text(self.channel.clone()),
            FieldPath::Age => FieldValue::Number(self.age),
            FieldPath::Dob => FieldValue::Date(self.dob),
            FieldPath::Social(field) => FieldValue::Text(self.social_field(field).clone()),
            FieldPath::PhoneNumber(i) => FieldValue::Text(self.phone_numbers.get(i)?.clone()),
            FieldPath::PhNumber(i) => FieldValue::Text(self.ph_numbers.get(i)?.number.clone()),
        };
        Some(value)
    }

    /// Write `value` at `path`
    pub fn set(&mut self, path: FieldPath, value: FieldValue) -> Result<(), FormError> {
        if value.kind() != path.kind() {
            let expected = match path.kind() {
                FieldKind::Text => "text",
                FieldKind::Number => "a number",
                FieldKind::Date => "a date",
            };
            return Err(FormError::TypeMismatch { path, expected });
        }

        // Number and date kinds belong to `age` and `dob` only
        match value {
            FieldValue::Number(n) => self.age = n,
            FieldValue::Date(d) => self.dob = d,
            FieldValue::Text(text) => *self.text_slot(path)? = text,
        }
        Ok(())
    }

    fn social_field(&self, field: SocialField) -> &String {
        match field {
            SocialField::Twitter => &self.social.twitter,
            SocialField::Facebook => &self.social.facebook,
            SocialField::Linkedin => &self.social.linkedin,
        }
    }

    fn text_slot(&mut self, path: FieldPath) -> Result<&mut String, FormError> {
        let slot = match path {
            FieldPath::Username => Some(&mut self.username),
            FieldPath::Email => Some(&mut self.email),
            FieldPath::Channel => Some(&mut self.channel),
            FieldPath::Social(SocialField::Twitter) => Some(&mut self.social.twitter),
            FieldPath::Social(SocialField::Facebook) => Some(&mut self.social.facebook),
            FieldPath::Social(SocialField::Linkedin) => Some(&mut self.social.linkedin),
            FieldPath::PhoneNumber(i) => self.phone_numbers.get_mut(i),
            FieldPath::PhNumber(i) => self.ph_numbers.get_mut(i).map(|row| &mut row.number),
            FieldPath::Age | FieldPath::Dob => None,
        };
        slot.ok_or(FormError::UnknownPath(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_defaults_match_literal_shape() {
        let values = FormValues::default();
        let json = serde_json::to_value(&values).unwrap();
        assert_eq!(
            json,
            json!({
                "username": "",
                "email": "",
                "channel": "",
                "age": null,
                "dob": null,
                "social": { "twitter": "", "facebook": "", "linkedin": "" },
                "phoneNumbers": ["", ""],
                "phNumbers": [{ "number": "" }]
            })
        );
    }

    #[test]
    fn test_get_and_set_nested_paths() {
        let mut values = FormValues::default();
        values
            .set(FieldPath::Social(SocialField::Linkedin), FieldValue::text("jdoe"))
            .unwrap();
        values
            .set(FieldPath::PhoneNumber(1), FieldValue::text("555"))
            .unwrap();
        values.set(FieldPath::Age, FieldValue::Number(Some(30))).unwrap();

        assert_eq!(values.social.linkedin, "jdoe");
        assert_eq!(values.phone_numbers[1], "555");
        assert_eq!(values.get(FieldPath::Age), Some(FieldValue::Number(Some(30))));
    }

    #[test]
    fn test_out_of_range_paths() {
        let mut values = FormValues::default();
        assert!(!values.contains(FieldPath::PhNumber(1)));
        assert!(!values.contains(FieldPath::PhoneNumber(2)));
        assert!(matches!(
            values.set(FieldPath::PhNumber(4), FieldValue::text("1")),
            Err(FormError::UnknownPath(FieldPath::PhNumber(4)))
        ));
    }

    #[test]
    fn test_type_mismatch() {
        let mut values = FormValues::default();
        assert!(matches!(
            values.set(FieldPath::Age, FieldValue::text("eighteen")),
            Err(FormError::TypeMismatch { .. })
        ));
        assert!(matches!(
            values.set(FieldPath::Username, FieldValue::Number(Some(1))),
            Err(FormError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_row_identity_does_not_affect_equality() {
        assert_eq!(PhNumber::new("1"), PhNumber::new("1"));
        assert_ne!(PhNumber::new("1").id, PhNumber::new("1").id);
        assert_eq!(FormValues::default(), FormValues::default());
    }
}
