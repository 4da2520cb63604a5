//! Typed field paths
//!
//! Every input of the form is addressed by a `FieldPath`. Paths parse from
//! and print as the dotted/indexed form (`social.facebook`, `phoneNumbers.1`,
//! `phNumbers.0.number`), so they double as the binding table key.

use super::FormError;
use std::fmt;
use std::str::FromStr;

/// Nested fields of the `social` group
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SocialField {
    Twitter,
    Facebook,
    Linkedin,
}

impl SocialField {
    fn key(self) -> &'static str {
        match self {
            Self::Twitter => "twitter",
            Self::Facebook => "facebook",
            Self::Linkedin => "linkedin",
        }
    }
}

/// Kind of value stored behind a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Number,
    Date,
}

/// Address of a single input in `FormValues`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldPath {
    Username,
    Email,
    Channel,
    Age,
    Dob,
    Social(SocialField),
    /// Element of the fixed `phoneNumbers` pair
    PhoneNumber(usize),
    /// `number` of the `phNumbers` entry at this index
    PhNumber(usize),
}

impl FieldPath {
    /// Fixed (non field-array) paths in display order
    pub const STATIC: [FieldPath; 10] = [
        FieldPath::Username,
        FieldPath::Email,
        FieldPath::Channel,
        FieldPath::Age,
        FieldPath::Dob,
        FieldPath::Social(SocialField::Facebook),
        FieldPath::Social(SocialField::Twitter),
        FieldPath::Social(SocialField::Linkedin),
        FieldPath::PhoneNumber(0),
        FieldPath::PhoneNumber(1),
    ];

    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Age => FieldKind::Number,
            Self::Dob => FieldKind::Date,
            _ => FieldKind::Text,
        }
    }

    /// Input label shown next to the field
    pub fn label(&self) -> String {
        match self {
            Self::Username => "Username".to_string(),
            Self::Email => "Email".to_string(),
            Self::Channel => "Channel".to_string(),
            Self::Age => "Age".to_string(),
            Self::Dob => "Date of Birth".to_string(),
            Self::Social(SocialField::Twitter) => "Twitter".to_string(),
            Self::Social(SocialField::Facebook) => "Facebook".to_string(),
            Self::Social(SocialField::Linkedin) => "LinkedIn".to_string(),
            Self::PhoneNumber(0) => "Primary Phone".to_string(),
            Self::PhoneNumber(1) => "Secondary Phone".to_string(),
            Self::PhoneNumber(i) => format!("Phone {}", i + 1),
            Self::PhNumber(i) => format!("Phone No #{}", i + 1),
        }
    }

    /// JSON pointer of this path inside the serialized values
    pub fn json_pointer(&self) -> String {
        match self {
            Self::Social(field) => format!("/social/{}", field.key()),
            Self::PhoneNumber(i) => format!("/phoneNumbers/{i}"),
            Self::PhNumber(i) => format!("/phNumbers/{i}/number"),
            other => format!("/{other}"),
        }
    }

    /// Index of a field-array row, if this path is one
    pub fn array_index(&self) -> Option<usize> {
        match self {
            Self::PhNumber(i) => Some(*i),
            _ => None,
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Username => write!(f, "username"),
            Self::Email => write!(f, "email"),
            Self::Channel => write!(f, "channel"),
            Self::Age => write!(f, "age"),
            Self::Dob => write!(f, "dob"),
            Self::Social(field) => write!(f, "social.{}", field.key()),
            Self::PhoneNumber(i) => write!(f, "phoneNumbers.{i}"),
            Self::PhNumber(i) => write!(f, "phNumbers.{i}.number"),
        }
    }
}

impl FromStr for FieldPath {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FormError::InvalidPath(s.to_string());
        let index = |segment: &str| segment.parse::<usize>().map_err(|_| invalid());

        let segments: Vec<&str> = s.split('.').collect();
        match segments.as_slice() {
            ["username"] => Ok(Self::Username),
            ["email"] => Ok(Self::Email),
            ["channel"] => Ok(Self::Channel),
            ["age"] => Ok(Self::Age),
            ["dob"] => Ok(Self::Dob),
            ["social", "twitter"] => Ok(Self::Social(SocialField::Twitter)),
            ["social", "facebook"] => Ok(Self::Social(SocialField::Facebook)),
            ["social", "linkedin"] => Ok(Self::Social(SocialField::Linkedin)),
            ["phoneNumbers", i] => Ok(Self::PhoneNumber(index(i)?)),
            ["phNumbers", i, "number"] => Ok(Self::PhNumber(index(i)?)),
            _ => Err(invalid()),
        }
    }
}

/// Field arrays managed by the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldArrayName {
    PhNumbers,
}

impl FieldArrayName {
    /// Path of the row at `index`
    pub fn row(&self, index: usize) -> FieldPath {
        match self {
            Self::PhNumbers => FieldPath::PhNumber(index),
        }
    }
}

impl fmt::Display for FieldArrayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PhNumbers => write!(f, "phNumbers"),
        }
    }
}

impl FromStr for FieldArrayName {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "phNumbers" => Ok(Self::PhNumbers),
            other => Err(FormError::UnknownFieldArray(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod parsing {
        use super::*;

        #[test]
        fn test_parses_flat_paths() {
            assert_eq!("username".parse::<FieldPath>().unwrap(), FieldPath::Username);
            assert_eq!("dob".parse::<FieldPath>().unwrap(), FieldPath::Dob);
        }

        #[test]
        fn test_parses_nested_and_indexed_paths() {
            assert_eq!(
                "social.facebook".parse::<FieldPath>().unwrap(),
                FieldPath::Social(SocialField::Facebook)
            );
            assert_eq!(
                "phoneNumbers.1".parse::<FieldPath>().unwrap(),
                FieldPath::PhoneNumber(1)
            );
            assert_eq!(
                "phNumbers.3.number".parse::<FieldPath>().unwrap(),
                FieldPath::PhNumber(3)
            );
        }

        #[test]
        fn test_rejects_unknown_paths() {
            assert!(matches!(
                "social.myspace".parse::<FieldPath>(),
                Err(FormError::InvalidPath(_))
            ));
            assert!("phNumbers.x.number".parse::<FieldPath>().is_err());
            assert!("phNumbers.0".parse::<FieldPath>().is_err());
            assert!("".parse::<FieldPath>().is_err());
        }

        #[test]
        fn test_display_matches_parse_input() {
            for input in ["email", "social.linkedin", "phoneNumbers.0", "phNumbers.2.number"] {
                let path: FieldPath = input.parse().unwrap();
                assert_eq!(path.to_string(), input);
            }
        }
    }

    mod pointers {
        use super::*;

        #[test]
        fn test_json_pointer_for_nested_fields() {
            assert_eq!(FieldPath::Username.json_pointer(), "/username");
            assert_eq!(
                FieldPath::Social(SocialField::Facebook).json_pointer(),
                "/social/facebook"
            );
            assert_eq!(FieldPath::PhoneNumber(1).json_pointer(), "/phoneNumbers/1");
            assert_eq!(FieldPath::PhNumber(0).json_pointer(), "/phNumbers/0/number");
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(FieldPath::PhoneNumber(0).label(), "Primary Phone");
        assert_eq!(FieldPath::PhNumber(1).label(), "Phone No #2");
    }

    #[test]
    fn test_field_array_name_round_trip() {
        let name: FieldArrayName = "phNumbers".parse().unwrap();
        assert_eq!(name, FieldArrayName::PhNumbers);
        assert_eq!(name.row(2), FieldPath::PhNumber(2));
        assert!(matches!(
            "emails".parse::<FieldArrayName>(),
            Err(FormError::UnknownFieldArray(_))
        ));
    }
}
