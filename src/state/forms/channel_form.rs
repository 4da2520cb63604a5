//! The channel sign-up form: its fields, rules and dependencies

use super::{
    AsyncValidator, FieldArrayName, FieldPath, FieldValue, FormController, FormError, FormValues,
    Rule, SocialField, ValidationMode,
};
use crate::remote::RecordServiceTrait;
use async_trait::async_trait;
use std::sync::Arc;

/// Email shape accepted by the form
pub const EMAIL_PATTERN: &str = r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{1,63}$";

const DISALLOWED_EMAIL: &str = "admin@example.com";
const DISALLOWED_DOMAIN: &str = "baddomain.com";
const MIN_USERNAME_LENGTH: usize = 4;
const MIN_AGE: i64 = 18;

/// Fails an email that is already registered with the record service
pub struct EmailAvailability {
    service: Arc<dyn RecordServiceTrait>,
}

impl EmailAvailability {
    pub fn new(service: Arc<dyn RecordServiceTrait>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl AsyncValidator for EmailAvailability {
    async fn validate(&self, value: &FieldValue) -> anyhow::Result<Result<(), String>> {
        if self.service.email_exists(value.as_text()).await? {
            Ok(Err("Email already exists".to_string()))
        } else {
            Ok(Ok(()))
        }
    }

    fn indeterminate_message(&self) -> String {
        "Could not verify email availability, please retry".to_string()
    }
}

/// Build the controller with every field of the form registered
pub fn channel_form(
    service: Arc<dyn RecordServiceTrait>,
    mode: ValidationMode,
) -> Result<FormController, FormError> {
    let mut form = FormController::new(FormValues::default(), mode);

    form.register(
        FieldPath::Username,
        vec![
            Rule::required("Username is required"),
            Rule::min_length(
                MIN_USERNAME_LENGTH,
                "Username must be at least 4 characters long",
            ),
        ],
    )?;

    form.register(
        FieldPath::Email,
        vec![
            Rule::required("Email address is required"),
            Rule::pattern(EMAIL_PATTERN, "Invalid email format")?,
            Rule::validate("notAdmin", |v| {
                if v.as_text() == DISALLOWED_EMAIL {
                    Err("Enter a valid email address".to_string())
                } else {
                    Ok(())
                }
            }),
            Rule::validate("badDomain", |v| {
                if v.as_text().ends_with(DISALLOWED_DOMAIN) {
                    Err("This domain is not supported".to_string())
                } else {
                    Ok(())
                }
            }),
            Rule::validate_async("emailAvailable", Arc::new(EmailAvailability::new(service))),
        ],
    )?;

    form.register(FieldPath::Channel, vec![Rule::required("Channel is required")])?;

    form.register(
        FieldPath::Age,
        vec![
            Rule::required("Age is required"),
            Rule::min(MIN_AGE, "Age must be at least 18 years"),
        ],
    )?;

    form.register(FieldPath::Dob, vec![Rule::required("Date of Birth is required")])?;

    let facebook = FieldPath::Social(SocialField::Facebook);
    form.register(facebook, vec![Rule::required("Facebook username is required")])?;
    form.register_disabled_when(facebook, FieldPath::Channel, |channel| channel.is_empty())?;

    form.register_name(
        "social.twitter",
        vec![Rule::required("Twitter username is required")],
    )?;
    form.register_name(
        "social.linkedin",
        vec![Rule::required("Linkedin username is required")],
    )?;

    form.register_name(
        "phoneNumbers.0",
        vec![Rule::required("Primary phone no is required")],
    )?;
    form.register_name(
        "phoneNumbers.1",
        vec![Rule::required("Secondary phone no is required")],
    )?;

    form.register_field_array(
        FieldArrayName::PhNumbers,
        Arc::new(|index| vec![Rule::required(format!("Phone no {} is required", index + 1))]),
    );

    Ok(form)
}
