use lettre::message::Mailbox;
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;
use validator::{Validate, ValidationError};

use crate::{Error, Result};

static RE_EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

const REQUIRED_FIELDS: [&str; 3] = ["name", "email", "message"];

/// Contact form input for a single request.
///
/// Missing keys deserialize to empty strings so they are reported as
/// missing fields instead of failing at the JSON layer.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct Submission {
    #[serde(default)]
    #[validate(custom(function = "validate_not_blank"))]
    pub name: String,
    #[serde(default)]
    #[validate(
        custom(function = "validate_email_address"),
        email,
        regex(path = *RE_EMAIL_SHAPE)
    )]
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_not_blank"))]
    pub message: String,
    #[serde(default)]
    pub subject: Option<String>,
}

fn validate_not_blank(value: &str) -> std::result::Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }

    Ok(())
}

/// The address ends up as the Reply-To mailbox, so it must parse as one.
fn validate_email_address(value: &str) -> std::result::Result<(), ValidationError> {
    validate_not_blank(value)?;

    if value.trim().parse::<Mailbox>().is_err() {
        return Err(ValidationError::new("mailbox"));
    }

    Ok(())
}

impl Submission {
    /// Presence is checked before shape: a blank email reports missing
    /// fields, not an invalid address.
    pub fn check(&self) -> Result<()> {
        let Err(errors) = self.validate() else {
            return Ok(());
        };

        let fields = errors.field_errors();
        let missing = REQUIRED_FIELDS.iter().any(|field| {
            fields
                .get(*field)
                .is_some_and(|errs| errs.iter().any(|e| e.code == "blank"))
        });

        if missing {
            return Err(Error::MissingFields);
        }

        Err(Error::InvalidEmail)
    }

    pub fn phone(&self) -> Option<&str> {
        provided(&self.phone)
    }

    pub fn subject(&self) -> Option<&str> {
        provided(&self.subject)
    }
}

fn provided(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
