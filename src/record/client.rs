//! Client records
//!
//! The concrete record shape this service manages, plus the form-layer
//! validation applied before data reaches the store. The query engine never
//! relies on these rules; stored records may violate them.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{KeeperError, Result};

use super::{Fields, Value};

/// Mailbox pattern accepted by the client form
pub const EMAIL_PATTERN: &str =
    r"^[A-Za-z0-9_]+([.-]?[A-Za-z0-9_]+)*@[A-Za-z0-9_]+([.-]?[A-Za-z0-9_]+)*(\.[A-Za-z0-9_]{2,3})+$";

/// Fields an update may change. Everything else is left untouched.
pub const MUTABLE_FIELDS: [&str; 3] = ["first_name", "last_name", "email"];

fn email_regex() -> Result<&'static Regex> {
    static EMAIL: OnceLock<std::result::Result<Regex, regex::Error>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(EMAIL_PATTERN))
        .as_ref()
        .map_err(|e| KeeperError::InvalidPattern(e.clone()))
}

/// A full client as entered on the create form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

impl ClientForm {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            phone: phone.into(),
        }
    }

    /// Check required fields and the email pattern
    pub fn validate(&self) -> Result<()> {
        require_non_empty("first_name", &self.first_name)?;
        require_non_empty("last_name", &self.last_name)?;
        require_non_empty("phone", &self.phone)?;
        require_email(&self.email)
    }

    /// Extract a form from raw fields; missing or non-string fields become empty
    pub fn from_fields(fields: &Fields) -> Self {
        let text = |name: &str| {
            fields
                .get(name)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        Self {
            first_name: text("first_name"),
            last_name: text("last_name"),
            email: text("email"),
            phone: text("phone"),
        }
    }

    pub fn into_fields(self) -> Fields {
        let mut fields = Fields::new();
        fields.insert("first_name".to_string(), Value::String(self.first_name));
        fields.insert("last_name".to_string(), Value::String(self.last_name));
        fields.insert("email".to_string(), Value::String(self.email));
        fields.insert("phone".to_string(), Value::String(self.phone));
        fields
    }
}

/// Partial update of the mutable client fields.
///
/// `None` leaves the stored field as it is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientUpdate {
    pub first_name: Option<Value>,
    pub last_name: Option<Value>,
    pub email: Option<Value>,
}

impl ClientUpdate {
    /// Pick the mutable fields out of an arbitrary field map
    pub fn from_fields(mut fields: Fields) -> Self {
        Self {
            first_name: fields.remove("first_name"),
            last_name: fields.remove("last_name"),
            email: fields.remove("email"),
        }
    }

    /// Form-layer check: every mutable field present, non-empty text, valid email
    pub fn validate(&self) -> Result<()> {
        require_non_empty("first_name", text_of("first_name", &self.first_name)?)?;
        require_non_empty("last_name", text_of("last_name", &self.last_name)?)?;
        require_email(text_of("email", &self.email)?)
    }

    /// Present fields as (name, value) pairs
    fn entries(&self) -> impl Iterator<Item = (&'static str, &Value)> + '_ {
        MUTABLE_FIELDS
            .into_iter()
            .zip([&self.first_name, &self.last_name, &self.email])
            .filter_map(|(name, value)| value.as_ref().map(|v| (name, v)))
    }

    /// Present fields as an owned field map
    pub fn to_fields(&self) -> Fields {
        self.entries()
            .map(|(name, value)| (name.to_string(), value.clone()))
            .collect()
    }
}

fn text_of<'a>(name: &str, value: &'a Option<Value>) -> Result<&'a str> {
    match value {
        Some(Value::String(s)) => Ok(s),
        Some(other) => Err(KeeperError::Validation(format!(
            "{} must be text, got {}",
            name,
            other.type_name()
        ))),
        None => Err(KeeperError::Validation(format!("{} is required", name))),
    }
}

fn require_non_empty(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(KeeperError::Validation(format!("{} is required", name)));
    }
    Ok(())
}

fn require_email(email: &str) -> Result<()> {
    require_non_empty("email", email)?;
    if !email_regex()?.is_match(email) {
        return Err(KeeperError::Validation(format!(
            "email {:?} is not a valid address",
            email
        )));
    }
    Ok(())
}
