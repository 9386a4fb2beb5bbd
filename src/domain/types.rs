//! Strongly-typed value objects used by domain entities.
//!
//! Backend identifiers arrive in several shapes: a plain string, a number,
//! or an expanded record carrying `_id`/`id`. Everything that compares
//! identifiers goes through [`normalize_id`] so that the saved, purchased
//! and catalog views agree on what "the same lead" means.
use std::fmt::{Display, Formatter};
use std::ops::Deref;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided identifier contained no non-whitespace characters.
    #[error("id cannot be empty")]
    EmptyId,
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Backend record carried neither `_id` nor `id`.
    #[error("record has no id")]
    MissingId,
}

/// Produces the comparison key for a backend identifier.
///
/// Identifiers are compared as trimmed strings; an all-whitespace id is
/// rejected.
pub fn normalize_id(raw: &str) -> Result<String, TypeConstraintError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Err(TypeConstraintError::EmptyId)
    } else {
        Ok(trimmed.to_string())
    }
}

/// Wire shape of an identifier before normalization.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

impl RawId {
    fn into_key(self) -> Result<String, TypeConstraintError> {
        match self {
            RawId::Text(text) => normalize_id(&text),
            RawId::Number(number) => normalize_id(&number.to_string()),
        }
    }
}

/// Macro to generate newtypes for backend identifiers.
macro_rules! backend_id_newtype {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Clone, Debug, Serialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier from its normalized string key.
            pub fn new<S: AsRef<str>>(value: S) -> Result<Self, TypeConstraintError> {
                normalize_id(value.as_ref()).map(Self)
            }

            /// Borrow the normalized key.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the wrapper and return the owned key.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = TypeConstraintError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: Deserializer<'de>,
            {
                RawId::deserialize(deserializer)?
                    .into_key()
                    .map(Self)
                    .map_err(serde::de::Error::custom)
            }
        }
    };
}

/// Picks a record's identifier from its `_id` and `id` keys.
///
/// Records may carry both when the backend adds the virtual `id`; `_id` wins.
pub fn record_id<T>(
    primary: Option<T>,
    virtual_id: Option<T>,
) -> Result<T, TypeConstraintError> {
    primary.or(virtual_id).ok_or(TypeConstraintError::MissingId)
}

backend_id_newtype!(CustomerId, "Unique identifier for a marketplace customer.");
backend_id_newtype!(LeadId, "Unique identifier for a lead.");

/// Trimmed string that is guaranteed to hold at least one character.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Validates that the provided value is not blank after trimming.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            Err(TypeConstraintError::EmptyString)
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    /// Borrow the value as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for NonEmptyString {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Deserializes an optional backend timestamp.
///
/// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD` dates (taken as UTC
/// midnight). Anything else, including `null`, becomes `None` so one odd
/// date never poisons a whole lead list.
pub fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(serde_json::Value::as_str).and_then(parse_timestamp))
}

fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
