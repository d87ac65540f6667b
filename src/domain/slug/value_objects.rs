use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write as _};

/// Value written into a slug field that doubles as the record identifier
/// until the real slug has been generated.
pub const IDENTIFIER_PLACEHOLDER: &str = "__id__";

/// A single field value read from or written to a record.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue {
    #[default]
    Null,
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
    Time(NaiveTime),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Null or an empty string.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(value) => value.is_empty(),
            _ => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.as_text() == Some(IDENTIFIER_PLACEHOLDER)
    }

    /// Renders the value as slug source text. Temporal values go through
    /// `date_format`; null renders as an empty string.
    pub fn to_source_text(&self, date_format: &str) -> String {
        match self {
            Self::Null => String::new(),
            Self::Date(value) => render(value.format(date_format), self),
            Self::DateTime(value) => render(value.format(date_format), self),
            Self::Time(value) => render(value.format(date_format), self),
            other => other.to_string(),
        }
    }
}

// A format item that does not apply to the value (e.g. `%H` on a date) makes
// chrono report a fmt error; fall back to the plain rendering.
fn render(formatted: impl fmt::Display, value: &FieldValue) -> String {
    let mut out = String::new();
    match write!(out, "{formatted}") {
        Ok(()) => out,
        Err(_) => value.to_string(),
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Text(value) => f.write_str(value),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Date(value) => write!(f, "{}", value.format("%Y-%m-%d")),
            Self::DateTime(value) => f.write_str(&value.to_rfc3339()),
            Self::Time(value) => write!(f, "{}", value.format("%H:%M:%S")),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::DateTime(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Letter-casing applied to a slug after urlization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlugStyle {
    #[default]
    None,
    Camel,
    Lower,
    Upper,
}

impl std::str::FromStr for SlugStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" | "default" => Ok(Self::None),
            "camel" => Ok(Self::Camel),
            "lower" => Ok(Self::Lower),
            "upper" => Ok(Self::Upper),
            other => Err(format!("unknown slug style `{other}`")),
        }
    }
}

/// Opaque handle to a record managed by a change tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordHandle(pub usize);

impl fmt::Display for RecordHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
