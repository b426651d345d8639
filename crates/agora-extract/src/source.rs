//! Field sources and raw values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The part of a request a field is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// A named path capture.
    Path,
    /// A query-string key.
    Query,
    /// A URL-encoded or multipart form field.
    Form,
    /// A request header.
    Header,
    /// A top-level member of a JSON object body.
    Body,
}

impl Source {
    /// Returns the lowercase name of the source.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Path => "path",
            Self::Query => "query",
            Self::Form => "form",
            Self::Header => "header",
            Self::Body => "body",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The raw string found for a field, or its absence.
///
/// A present empty string is distinct from an absent value.
///
/// # Example
///
/// ```rust
/// use agora_extract::RawValue;
///
/// let empty = RawValue::present("");
/// assert!(empty.is_present());
/// assert!(empty.is_empty());
///
/// assert!(!RawValue::Absent.is_present());
/// assert_eq!(RawValue::Absent.as_str(), "");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RawValue {
    /// Nothing was found for the field.
    #[default]
    Absent,
    /// The field was supplied with this value.
    Present(String),
}

impl RawValue {
    /// Creates a present value.
    #[must_use]
    pub fn present(value: impl Into<String>) -> Self {
        Self::Present(value.into())
    }

    /// Returns the value, or `""` when absent.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Absent => "",
            Self::Present(value) => value,
        }
    }

    /// Returns true if the field was supplied.
    #[must_use]
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    /// Returns true if the field is absent or an empty string.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.as_str().is_empty()
    }

    /// Returns the value as an `Option`.
    #[must_use]
    pub fn as_option(&self) -> Option<&str> {
        match self {
            Self::Absent => None,
            Self::Present(value) => Some(value),
        }
    }
}

/// What a present value looked like in the request.
///
/// Path captures, query strings, forms and headers carry untyped text
/// ([`ValueKind::Plain`]). JSON bodies keep the kind of each member so a
/// binder can refuse, say, a number where a string was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueKind {
    /// Untyped text, or no value at all.
    #[default]
    Plain,
    /// A JSON string.
    String,
    /// A JSON number.
    Number,
    /// A JSON boolean.
    Bool,
    /// A JSON array.
    Array,
    /// A JSON object.
    Object,
}

impl ValueKind {
    /// Returns true if the value could hold a string field.
    #[must_use]
    pub fn is_textual(self) -> bool {
        matches!(self, Self::Plain | Self::String)
    }

    /// Returns true if the value could hold an integer field.
    #[must_use]
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Plain | Self::Number)
    }
}

impl From<Option<String>> for RawValue {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::Absent, Self::Present)
    }
}

impl From<Option<&str>> for RawValue {
    fn from(value: Option<&str>) -> Self {
        value.map_or(Self::Absent, Self::present)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_display() {
        assert_eq!(Source::Path.to_string(), "path");
        assert_eq!(Source::Header.to_string(), "header");
        assert_eq!(serde_json::to_string(&Source::Body).unwrap(), "\"body\"");
    }

    #[test]
    fn test_absent_and_empty_differ() {
        let absent = RawValue::Absent;
        let empty = RawValue::present("");
        assert_ne!(absent, empty);
        assert!(absent.is_empty());
        assert!(empty.is_empty());
        assert_eq!(absent.as_option(), None);
        assert_eq!(empty.as_option(), Some(""));
    }

    #[test]
    fn test_whitespace_is_not_empty() {
        assert!(!RawValue::present(" ").is_empty());
    }

    #[test]
    fn test_value_kind_compatibility() {
        assert!(ValueKind::Plain.is_textual());
        assert!(ValueKind::Plain.is_numeric());
        assert!(ValueKind::String.is_textual());
        assert!(!ValueKind::String.is_numeric());
        assert!(!ValueKind::Number.is_textual());
        assert!(!ValueKind::Array.is_textual());
        assert!(!ValueKind::Bool.is_numeric());
    }

    #[test]
    fn test_from_option() {
        assert_eq!(RawValue::from(Some("x")), RawValue::present("x"));
        assert_eq!(RawValue::from(None::<String>), RawValue::Absent);
    }
}
