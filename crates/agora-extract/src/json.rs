//! JSON object bodies.
//!
//! Only top-level members are addressable. Scalars are read back as the
//! text a client would have typed, nested values as compact JSON.

use serde_json::{Map, Value};

use crate::{ExtractionError, RawValue, Source, ValueKind};

/// A decoded JSON object body.
///
/// # Example
///
/// ```rust
/// use agora_extract::{JsonObject, RawValue};
///
/// let body = JsonObject::parse(br#"{"id": 7, "name": "Ada", "tags": null}"#).unwrap();
/// assert_eq!(body.member("id"), RawValue::present("7"));
/// assert_eq!(body.member("name"), RawValue::present("Ada"));
/// assert_eq!(body.member("tags"), RawValue::Absent);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonObject {
    members: Map<String, Value>,
}

impl JsonObject {
    /// Parses a body that must be a JSON object.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid JSON or not an object.
    pub fn parse(body: &[u8]) -> Result<Self, ExtractionError> {
        let value: Value = serde_json::from_slice(body)
            .map_err(|e| ExtractionError::deserialization_failed(Source::Body, e.to_string()))?;
        match value {
            Value::Object(members) => Ok(Self { members }),
            other => Err(ExtractionError::deserialization_failed(
                Source::Body,
                format!("expected a JSON object, got {}", kind(&other)),
            )),
        }
    }

    /// Returns the raw text of a top-level member.
    #[must_use]
    pub fn member(&self, name: &str) -> RawValue {
        match self.members.get(name) {
            None | Some(Value::Null) => RawValue::Absent,
            Some(Value::String(s)) => RawValue::present(s.as_str()),
            Some(other) => RawValue::present(other.to_string()),
        }
    }

    /// Returns the JSON kind of a top-level member. Missing and `null`
    /// members are [`ValueKind::Plain`].
    ///
    /// ```rust
    /// use agora_extract::{JsonObject, ValueKind};
    ///
    /// let body = JsonObject::parse(br#"{"street_number": "7", "tags": ["x"]}"#).unwrap();
    /// assert_eq!(body.kind("street_number"), ValueKind::String);
    /// assert_eq!(body.kind("tags"), ValueKind::Array);
    /// assert_eq!(body.kind("missing"), ValueKind::Plain);
    /// ```
    #[must_use]
    pub fn kind(&self, name: &str) -> ValueKind {
        match self.members.get(name) {
            None | Some(Value::Null) => ValueKind::Plain,
            Some(Value::String(_)) => ValueKind::String,
            Some(Value::Number(_)) => ValueKind::Number,
            Some(Value::Bool(_)) => ValueKind::Bool,
            Some(Value::Array(_)) => ValueKind::Array,
            Some(Value::Object(_)) => ValueKind::Object,
        }
    }

    /// Returns the number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Returns true if the object has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
