//! Bound records.

use indexmap::IndexMap;
use serde::Serialize;

/// A typed field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// A string value.
    Str(String),
    /// An integer value.
    Int(i64),
}

impl Value {
    /// Returns the string, if this is a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            Self::Int(_) => None,
        }
    }

    /// Returns the integer, if this is an integer value.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::Str(_) => None,
        }
    }
}

/// A fully bound record, keyed by field name in declaration order.
///
/// Serializes as a JSON object.
///
/// # Example
///
/// ```rust
/// use agora_bind::{Record, Value};
///
/// let record: Record = [("id", Value::Int(7)), ("name", Value::Str("Ada".into()))]
///     .into_iter()
///     .collect();
///
/// assert_eq!(record.int("id"), Some(7));
/// assert_eq!(record.str("name"), Some("Ada"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Record {
    values: IndexMap<String, Value>,
}

impl Record {
    pub(crate) fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    /// Returns the value of a field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Returns a string field.
    #[must_use]
    pub fn str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// Returns an integer field.
    #[must_use]
    pub fn int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_int)
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the record has no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_object_in_order() {
        let record: Record = [
            ("role", Value::Str("Admin".into())),
            ("street_number", Value::Int(0)),
        ]
        .into_iter()
        .collect();
        assert_eq!(
            serde_json::to_string(&record).unwrap(),
            r#"{"role":"Admin","street_number":0}"#
        );
    }

    #[test]
    fn test_typed_accessors() {
        let record: Record = [("id", Value::Int(3))].into_iter().collect();
        assert_eq!(record.int("id"), Some(3));
        assert_eq!(record.str("id"), None);
        assert_eq!(record.get("missing"), None);
    }
}
