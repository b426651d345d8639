//! Raw values collected for one bind.

use agora_extract::RawValue;
use indexmap::IndexMap;

static ABSENT: RawValue = RawValue::Absent;

/// Raw field values in declaration order.
///
/// Cross-field rules read their referenced field from here, so every field
/// is collected before any rule runs.
///
/// # Example
///
/// ```rust
/// use agora_extract::RawValue;
/// use agora_validate::RawValues;
///
/// let mut values = RawValues::new();
/// values.insert("street_address", RawValue::present("Main St"));
///
/// assert_eq!(values.get("street_address").as_str(), "Main St");
/// assert_eq!(values.get("street_number"), &RawValue::Absent);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawValues {
    values: IndexMap<String, RawValue>,
}

impl RawValues {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the value for a field, replacing any earlier one.
    pub fn insert(&mut self, name: impl Into<String>, value: RawValue) {
        self.values.insert(name.into(), value);
    }

    /// Returns the value for `name`, or [`RawValue::Absent`] if none was
    /// recorded.
    #[must_use]
    pub fn get(&self, name: &str) -> &RawValue {
        self.values.get(name).unwrap_or(&ABSENT)
    }

    /// Returns true if a value was recorded for `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Returns the number of recorded fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RawValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>> FromIterator<(K, RawValue)> for RawValues {
    fn from_iter<I: IntoIterator<Item = (K, RawValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
