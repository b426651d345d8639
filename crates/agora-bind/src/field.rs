//! Field declarations.

use agora_extract::Source;
use agora_validate::{RuleSpec, SchemaError};

/// The type a field's raw string is converted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    /// Passed through unchanged.
    Str,
    /// Parsed as a signed 64-bit integer.
    Int,
}

/// Declares one field of a record: where it is read from, its type, its
/// rules and an optional default.
///
/// # Example
///
/// ```rust
/// use agora_bind::{FieldSpec, ValueType};
/// use agora_extract::Source;
///
/// let field = FieldSpec::int("street_number", Source::Body).rules("required_with=street_address");
/// assert_eq!(field.name(), "street_number");
/// assert_eq!(field.value_type(), ValueType::Int);
/// assert_eq!(field.rule_specs()[0].param(), Some("street_address"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    name: String,
    source: Source,
    value_type: ValueType,
    rules: Vec<RuleSpec>,
    default: Option<String>,
    invalid: Option<SchemaError>,
}

impl FieldSpec {
    /// Declares a field.
    #[must_use]
    pub fn new(name: impl Into<String>, source: Source, value_type: ValueType) -> Self {
        Self {
            name: name.into(),
            source,
            value_type,
            rules: Vec::new(),
            default: None,
            invalid: None,
        }
    }

    /// Declares a string field.
    #[must_use]
    pub fn string(name: impl Into<String>, source: Source) -> Self {
        Self::new(name, source, ValueType::Str)
    }

    /// Declares an integer field.
    #[must_use]
    pub fn int(name: impl Into<String>, source: Source) -> Self {
        Self::new(name, source, ValueType::Int)
    }

    /// Appends rules in `required,oneof=A B` notation.
    ///
    /// A malformed list is reported when the schema is built.
    #[must_use]
    pub fn rules(mut self, list: &str) -> Self {
        match RuleSpec::parse_list(list) {
            Ok(specs) => self.rules.extend(specs),
            Err(err) => {
                self.invalid.get_or_insert(err);
            }
        }
        self
    }

    /// Appends one rule.
    #[must_use]
    pub fn rule(mut self, spec: RuleSpec) -> Self {
        self.rules.push(spec);
        self
    }

    /// Sets the value used when the source has nothing for this field.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Returns the field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared source.
    #[must_use]
    pub fn source(&self) -> Source {
        self.source
    }

    /// Returns the declared type.
    #[must_use]
    pub fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Returns the declared rules in order.
    #[must_use]
    pub fn rule_specs(&self) -> &[RuleSpec] {
        &self.rules
    }

    /// Returns the default value.
    #[must_use]
    pub fn default(&self) -> Option<&str> {
        self.default.as_deref()
    }

    pub(crate) fn syntax_error(&self) -> Option<&SchemaError> {
        self.invalid.as_ref()
    }
}
