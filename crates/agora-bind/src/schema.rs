//! Record schemas.
//!
//! A [`RecordSchema`] is an ordered list of fields whose rules have been
//! resolved against a [`RuleRegistry`]. Building one is the only place a
//! misdeclared field can be noticed, so every check runs there.

use std::collections::HashSet;

use agora_extract::Source;
use agora_validate::{BoundRule, RuleRegistry, SchemaError};

use crate::FieldSpec;

/// A field together with its resolved rules.
#[derive(Debug, Clone)]
pub struct SchemaField {
    spec: FieldSpec,
    rules: Vec<BoundRule>,
}

impl SchemaField {
    /// Returns the declaration.
    #[must_use]
    pub fn spec(&self) -> &FieldSpec {
        &self.spec
    }

    /// Returns the resolved rules in declared order.
    #[must_use]
    pub fn rules(&self) -> &[BoundRule] {
        &self.rules
    }
}

/// One bindable record shape.
///
/// # Example
///
/// ```rust
/// use agora_bind::{FieldSpec, RecordSchema};
/// use agora_extract::Source;
/// use agora_validate::RuleRegistry;
///
/// let registry = RuleRegistry::with_builtins()?;
/// let schema = RecordSchema::builder("User")
///     .field(FieldSpec::int("id", Source::Path))
///     .field(FieldSpec::string("role", Source::Query).rules("oneof=Basic Admin"))
///     .build(&registry)?;
///
/// assert_eq!(schema.name(), "User");
/// assert_eq!(schema.len(), 2);
/// schema.check_captures("users.get", &["id".to_string()])?;
/// # Ok::<(), agora_validate::SchemaError>(())
/// ```
#[derive(Debug, Clone)]
pub struct RecordSchema {
    name: String,
    fields: Vec<SchemaField>,
}

impl RecordSchema {
    /// Starts declaring a schema.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> RecordSchemaBuilder {
        RecordSchemaBuilder {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Returns the schema name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[SchemaField] {
        &self.fields
    }

    /// Returns the number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the schema declares no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns true if any field is read from the request body.
    #[must_use]
    pub fn reads_body(&self) -> bool {
        self.fields
            .iter()
            .any(|f| matches!(f.spec().source(), Source::Form | Source::Body))
    }

    /// Checks that every path field names a capture of the route it will be
    /// bound on.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UndeclaredCapture`] for the first path field
    /// with no matching capture.
    pub fn check_captures(&self, route_id: &str, captures: &[String]) -> Result<(), SchemaError> {
        let missing = self
            .fields
            .iter()
            .map(SchemaField::spec)
            .filter(|f| f.source() == Source::Path)
            .find(|f| !captures.iter().any(|c| c == f.name()));

        match missing {
            Some(field) => Err(SchemaError::UndeclaredCapture {
                schema: self.name.clone(),
                capture: field.name().to_string(),
                route: route_id.to_string(),
            }),
            None => Ok(()),
        }
    }
}

/// Collects fields for a [`RecordSchema`].
#[derive(Debug, Clone)]
pub struct RecordSchemaBuilder {
    name: String,
    fields: Vec<FieldSpec>,
}

impl RecordSchemaBuilder {
    /// Appends a field.
    #[must_use]
    pub fn field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    /// Resolves every field's rules against `registry`.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaError`] for duplicate fields, malformed rule lists,
    /// unknown rules, missing rule parameters or unknown field references.
    pub fn build(self, registry: &RuleRegistry) -> Result<RecordSchema, SchemaError> {
        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name()) {
                return Err(SchemaError::DuplicateField {
                    schema: self.name.clone(),
                    field: field.name().to_string(),
                });
            }
        }

        let declared: Vec<&str> = self.fields.iter().map(FieldSpec::name).collect();
        let mut fields = Vec::with_capacity(self.fields.len());
        for spec in &self.fields {
            if let Some(err) = spec.syntax_error() {
                return Err(err.clone());
            }
            let rules = registry.bind(spec.name(), spec.rule_specs(), &declared)?;
            fields.push(SchemaField {
                spec: spec.clone(),
                rules,
            });
        }

        Ok(RecordSchema {
            name: self.name,
            fields,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> RuleRegistry {
        RuleRegistry::builder()
            .register_pattern("password", r"[A-Za-z0-9_]{8,}")
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn test_rules_resolved_in_order() {
        let schema = RecordSchema::builder("Customer")
            .field(FieldSpec::string("password", Source::Body).rules("required,password"))
            .build(&registry())
            .unwrap();
        let names: Vec<&str> = schema.fields()[0].rules().iter().map(BoundRule::name).collect();
        assert_eq!(names, vec!["required", "password"]);
    }

    #[test]
    fn test_duplicate_field() {
        let err = RecordSchema::builder("Customer")
            .field(FieldSpec::string("email", Source::Body))
            .field(FieldSpec::string("email", Source::Query))
            .build(&registry())
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateField { .. }));
    }

    #[test]
    fn test_unknown_rule_fails_build() {
        let err = RecordSchema::builder("Customer")
            .field(FieldSpec::string("password", Source::Body).rules("required,password"))
            .build(&RuleRegistry::with_builtins().unwrap())
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::UnknownRule {
                field: "password".to_string(),
                rule: "password".to_string()
            }
        );
    }

    #[test]
    fn test_syntax_error_surfaces_at_build() {
        let err = RecordSchema::builder("Customer")
            .field(FieldSpec::string("role", Source::Body).rules("required,"))
            .build(&registry())
            .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidRuleSyntax { .. }));
    }

    #[test]
    fn test_forward_field_reference_allowed() {
        let schema = RecordSchema::builder("Address")
            .field(FieldSpec::int("street_number", Source::Body).rules("required_with=street_address"))
            .field(FieldSpec::string("street_address", Source::Body))
            .build(&registry());
        assert!(schema.is_ok());
    }

    #[test]
    fn test_reads_body() {
        let lookup = RecordSchema::builder("Lookup")
            .field(FieldSpec::string("id", Source::Path))
            .field(FieldSpec::string("x-secure-host", Source::Header))
            .build(&registry())
            .unwrap();
        assert!(!lookup.reads_body());

        let signup = RecordSchema::builder("Signup")
            .field(FieldSpec::string("name", Source::Form))
            .build(&registry())
            .unwrap();
        assert!(signup.reads_body());
    }

    #[test]
    fn test_check_captures() {
        let schema = RecordSchema::builder("User")
            .field(FieldSpec::int("id", Source::Path))
            .field(FieldSpec::string("isAdmin", Source::Query))
            .build(&registry())
            .unwrap();

        assert!(schema.check_captures("users.get", &["id".to_string()]).is_ok());
        let err = schema.check_captures("users.list", &[]).unwrap_err();
        assert_eq!(
            err,
            SchemaError::UndeclaredCapture {
                schema: "User".to_string(),
                capture: "id".to_string(),
                route: "users.list".to_string()
            }
        );
    }
}
