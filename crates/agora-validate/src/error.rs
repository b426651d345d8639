//! Schema errors.
//!
//! Every variant is raised while rules and schemas are assembled at
//! startup. None of them can occur while a request is being bound.

use thiserror::Error;

/// A misconfigured rule registry or record schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A rule name was registered twice.
    #[error("validation rule '{name}' is already registered")]
    DuplicateRule {
        /// The rule name.
        name: String,
    },

    /// A rule name is reserved for conversion failures.
    #[error("validation rule name '{name}' is reserved")]
    ReservedRule {
        /// The rule name.
        name: String,
    },

    /// A field declared a rule the registry does not know.
    #[error("field '{field}' uses unknown validation rule '{rule}'")]
    UnknownRule {
        /// The declaring field.
        field: String,
        /// The rule name.
        rule: String,
    },

    /// A rule that needs a parameter was declared without one.
    #[error("rule '{rule}' on field '{field}' requires a parameter")]
    MissingRuleParam {
        /// The declaring field.
        field: String,
        /// The rule name.
        rule: String,
    },

    /// A rule list could not be parsed.
    #[error("invalid rule syntax '{input}': {reason}")]
    InvalidRuleSyntax {
        /// The offending declaration.
        input: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A cross-field rule names a field the schema does not declare.
    #[error("rule '{rule}' on field '{field}' references undeclared field '{reference}'")]
    UnknownFieldReference {
        /// The declaring field.
        field: String,
        /// The rule name.
        rule: String,
        /// The referenced field name.
        reference: String,
    },

    /// A schema declares the same field twice.
    #[error("schema '{schema}' declares field '{field}' more than once")]
    DuplicateField {
        /// The schema name.
        schema: String,
        /// The field name.
        field: String,
    },

    /// A path field names a capture its route does not declare.
    #[error("schema '{schema}' reads path capture '{capture}' which route '{route}' does not declare")]
    UndeclaredCapture {
        /// The schema name.
        schema: String,
        /// The capture name.
        capture: String,
        /// The route the schema was checked against.
        route: String,
    },

    /// A pattern rule did not compile.
    #[error("pattern for rule '{name}' is invalid: {message}")]
    InvalidPattern {
        /// The rule name.
        name: String,
        /// The regex compiler's message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_culprit() {
        let err = SchemaError::DuplicateRule {
            name: "password".to_string(),
        };
        assert_eq!(err.to_string(), "validation rule 'password' is already registered");

        let err = SchemaError::UnknownFieldReference {
            field: "street_number".to_string(),
            rule: "required_with".to_string(),
            reference: "street".to_string(),
        };
        assert!(err.to_string().contains("'street'"));
    }
}
