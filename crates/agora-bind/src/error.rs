//! Bind errors.

use std::fmt;

use agora_extract::ExtractionError;
use http::StatusCode;
use serde::Serialize;
use thiserror::Error;

/// One failed rule on one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// The field that failed.
    pub field: String,
    /// The rule that failed, or `type` for a failed conversion.
    pub rule: String,
    /// A human-readable message.
    pub message: String,
}

/// Every violation found while binding one request, in field declaration
/// order and then rule order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    violations: Vec<Violation>,
}

impl ValidationError {
    /// Error code used in error envelopes.
    pub const CODE: &'static str = "VALIDATION_FAILED";

    pub(crate) fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    /// Returns the violations.
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Returns the number of violations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Always false; a `ValidationError` carries at least one violation.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Returns true if `field` failed `rule`.
    #[must_use]
    pub fn has(&self, field: &str, rule: &str) -> bool {
        self.violations
            .iter()
            .any(|v| v.field == field && v.rule == rule)
    }

    /// Returns true if any rule failed on `field`.
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field == field)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut messages = self.violations.iter().map(|v| v.message.as_str());
        if let Some(first) = messages.next() {
            f.write_str(first)?;
        }
        for message in messages {
            write!(f, "\n{message}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Why a request could not be bound.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// The body could not be decoded.
    #[error(transparent)]
    Malformed(#[from] ExtractionError),

    /// One or more fields failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl BindError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Malformed(err) => err.status_code(),
            Self::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Returns the error code used in error envelopes.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Malformed(err) => err.error_code(),
            Self::Validation(_) => ValidationError::CODE,
        }
    }

    /// Returns the validation failures, if that is what this is.
    #[must_use]
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Malformed(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_extract::Source;

    fn violation(field: &str, rule: &str) -> Violation {
        Violation {
            field: field.to_string(),
            rule: rule.to_string(),
            message: agora_validate::failure_message(field, rule),
        }
    }

    #[test]
    fn test_display_joins_messages() {
        let err = ValidationError::new(vec![violation("email", "required"), violation("role", "oneof")]);
        assert_eq!(
            err.to_string(),
            "field validation for 'email' failed on the 'required' rule\n\
             field validation for 'role' failed on the 'oneof' rule"
        );
        assert!(err.has("role", "oneof"));
        assert!(!err.has("role", "required"));
    }

    #[test]
    fn test_status_codes() {
        let err = BindError::from(ValidationError::new(vec![violation("email", "email")]));
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "VALIDATION_FAILED");

        let err = BindError::from(ExtractionError::payload_too_large(10, 20));
        assert_eq!(err.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(err.validation().is_none());

        let err = BindError::from(ExtractionError::deserialization_failed(Source::Body, "eof"));
        assert_eq!(err.error_code(), "DESERIALIZATION_FAILED");
    }

    #[test]
    fn test_serializes_violations() {
        let err = ValidationError::new(vec![violation("street_number", "type")]);
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["violations"][0]["field"], "street_number");
        assert_eq!(json["violations"][0]["rule"], "type");
    }
}
