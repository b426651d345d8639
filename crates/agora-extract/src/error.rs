//! Extraction error types.
//!
//! Individual field lookups never fail. An [`ExtractionError`] only reports
//! a request body that cannot be decoded as a whole.

use http::StatusCode;
use std::fmt;

use crate::Source;

/// Error raised while decoding a request body.
///
/// # Example
///
/// ```rust
/// use agora_extract::{ExtractionError, Source};
/// use http::StatusCode;
///
/// let err = ExtractionError::deserialization_failed(Source::Body, "expected value at line 1");
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// assert_eq!(err.error_code(), "DESERIALIZATION_FAILED");
/// assert_eq!(err.source(), Source::Body);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionError {
    source: Source,
    kind: ExtractionErrorKind,
    message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ExtractionErrorKind {
    DeserializationFailed,
    PayloadTooLarge,
    UnsupportedMediaType,
}

impl ExtractionError {
    /// Creates an error for a body that did not decode.
    #[must_use]
    pub fn deserialization_failed(source: Source, error: impl Into<String>) -> Self {
        let error = error.into();
        Self {
            source,
            kind: ExtractionErrorKind::DeserializationFailed,
            message: format!("failed to decode {source}: {error}"),
        }
    }

    /// Creates an error for a body larger than the configured limit.
    #[must_use]
    pub fn payload_too_large(max_size: usize, actual_size: usize) -> Self {
        Self {
            source: Source::Body,
            kind: ExtractionErrorKind::PayloadTooLarge,
            message: format!("payload too large: max {max_size} bytes, got {actual_size} bytes"),
        }
    }

    /// Creates an error for a content type the extractor cannot decode.
    #[must_use]
    pub fn unsupported_media_type(expected: &str, actual: Option<&str>) -> Self {
        let actual = actual.unwrap_or("none");
        Self {
            source: Source::Header,
            kind: ExtractionErrorKind::UnsupportedMediaType,
            message: format!("unsupported content type: expected '{expected}', got '{actual}'"),
        }
    }

    /// Returns the source whose decoding failed.
    #[must_use]
    pub fn source(&self) -> Source {
        self.source
    }

    /// Returns the human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self.kind {
            ExtractionErrorKind::DeserializationFailed => StatusCode::BAD_REQUEST,
            ExtractionErrorKind::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ExtractionErrorKind::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        }
    }

    /// Returns the error code used in error envelopes.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self.kind {
            ExtractionErrorKind::DeserializationFailed => "DESERIALIZATION_FAILED",
            ExtractionErrorKind::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            ExtractionErrorKind::UnsupportedMediaType => "UNSUPPORTED_MEDIA_TYPE",
        }
    }
}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ExtractionError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialization_failed() {
        let err = ExtractionError::deserialization_failed(Source::Form, "invalid percent escape");
        assert_eq!(err.source(), Source::Form);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("form"));
        assert!(err.to_string().contains("invalid percent escape"));
    }

    #[test]
    fn test_payload_too_large() {
        let err = ExtractionError::payload_too_large(1024, 2048);
        assert_eq!(err.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(err.error_code(), "PAYLOAD_TOO_LARGE");
        assert!(err.message().contains("1024"));
        assert!(err.message().contains("2048"));
    }

    #[test]
    fn test_unsupported_media_type() {
        let err = ExtractionError::unsupported_media_type("multipart/form-data", None);
        assert_eq!(err.status_code(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert!(err.to_string().contains("none"));
    }
}
