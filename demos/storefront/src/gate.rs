//! The `X-Secure-Host` header gate.

use agora_extract::{ExtractionContext, Source};
use agora_server::{response, HttpResponse};
use http::StatusCode;
use thiserror::Error;

/// Header checked by the gate.
pub const SECURE_HOST_HEADER: &str = "X-Secure-Host";

/// Body sent with a 403.
pub const FORBIDDEN_MESSAGE: &str = "You are not authorized...";

/// The request did not carry the expected gate header.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("missing or wrong {SECURE_HOST_HEADER} header")]
pub struct AuthorizationError;

impl AuthorizationError {
    /// Renders the rejection.
    #[must_use]
    pub fn into_response(self) -> HttpResponse {
        response::text(StatusCode::FORBIDDEN, FORBIDDEN_MESSAGE)
    }
}

/// Passes when the gate header equals `token` exactly.
///
/// # Errors
///
/// Returns [`AuthorizationError`] otherwise.
pub fn check(ctx: &ExtractionContext, token: &str) -> Result<(), AuthorizationError> {
    let value = ctx.extract(Source::Header, SECURE_HOST_HEADER, None);
    if value.as_option() == Some(token) {
        Ok(())
    } else {
        Err(AuthorizationError)
    }
}
