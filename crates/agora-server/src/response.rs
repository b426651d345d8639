//! Response builders.
//!
//! Every error produced by the server or a handler uses the same JSON
//! envelope:
//!
//! ```json
//! {"error": {"code": "NOT_FOUND", "message": "No route for GET /nope"}}
//! ```
//!
//! Validation failures extend it with a `violations` array.

use agora_bind::{BindError, Violation};
use bytes::Bytes;
use http::header::{HeaderValue, CONTENT_TYPE, LOCATION};
use http::{Response, StatusCode};
use http_body_util::Full;
use serde::Serialize;

/// The response type produced by handlers.
pub type HttpResponse = Response<Full<Bytes>>;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
const TEXT_HTML: &str = "text/html; charset=utf-8";
const APPLICATION_JSON: &str = "application/json";

#[derive(Serialize)]
struct Envelope<'a> {
    error: ErrorBody<'a>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    code: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    violations: Option<&'a [Violation]>,
}

fn with_body(status: StatusCode, content_type: &'static str, body: impl Into<Bytes>) -> HttpResponse {
    Response::builder()
        .status(status)
        .header(CONTENT_TYPE, content_type)
        .body(Full::new(body.into()))
        .unwrap_or_else(|_| Response::new(Full::new(Bytes::new())))
}

/// A `text/plain` response.
#[must_use]
pub fn text(status: StatusCode, body: impl Into<String>) -> HttpResponse {
    with_body(status, TEXT_PLAIN, body.into())
}

/// A `text/html` response.
#[must_use]
pub fn html(status: StatusCode, body: impl Into<String>) -> HttpResponse {
    with_body(status, TEXT_HTML, body.into())
}

/// An `application/json` response.
///
/// Falls back to a 500 envelope if `value` cannot be serialized.
#[must_use]
pub fn json<T: Serialize + ?Sized>(status: StatusCode, value: &T) -> HttpResponse {
    match serde_json::to_vec(value) {
        Ok(body) => with_body(status, APPLICATION_JSON, body),
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize response body");
            error_json(
                StatusCode::INTERNAL_SERVER_ERROR,
                "SERIALIZATION_ERROR",
                "Failed to serialize response",
            )
        }
    }
}

/// A redirect to `location` with an empty body.
#[must_use]
pub fn redirect(status: StatusCode, location: &str) -> HttpResponse {
    let Ok(value) = HeaderValue::from_str(location) else {
        return error_json(
            StatusCode::INTERNAL_SERVER_ERROR,
            "INVALID_REDIRECT",
            "Redirect target is not a valid header value",
        );
    };
    let mut response = Response::new(Full::new(Bytes::new()));
    *response.status_mut() = status;
    response.headers_mut().insert(LOCATION, value);
    response
}

/// A JSON error envelope.
#[must_use]
pub fn error_json(status: StatusCode, code: &str, message: &str) -> HttpResponse {
    json(
        status,
        &Envelope {
            error: ErrorBody {
                code,
                message,
                violations: None,
            },
        },
    )
}

/// Renders a bind failure.
///
/// Validation failures become a 400 with every violation listed; a body
/// that could not be decoded keeps its own status and code.
#[must_use]
pub fn bind_error(err: &BindError) -> HttpResponse {
    let message = err.to_string();
    json(
        err.status_code(),
        &Envelope {
            error: ErrorBody {
                code: err.error_code(),
                message: &message,
                violations: err.validation().map(|v| v.violations()),
            },
        },
    )
}
