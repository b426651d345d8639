//! Header lookups and body content types.

use http::header::CONTENT_TYPE;
use http::HeaderMap;

use crate::RawValue;

/// Looks up a header by name, case-insensitively.
///
/// Values that are not visible ASCII are treated as absent.
///
/// # Example
///
/// ```rust
/// use agora_extract::{header_value, RawValue};
/// use http::HeaderMap;
///
/// let mut headers = HeaderMap::new();
/// headers.insert("x-secure-host", "3000".parse().unwrap());
///
/// assert_eq!(header_value(&headers, "X-Secure-Host"), RawValue::present("3000"));
/// assert_eq!(header_value(&headers, "x-missing"), RawValue::Absent);
/// ```
#[must_use]
pub fn header_value(headers: &HeaderMap, name: &str) -> RawValue {
    headers.get(name).and_then(|v| v.to_str().ok()).into()
}

/// How a request body is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// `application/json` or a `+json` suffix.
    Json,
    /// `application/x-www-form-urlencoded`.
    UrlEncoded,
    /// `multipart/form-data`.
    Multipart,
    /// No content type was sent.
    Unspecified,
    /// Any other content type.
    Other,
}

impl BodyKind {
    /// Classifies a request by its `Content-Type` header.
    #[must_use]
    pub fn of(headers: &HeaderMap) -> Self {
        let Some(value) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
            return Self::Unspecified;
        };
        let Ok(mime) = value.parse::<mime::Mime>() else {
            return Self::Other;
        };
        let (type_, subtype) = (mime.type_(), mime.subtype());
        if type_ == mime::APPLICATION
            && (subtype == mime::JSON || mime.suffix() == Some(mime::JSON))
        {
            Self::Json
        } else if type_ == mime::APPLICATION && subtype == mime::WWW_FORM_URLENCODED {
            Self::UrlEncoded
        } else if type_ == mime::MULTIPART && subtype == mime::FORM_DATA {
            Self::Multipart
        } else {
            Self::Other
        }
    }
}
