//! Form body decoding.
//!
//! URL-encoded bodies decode synchronously. Multipart bodies go through
//! `multer` and only their text parts are kept; file parts are skipped.

use std::io;

use bytes::Bytes;

use crate::{ExtractionError, Source};

/// Maximum number of multipart parts read from one body.
const MAX_MULTIPART_FIELDS: usize = 100;

/// Decoded form fields in body order.
///
/// # Example
///
/// ```rust
/// use agora_extract::FormFields;
///
/// let form = FormFields::from_urlencoded(b"name=Ada&city=New+York").unwrap();
/// assert_eq!(form.get("name"), Some("Ada"));
/// assert_eq!(form.get("city"), Some("New York"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    fields: Vec<(String, String)>,
}

impl FormFields {
    /// Decodes an `application/x-www-form-urlencoded` body.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not UTF-8 or not valid URL encoding.
    pub fn from_urlencoded(body: &[u8]) -> Result<Self, ExtractionError> {
        let text = std::str::from_utf8(body).map_err(|e| {
            ExtractionError::deserialization_failed(Source::Form, format!("invalid UTF-8: {e}"))
        })?;
        let fields = serde_urlencoded::from_str::<Vec<(String, String)>>(text)
            .map_err(|e| ExtractionError::deserialization_failed(Source::Form, e.to_string()))?;
        Ok(Self { fields })
    }

    /// Decodes a `multipart/form-data` body, keeping text parts only.
    ///
    /// # Errors
    ///
    /// Returns an error if the boundary is missing, the stream is malformed,
    /// a text part is not UTF-8, or the body has too many parts.
    pub async fn from_multipart(content_type: &str, body: Bytes) -> Result<Self, ExtractionError> {
        let boundary = multer::parse_boundary(content_type).map_err(|_| {
            ExtractionError::unsupported_media_type(
                "multipart/form-data; boundary=...",
                Some(content_type),
            )
        })?;

        let stream = futures_util::stream::once(async move { Ok::<_, io::Error>(body) });
        let mut multipart = multer::Multipart::new(stream, boundary);

        let mut fields = Vec::new();
        let mut seen = 0usize;
        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            seen += 1;
            if seen > MAX_MULTIPART_FIELDS {
                return Err(ExtractionError::deserialization_failed(
                    Source::Form,
                    format!("more than {MAX_MULTIPART_FIELDS} multipart fields"),
                ));
            }
            if field.file_name().is_some() {
                continue;
            }
            let Some(name) = field.name().map(String::from) else {
                continue;
            };
            let value = field.text().await.map_err(multipart_error)?;
            fields.push((name, value));
        }

        Ok(Self { fields })
    }

    /// Returns the first value for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns the number of decoded fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no fields were decoded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

fn multipart_error(err: multer::Error) -> ExtractionError {
    ExtractionError::deserialization_failed(Source::Form, err.to_string())
}
