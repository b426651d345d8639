//! Extraction context providing access to request data.
//!
//! The [`ExtractionContext`] holds one request's method, URI, headers, body
//! and path captures, and answers field lookups by [`Source`].

use agora_router::Params;
use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderName, HeaderValue, Method, Uri};

use crate::form::FormFields;
use crate::header::{header_value, BodyKind};
use crate::json::JsonObject;
use crate::query::QueryPairs;
use crate::{ExtractionError, RawValue, Source, ValueKind};

/// Default maximum body size accepted for decoding (1 MB).
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// A request body after decoding.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedBody {
    /// No body was sent.
    Empty,
    /// A JSON object body.
    Json(JsonObject),
    /// A URL-encoded or multipart form body.
    Form(FormFields),
    /// A body in a content type fields cannot be read from.
    Opaque,
}

impl DecodedBody {
    fn lookup(&self, source: Source, name: &str) -> RawValue {
        match (self, source) {
            (Self::Json(object), Source::Body) => object.member(name),
            (Self::Form(fields), Source::Form) => fields.get(name).into(),
            _ => RawValue::Absent,
        }
    }
}

/// Context providing access to all parts of an HTTP request.
///
/// The query string is decoded when the context is created. The body is
/// decoded by [`decode_body`](Self::decode_body) or
/// [`prepare_body`](Self::prepare_body); if neither ran, form and body
/// lookups decode it on demand and treat an undecodable body as empty.
/// Callers that must reject a malformed body call `decode_body` first.
///
/// # Example
///
/// ```rust
/// use agora_extract::{ExtractionContext, RawValue, Source};
/// use agora_router::Params;
/// use http::{HeaderMap, Method, Uri};
/// use bytes::Bytes;
///
/// let mut params = Params::new();
/// params.push("id", "123");
///
/// let ctx = ExtractionContext::new(
///     Method::GET,
///     Uri::from_static("/api/v1/users/123?isAdmin=true"),
///     HeaderMap::new(),
///     Bytes::new(),
///     params,
/// );
///
/// assert_eq!(ctx.extract(Source::Path, "id", None), RawValue::present("123"));
/// assert_eq!(ctx.extract(Source::Query, "isAdmin", None), RawValue::present("true"));
/// assert_eq!(ctx.extract(Source::Query, "isAddress", None), RawValue::Absent);
/// ```
#[derive(Debug, Clone)]
pub struct ExtractionContext {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    path_params: Params,
    query: QueryPairs,
    decoded: Option<DecodedBody>,
    body_limit: usize,
}

impl ExtractionContext {
    /// Creates a new extraction context.
    #[must_use]
    pub fn new(
        method: Method,
        uri: Uri,
        headers: HeaderMap,
        body: Bytes,
        path_params: Params,
    ) -> Self {
        let query = QueryPairs::parse(uri.query());
        Self {
            method,
            uri,
            headers,
            body,
            path_params,
            query,
            decoded: None,
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }

    /// Returns a builder for a context.
    #[must_use]
    pub fn builder() -> ExtractionContextBuilder {
        ExtractionContextBuilder::new()
    }

    /// Sets the maximum body size accepted for decoding.
    #[must_use]
    pub fn with_body_limit(mut self, limit: usize) -> Self {
        self.body_limit = limit;
        self
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request URI.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Returns the path portion of the URI.
    #[must_use]
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Returns the query string if present.
    #[must_use]
    pub fn query_string(&self) -> Option<&str> {
        self.uri.query()
    }

    /// Returns the decoded query pairs.
    #[must_use]
    pub fn query(&self) -> &QueryPairs {
        &self.query
    }

    /// Returns the request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns a header value as a string.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns the Content-Type header value.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header(CONTENT_TYPE.as_str())
    }

    /// Returns the request body as bytes.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Checks if the request body is empty.
    #[must_use]
    pub fn is_body_empty(&self) -> bool {
        self.body.is_empty()
    }

    /// Returns the extracted path parameters.
    #[must_use]
    pub fn path_params(&self) -> &Params {
        &self.path_params
    }

    /// Returns the decoded body, if it has been decoded.
    #[must_use]
    pub fn decoded_body(&self) -> Option<&DecodedBody> {
        self.decoded.as_ref()
    }

    /// Looks up one field from its declared source.
    ///
    /// `default` is returned when the source has no value for `name`. A
    /// present empty value is kept as is.
    #[must_use]
    pub fn extract(&self, source: Source, name: &str, default: Option<&str>) -> RawValue {
        let raw = match source {
            Source::Path => self.path_params.get(name).into(),
            Source::Query => self.query.get(name).into(),
            Source::Header => header_value(&self.headers, name),
            Source::Form | Source::Body => match &self.decoded {
                Some(decoded) => decoded.lookup(source, name),
                None => self
                    .decode()
                    .map_or(RawValue::Absent, |decoded| decoded.lookup(source, name)),
            },
        };

        match (raw, default) {
            (RawValue::Absent, Some(default)) => RawValue::present(default),
            (raw, _) => raw,
        }
    }

    /// Returns the kind of value `name` holds in `source`.
    ///
    /// Only JSON body members have a kind other than
    /// [`ValueKind::Plain`], and only once the body has been decoded.
    #[must_use]
    pub fn kind(&self, source: Source, name: &str) -> ValueKind {
        match (&self.decoded, source) {
            (Some(DecodedBody::Json(object)), Source::Body) => object.kind(name),
            _ => ValueKind::Plain,
        }
    }

    /// Decodes JSON and URL-encoded bodies.
    ///
    /// Requests without a content type are read as JSON when the body starts
    /// with `{`, and as URL-encoded otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the body exceeds the limit, does not decode, or is
    /// multipart (use [`prepare_body`](Self::prepare_body) for those).
    pub fn decode_body(&mut self) -> Result<(), ExtractionError> {
        if self.decoded.is_none() {
            self.decoded = Some(self.decode()?);
        }
        Ok(())
    }

    /// Decodes the body, including multipart form bodies.
    ///
    /// # Errors
    ///
    /// See [`decode_body`](Self::decode_body).
    pub async fn prepare_body(&mut self) -> Result<(), ExtractionError> {
        if self.decoded.is_some() {
            return Ok(());
        }
        if BodyKind::of(&self.headers) != BodyKind::Multipart || self.body.is_empty() {
            return self.decode_body();
        }

        self.check_limit()?;
        let content_type = self.content_type().unwrap_or_default().to_string();
        let fields = FormFields::from_multipart(&content_type, self.body.clone()).await?;
        self.decoded = Some(DecodedBody::Form(fields));
        Ok(())
    }

    fn check_limit(&self) -> Result<(), ExtractionError> {
        if self.body.len() > self.body_limit {
            return Err(ExtractionError::payload_too_large(
                self.body_limit,
                self.body.len(),
            ));
        }
        Ok(())
    }

    fn decode(&self) -> Result<DecodedBody, ExtractionError> {
        if self.body.is_empty() {
            return Ok(DecodedBody::Empty);
        }
        self.check_limit()?;

        match BodyKind::of(&self.headers) {
            BodyKind::Json => JsonObject::parse(&self.body).map(DecodedBody::Json),
            BodyKind::UrlEncoded => FormFields::from_urlencoded(&self.body).map(DecodedBody::Form),
            BodyKind::Unspecified => {
                let looks_like_json = self
                    .body
                    .iter()
                    .find(|b| !b.is_ascii_whitespace())
                    .is_some_and(|b| *b == b'{');
                if looks_like_json {
                    JsonObject::parse(&self.body).map(DecodedBody::Json)
                } else {
                    FormFields::from_urlencoded(&self.body).map(DecodedBody::Form)
                }
            }
            BodyKind::Multipart => Err(ExtractionError::unsupported_media_type(
                "application/json or application/x-www-form-urlencoded",
                self.content_type(),
            )),
            BodyKind::Other => Ok(DecodedBody::Opaque),
        }
    }
}

/// Builder for constructing an [`ExtractionContext`].
///
/// Method defaults to `GET` and URI to `/`.
#[derive(Debug, Default)]
pub struct ExtractionContextBuilder {
    method: Option<Method>,
    uri: Option<Uri>,
    headers: HeaderMap,
    body: Bytes,
    path_params: Params,
    body_limit: Option<usize>,
}

impl ExtractionContextBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the HTTP method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Sets the URI.
    #[must_use]
    pub fn uri(mut self, uri: Uri) -> Self {
        self.uri = Some(uri);
        self
    }

    /// Sets the headers.
    #[must_use]
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Adds a single header. Invalid names or values are ignored.
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets the path parameters.
    #[must_use]
    pub fn path_params(mut self, params: Params) -> Self {
        self.path_params = params;
        self
    }

    /// Adds a single path parameter.
    #[must_use]
    pub fn path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.push(name, value);
        self
    }

    /// Sets the maximum body size accepted for decoding.
    #[must_use]
    pub fn body_limit(mut self, limit: usize) -> Self {
        self.body_limit = Some(limit);
        self
    }

    /// Builds the extraction context.
    #[must_use]
    pub fn build(self) -> ExtractionContext {
        let ctx = ExtractionContext::new(
            self.method.unwrap_or(Method::GET),
            self.uri.unwrap_or_else(|| Uri::from_static("/")),
            self.headers,
            self.body,
            self.path_params,
        );
        match self.body_limit {
            Some(limit) => ctx.with_body_limit(limit),
            None => ctx,
        }
    }
}
