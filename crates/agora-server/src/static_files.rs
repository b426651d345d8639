//! Static file serving.
//!
//! [`StaticFiles`] maps the remainder of a catch-all route onto a directory.
//! Paths that climb out of the root, name hidden entries, or resolve to a
//! directory are refused.
//!
//! # Example
//!
//! ```rust,no_run
//! use agora_server::{HandlerRegistry, StaticFiles};
//!
//! let files = StaticFiles::new("./storage").cache_control("public, max-age=3600");
//!
//! let mut handlers = HandlerRegistry::new();
//! handlers.register("storage.file", move |ctx| {
//!     let files = files.clone();
//!     async move { files.serve(&ctx).await }
//! });
//! ```

use std::path::{Component, Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use agora_extract::ExtractionContext;
use bytes::Bytes;
use http::{header, HeaderMap, Method, Response, StatusCode};
use http_body_util::Full;
use thiserror::Error;

use crate::response::{self, HttpResponse};

/// Name of the catch-all capture [`StaticFiles::serve`] reads.
pub const PATH_PARAM: &str = "path";

/// Errors that can occur when serving a static file.
#[derive(Debug, Error)]
pub enum StaticFileError {
    /// The file does not exist or is a directory.
    #[error("file not found: {0}")]
    NotFound(String),

    /// The path is not allowed.
    #[error("forbidden: {0}")]
    Forbidden(&'static str),

    /// Only GET and HEAD are served.
    #[error("method not allowed")]
    MethodNotAllowed,

    /// Reading the file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StaticFileError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns the error code used in error envelopes.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            Self::Io(_) => "INTERNAL_ERROR",
        }
    }

    /// Renders this error as a JSON envelope.
    #[must_use]
    pub fn into_response(self) -> HttpResponse {
        if let Self::Io(e) = &self {
            tracing::error!(error = %e, "failed to read static file");
            return response::error_json(self.status_code(), self.error_code(), "Failed to read file");
        }
        let mut response = response::error_json(self.status_code(), self.error_code(), &self.to_string());
        if matches!(self, Self::MethodNotAllowed) {
            response
                .headers_mut()
                .insert(header::ALLOW, header::HeaderValue::from_static("GET, HEAD"));
        }
        response
    }
}

/// Serves files from a directory.
#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: PathBuf,
    cache_control: Option<String>,
    serve_hidden: bool,
}

impl StaticFiles {
    /// Serves files under `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            cache_control: None,
            serve_hidden: false,
        }
    }

    /// Sets the `Cache-Control` header sent with every file.
    #[must_use]
    pub fn cache_control(mut self, value: impl Into<String>) -> Self {
        self.cache_control = Some(value.into());
        self
    }

    /// Allows paths with components starting with `.`.
    #[must_use]
    pub fn serve_hidden(mut self, enabled: bool) -> Self {
        self.serve_hidden = enabled;
        self
    }

    /// Returns the root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Serves the file named by the request's `path` capture, rendering
    /// any failure as an error envelope.
    pub async fn serve(&self, ctx: &ExtractionContext) -> HttpResponse {
        let relative = ctx.path_params().get(PATH_PARAM).unwrap_or_default();
        match self.handle(relative, ctx.headers(), ctx.method()).await {
            Ok(response) => response,
            Err(e) => e.into_response(),
        }
    }

    /// Serves `relative`, a path below the root.
    ///
    /// # Errors
    ///
    /// Returns a [`StaticFileError`] for non-GET/HEAD methods, refused
    /// paths, missing files and read failures.
    pub async fn handle(
        &self,
        relative: &str,
        headers: &HeaderMap,
        method: &Method,
    ) -> Result<HttpResponse, StaticFileError> {
        if method != Method::GET && method != Method::HEAD {
            return Err(StaticFileError::MethodNotAllowed);
        }

        let path = self.resolve(relative).await?;
        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|_| StaticFileError::NotFound(relative.to_string()))?;
        if !metadata.is_file() {
            return Err(StaticFileError::NotFound(relative.to_string()));
        }

        let modified = metadata.modified().ok();
        let etag = modified.and_then(|m| etag_for(metadata.len(), m));

        if is_fresh(headers, etag.as_deref(), modified) {
            return Ok(self.not_modified(etag.as_deref()));
        }

        let body = if method == Method::HEAD {
            Bytes::new()
        } else {
            Bytes::from(tokio::fs::read(&path).await?)
        };

        let mut builder = Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, mime_for(&path))
            .header(header::CONTENT_LENGTH, metadata.len());
        if let Some(cache_control) = &self.cache_control {
            builder = builder.header(header::CACHE_CONTROL, cache_control.as_str());
        }
        if let Some(etag) = &etag {
            builder = builder.header(header::ETAG, etag.as_str());
        }
        if let Some(modified) = modified {
            builder = builder.header(header::LAST_MODIFIED, httpdate::fmt_http_date(modified));
        }

        builder
            .body(Full::new(body))
            .map_err(|e| StaticFileError::Io(std::io::Error::other(e.to_string())))
    }

    async fn resolve(&self, relative: &str) -> Result<PathBuf, StaticFileError> {
        let relative = relative.trim_start_matches('/');
        if relative.is_empty() {
            return Err(StaticFileError::NotFound(String::new()));
        }

        for component in Path::new(relative).components() {
            match component {
                Component::Normal(name) => {
                    if !self.serve_hidden && name.to_str().is_some_and(|n| n.starts_with('.')) {
                        return Err(StaticFileError::Forbidden("hidden files are not served"));
                    }
                }
                Component::CurDir => {}
                _ => return Err(StaticFileError::Forbidden("path escapes the root directory")),
            }
        }

        let candidate = tokio::fs::canonicalize(self.root.join(relative))
            .await
            .map_err(|_| StaticFileError::NotFound(relative.to_string()))?;
        let root = tokio::fs::canonicalize(&self.root).await?;

        // Symlinks may still point outside the root.
        if !candidate.starts_with(&root) {
            return Err(StaticFileError::Forbidden("path escapes the root directory"));
        }
        Ok(candidate)
    }

    fn not_modified(&self, etag: Option<&str>) -> HttpResponse {
        let mut builder = Response::builder().status(StatusCode::NOT_MODIFIED);
        if let Some(etag) = etag {
            builder = builder.header(header::ETAG, etag);
        }
        if let Some(cache_control) = &self.cache_control {
            builder = builder.header(header::CACHE_CONTROL, cache_control.as_str());
        }
        builder
            .body(Full::new(Bytes::new()))
            .unwrap_or_else(|_| Response::new(Full::new(Bytes::new())))
    }
}

fn etag_for(len: u64, modified: SystemTime) -> Option<String> {
    let secs = modified.duration_since(UNIX_EPOCH).ok()?.as_secs();
    Some(format!("\"{secs:x}-{len:x}\""))
}

fn is_fresh(headers: &HeaderMap, etag: Option<&str>, modified: Option<SystemTime>) -> bool {
    // If-None-Match takes precedence over If-Modified-Since.
    if let Some(value) = headers.get(header::IF_NONE_MATCH).and_then(|v| v.to_str().ok()) {
        return etag.is_some_and(|etag| value == "*" || value.split(',').any(|t| t.trim() == etag));
    }

    let since = headers
        .get(header::IF_MODIFIED_SINCE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| httpdate::parse_http_date(v).ok());
    match (since, modified) {
        (Some(since), Some(modified)) => {
            let secs = |t: SystemTime| t.duration_since(UNIX_EPOCH).map(|d| d.as_secs()).ok();
            matches!((secs(modified), secs(since)), (Some(m), Some(s)) if m <= s)
        }
        _ => false,
    }
}

fn mime_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" | "mjs" => "text/javascript; charset=utf-8",
        "json" => "application/json",
        "txt" => "text/plain; charset=utf-8",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "woff2" => "font/woff2",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}
