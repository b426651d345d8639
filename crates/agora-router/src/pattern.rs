//! Route pattern parsing.
//!
//! A pattern is a `/`-separated list of segments. Each segment is one of:
//!
//! - a static literal (`users`)
//! - a named capture, written `{id}` or `:id`
//! - a catch-all, written `*path`, which must be the last segment
//!
//! Empty segments are ignored, so `/users/` and `/users` are the same pattern.

use crate::RouteError;

/// One parsed segment of a route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal segment matched byte-for-byte.
    Static(String),
    /// Named capture matching exactly one path segment.
    Capture(String),
    /// Named catch-all matching the rest of the path.
    CatchAll(String),
}

impl Segment {
    /// Returns the capture name for capture and catch-all segments.
    #[must_use]
    pub fn capture_name(&self) -> Option<&str> {
        match self {
            Self::Static(_) => None,
            Self::Capture(name) | Self::CatchAll(name) => Some(name),
        }
    }
}

/// Parses a route pattern into segments.
///
/// # Errors
///
/// Returns [`RouteError::CatchAllNotLast`] when a catch-all is followed by
/// more segments, and [`RouteError::EmptyCapture`] for `{}`, `:` or `*`.
///
/// # Example
///
/// ```rust
/// use agora_router::pattern::{parse, Segment};
///
/// let segments = parse("/users/:id").unwrap();
/// assert_eq!(segments[1], Segment::Capture("id".to_string()));
/// ```
pub fn parse(pattern: &str) -> Result<Vec<Segment>, RouteError> {
    let raw: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
    let mut segments = Vec::with_capacity(raw.len());

    for (index, part) in raw.iter().enumerate() {
        let segment = if let Some(name) = part.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Segment::Capture(non_empty(name, pattern)?)
        } else if let Some(name) = part.strip_prefix(':') {
            Segment::Capture(non_empty(name, pattern)?)
        } else if let Some(name) = part.strip_prefix('*') {
            if index + 1 != raw.len() {
                return Err(RouteError::CatchAllNotLast {
                    pattern: pattern.to_string(),
                });
            }
            Segment::CatchAll(non_empty(name, pattern)?)
        } else {
            Segment::Static((*part).to_string())
        };
        segments.push(segment);
    }

    Ok(segments)
}

/// Returns the capture names a pattern declares, in order.
///
/// # Errors
///
/// Returns a [`RouteError`] if the pattern does not parse.
///
/// # Example
///
/// ```rust
/// use agora_router::pattern::captures;
///
/// let names = captures("/orgs/{org}/files/*path").unwrap();
/// assert_eq!(names, vec!["org".to_string(), "path".to_string()]);
/// ```
pub fn captures(pattern: &str) -> Result<Vec<String>, RouteError> {
    Ok(parse(pattern)?
        .iter()
        .filter_map(Segment::capture_name)
        .map(String::from)
        .collect())
}

/// Joins a group prefix and a route path into one pattern.
#[must_use]
pub fn join(prefix: &str, path: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        if prefix.is_empty() {
            "/".to_string()
        } else {
            prefix.to_string()
        }
    } else {
        format!("{prefix}/{path}")
    }
}

fn non_empty(name: &str, pattern: &str) -> Result<String, RouteError> {
    if name.is_empty() {
        Err(RouteError::EmptyCapture {
            pattern: pattern.to_string(),
        })
    } else {
        Ok(name.to_string())
    }
}
