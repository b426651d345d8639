//! Query string pairs.
//!
//! The query is decoded once per request into ordered `(key, value)` pairs.
//! Lookups return the first occurrence of a key.

/// Decoded query-string pairs in request order.
///
/// # Example
///
/// ```rust
/// use agora_extract::QueryPairs;
///
/// let query = QueryPairs::parse(Some("isAdmin=true&q=rust+lang&isAdmin=false"));
/// assert_eq!(query.get("isAdmin"), Some("true"));
/// assert_eq!(query.get("q"), Some("rust lang"));
/// assert_eq!(query.get("missing"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryPairs {
    pairs: Vec<(String, String)>,
}

impl QueryPairs {
    /// Decodes a raw query string with `application/x-www-form-urlencoded`
    /// rules.
    ///
    /// Decoding is lossy: invalid UTF-8 in escapes is replaced rather than
    /// rejected, so this never fails.
    #[must_use]
    pub fn parse(query: Option<&str>) -> Self {
        let pairs = query
            .map(|q| serde_urlencoded::from_str::<Vec<(String, String)>>(q).unwrap_or_default())
            .unwrap_or_default();
        Self { pairs }
    }

    /// Returns the first value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if no pairs were decoded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterates over `(key, value)` pairs in request order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
