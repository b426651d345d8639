//! Per-path method table.
//!
//! [`MethodRouter`] maps HTTP methods to route ids for a single path
//! pattern. It is built with a fluent API and merged when the same pattern
//! is registered more than once.

use http::Method;
use smallvec::SmallVec;

/// Maps HTTP methods to route ids for one path pattern.
///
/// # Example
///
/// ```rust
/// use agora_router::MethodRouter;
/// use http::Method;
///
/// let methods = MethodRouter::new()
///     .get("users.list")
///     .post("users.create");
///
/// assert_eq!(methods.route_for(&Method::GET), Some("users.list"));
/// assert_eq!(methods.route_for(&Method::DELETE), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MethodRouter {
    routes: SmallVec<[(Method, String); 2]>,
}

impl MethodRouter {
    /// Creates an empty method router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a route id for `method`. The first registration wins.
    #[must_use]
    pub fn on(mut self, method: Method, route_id: impl Into<String>) -> Self {
        if !self.contains(&method) {
            self.routes.push((method, route_id.into()));
        }
        self
    }

    /// Registers a GET route.
    #[must_use]
    pub fn get(self, route_id: impl Into<String>) -> Self {
        self.on(Method::GET, route_id)
    }

    /// Registers a POST route.
    #[must_use]
    pub fn post(self, route_id: impl Into<String>) -> Self {
        self.on(Method::POST, route_id)
    }

    /// Registers a PUT route.
    #[must_use]
    pub fn put(self, route_id: impl Into<String>) -> Self {
        self.on(Method::PUT, route_id)
    }

    /// Registers a DELETE route.
    #[must_use]
    pub fn delete(self, route_id: impl Into<String>) -> Self {
        self.on(Method::DELETE, route_id)
    }

    /// Returns the route id registered for `method`.
    ///
    /// A HEAD request falls back to the GET route when no explicit HEAD
    /// route exists.
    #[must_use]
    pub fn route_for(&self, method: &Method) -> Option<&str> {
        self.lookup(method).or_else(|| {
            if *method == Method::HEAD {
                self.lookup(&Method::GET)
            } else {
                None
            }
        })
    }

    /// Returns true if `method` has an explicit registration.
    #[must_use]
    pub fn contains(&self, method: &Method) -> bool {
        self.lookup(method).is_some()
    }

    /// Returns the registered methods, in registration order.
    pub fn allowed(&self) -> impl Iterator<Item = &Method> {
        self.routes.iter().map(|(m, _)| m)
    }

    /// Returns a comma-separated `Allow` header value.
    #[must_use]
    pub fn allow_header(&self) -> String {
        self.allowed()
            .map(Method::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Merges `other` into this router without overwriting existing methods.
    pub fn merge(&mut self, other: MethodRouter) {
        for (method, route_id) in other.routes {
            if !self.contains(&method) {
                self.routes.push((method, route_id));
            }
        }
    }

    fn lookup(&self, method: &Method) -> Option<&str> {
        self.routes
            .iter()
            .find(|(m, _)| m == method)
            .map(|(_, id)| id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_for() {
        let methods = MethodRouter::new().get("ping").post("users.create");
        assert_eq!(methods.route_for(&Method::GET), Some("ping"));
        assert_eq!(methods.route_for(&Method::POST), Some("users.create"));
        assert_eq!(methods.route_for(&Method::PUT), None);
    }

    #[test]
    fn test_head_falls_back_to_get() {
        let methods = MethodRouter::new().get("home");
        assert_eq!(methods.route_for(&Method::HEAD), Some("home"));
        assert!(!methods.contains(&Method::HEAD));
    }

    #[test]
    fn test_first_registration_wins() {
        let methods = MethodRouter::new().get("first").get("second");
        assert_eq!(methods.route_for(&Method::GET), Some("first"));
    }

    #[test]
    fn test_merge_keeps_existing() {
        let mut methods = MethodRouter::new().get("users.get");
        methods.merge(MethodRouter::new().get("other").post("users.create"));

        assert_eq!(methods.route_for(&Method::GET), Some("users.get"));
        assert_eq!(methods.route_for(&Method::POST), Some("users.create"));
    }

    #[test]
    fn test_allow_header() {
        let methods = MethodRouter::new().get("a").post("b").delete("c");
        assert_eq!(methods.allow_header(), "GET, POST, DELETE");
    }
}
