//! High-level router API.
//!
//! [`Router`] owns the radix tree and remembers every registered pattern so
//! callers can ask which captures a route declares.

use std::collections::HashMap;

use http::Method;

use crate::method_router::MethodRouter;
use crate::node::Node;
use crate::params::Params;
use crate::pattern;
use crate::{RouteError, RouteMatch};

/// A radix tree router mapping `(method, path)` to route ids.
///
/// # Example
///
/// ```rust
/// use agora_router::Router;
/// use http::Method;
///
/// let mut router = Router::new();
/// router.route(Method::GET, "/users/:id", "users.get").unwrap();
///
/// let matched = router.match_route(&Method::GET, "/users/42").unwrap();
/// assert_eq!(matched.route_id, "users.get");
/// assert_eq!(matched.params.get("id"), Some("42"));
/// ```
///
/// # Route Priority
///
/// Static segments win over captures, and captures win over catch-alls, so
/// `/users/me` beats `/users/{id}` for the path `/users/me`.
#[derive(Debug, Clone)]
pub struct Router {
    root: Node,
    patterns: HashMap<String, String>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    /// Creates an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Node::root(),
            patterns: HashMap::new(),
        }
    }

    /// Inserts a pattern with its method table.
    ///
    /// # Errors
    ///
    /// Returns a [`RouteError`] for malformed patterns, conflicting capture
    /// names, or a route id that is already bound to another pattern.
    pub fn insert(&mut self, path: &str, methods: MethodRouter) -> Result<(), RouteError> {
        let ids: Vec<String> = methods
            .allowed()
            .filter_map(|m| methods.route_for(m))
            .map(String::from)
            .collect();

        for id in &ids {
            if let Some(existing) = self.patterns.get(id) {
                if existing != path {
                    return Err(RouteError::DuplicateRouteId {
                        route_id: id.clone(),
                        pattern: existing.clone(),
                    });
                }
            }
        }

        self.root.insert(path, methods)?;
        for id in ids {
            self.patterns.insert(id, path.to_string());
        }
        Ok(())
    }

    /// Registers a single-method route.
    ///
    /// Registering the same id again on the same pattern is allowed; binding
    /// it to a different pattern is not.
    ///
    /// # Errors
    ///
    /// See [`Router::insert`].
    ///
    /// # Example
    ///
    /// ```rust
    /// use agora_router::Router;
    /// use http::Method;
    ///
    /// let mut router = Router::new();
    /// router.route(Method::GET, "/users/:id", "users.get").unwrap();
    /// router.route(Method::POST, "/users", "users.create").unwrap();
    ///
    /// let found = router.match_route(&Method::GET, "/users/42").unwrap();
    /// assert_eq!(found.route_id, "users.get");
    /// assert_eq!(found.params.get("id"), Some("42"));
    ///
    /// assert!(router.route(Method::PUT, "/accounts/:id", "users.get").is_err());
    /// ```
    pub fn route(
        &mut self,
        method: Method,
        path: &str,
        route_id: impl Into<String>,
    ) -> Result<(), RouteError> {
        self.insert(path, MethodRouter::new().on(method, route_id))
    }

    /// Opens a route group whose paths are prefixed with `prefix`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use agora_router::Router;
    /// use http::Method;
    ///
    /// let mut router = Router::new();
    /// router.group("/api/v1").route(Method::GET, "/ping", "ping").unwrap();
    ///
    /// assert!(router.match_route(&Method::GET, "/api/v1/ping").is_some());
    /// ```
    pub fn group(&mut self, prefix: impl Into<String>) -> RouteGroup<'_> {
        RouteGroup {
            router: self,
            prefix: prefix.into(),
        }
    }

    /// Matches a method and path.
    #[must_use]
    pub fn match_route(&self, method: &Method, path: &str) -> Option<RouteMatch<'_>> {
        let (methods, params) = self.root.match_path(path)?;
        let route_id = methods.route_for(method)?;
        Some(RouteMatch::new(route_id, params))
    }

    /// Matches a path regardless of method.
    ///
    /// Used to tell "no such path" (404) from "wrong method" (405).
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<(&MethodRouter, Params)> {
        self.root.match_path(path)
    }

    /// Returns the pattern a route id was registered under.
    #[must_use]
    pub fn pattern_of(&self, route_id: &str) -> Option<&str> {
        self.patterns.get(route_id).map(String::as_str)
    }

    /// Returns the capture names declared by the route registered as
    /// `route_id`, or `None` if no such route exists.
    #[must_use]
    pub fn captures_of(&self, route_id: &str) -> Option<Vec<String>> {
        let pattern = self.pattern_of(route_id)?;
        pattern::captures(pattern).ok()
    }

    /// Iterates over registered route ids, in no particular order.
    pub fn route_ids(&self) -> impl Iterator<Item = &str> {
        self.patterns.keys().map(String::as_str)
    }

    /// Returns the number of registered route ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Returns true if no routes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// A prefix-scoped view of a [`Router`].
#[derive(Debug)]
pub struct RouteGroup<'r> {
    router: &'r mut Router,
    prefix: String,
}

impl RouteGroup<'_> {
    /// Registers a single-method route under the group prefix.
    ///
    /// # Errors
    ///
    /// See [`Router::insert`].
    pub fn route(
        &mut self,
        method: Method,
        path: &str,
        route_id: impl Into<String>,
    ) -> Result<&mut Self, RouteError> {
        let full = pattern::join(&self.prefix, path);
        self.router.route(method, &full, route_id)?;
        Ok(self)
    }

    /// Returns the group prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storefront() -> Router {
        let mut router = Router::new();
        router.route(Method::GET, "/", "root").unwrap();
        router.route(Method::GET, "/home", "home").unwrap();
        {
            let mut api = router.group("/api/v1");
            api.route(Method::GET, "/ping", "ping").unwrap();
            api.route(Method::GET, "/users/:id", "users.get").unwrap();
            api.route(Method::POST, "/users", "users.create").unwrap();
        }
        router
            .group("/storage/v1")
            .route(Method::GET, "/file/*path", "storage.file")
            .unwrap();
        router
    }

    #[test]
    fn test_root_path() {
        let router = storefront();
        let matched = router.match_route(&Method::GET, "/").unwrap();
        assert_eq!(matched.route_id, "root");
    }

    #[test]
    fn test_group_routes() {
        let router = storefront();
        assert_eq!(
            router.match_route(&Method::GET, "/api/v1/ping").unwrap().route_id,
            "ping"
        );
        let matched = router.match_route(&Method::GET, "/api/v1/users/5").unwrap();
        assert_eq!(matched.route_id, "users.get");
        assert_eq!(matched.params.get("id"), Some("5"));
    }

    #[test]
    fn test_method_mismatch_still_matches_path() {
        let router = storefront();
        assert!(router.match_route(&Method::DELETE, "/api/v1/users").is_none());
        let (methods, _) = router.match_path("/api/v1/users").unwrap();
        assert_eq!(methods.allow_header(), "POST");
    }

    #[test]
    fn test_catch_all_route() {
        let router = storefront();
        let matched = router
            .match_route(&Method::GET, "/storage/v1/file/img/logo.png")
            .unwrap();
        assert_eq!(matched.params.get("path"), Some("img/logo.png"));
    }

    #[test]
    fn test_captures_of() {
        let router = storefront();
        assert_eq!(router.captures_of("users.get"), Some(vec!["id".to_string()]));
        assert_eq!(router.captures_of("ping"), Some(Vec::new()));
        assert_eq!(router.captures_of("missing"), None);
        assert_eq!(router.pattern_of("users.get"), Some("/api/v1/users/:id"));
    }

    #[test]
    fn test_duplicate_route_id_rejected() {
        let mut router = storefront();
        let err = router.route(Method::GET, "/elsewhere", "ping").unwrap_err();
        assert!(matches!(err, RouteError::DuplicateRouteId { .. }));
    }

    #[test]
    fn test_trailing_slash_is_normalized() {
        let router = storefront();
        assert!(router.match_route(&Method::GET, "/home/").is_some());
    }

    #[test]
    fn test_len() {
        let router = storefront();
        assert_eq!(router.len(), 6);
        assert!(!router.is_empty());
        assert!(Router::new().is_empty());
    }
}
