//! Radix tree router for Agora.
//!
//! Routes map a `(method, path)` pair to a route id and the named captures
//! found in the path. Patterns accept `{name}` or `:name` for a single
//! segment and `*name` for the rest of the path.
//!
//! # Example
//!
//! ```rust
//! use agora_router::{Router, MethodRouter};
//! use http::Method;
//!
//! let mut router = Router::new();
//! router.insert("/users", MethodRouter::new().post("users.create")).unwrap();
//! router.insert("/users/:id", MethodRouter::new().get("users.get")).unwrap();
//! router.insert("/file/*path", MethodRouter::new().get("file")).unwrap();
//!
//! let matched = router.match_route(&Method::GET, "/users/123").unwrap();
//! assert_eq!(matched.route_id, "users.get");
//! assert_eq!(matched.params.get("id"), Some("123"));
//! ```
//!
//! # Tree shape
//!
//! ```text
//!              (root)
//!                │
//!        ┌───────┴───────┐
//!     "users"          "file"
//!        │               │
//!   [POST] ── ":id"    "*path"
//!              │         │
//!            [GET]     [GET]
//! ```

#![forbid(unsafe_code)]

mod method_router;
mod node;
mod params;
pub mod pattern;
mod router;

pub use method_router::MethodRouter;
pub use node::Node;
pub use params::Params;
pub use router::{RouteGroup, Router};

use thiserror::Error;

/// A matched route with its route id and captured parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a> {
    /// The id the route was registered with.
    pub route_id: &'a str,
    /// Captured path parameters.
    pub params: Params,
}

impl<'a> RouteMatch<'a> {
    /// Creates a new route match.
    #[must_use]
    pub fn new(route_id: &'a str, params: Params) -> Self {
        Self { route_id, params }
    }
}

/// Errors raised while registering routes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// A catch-all segment was followed by more segments.
    #[error("catch-all must be the last segment in '{pattern}'")]
    CatchAllNotLast {
        /// The offending pattern.
        pattern: String,
    },

    /// A capture or catch-all had no name.
    #[error("empty capture name in '{pattern}'")]
    EmptyCapture {
        /// The offending pattern.
        pattern: String,
    },

    /// Two patterns name the capture at the same position differently.
    #[error("capture '{new}' in '{pattern}' conflicts with existing capture '{existing}'")]
    ConflictingCapture {
        /// The pattern being inserted.
        pattern: String,
        /// The capture name already in the tree.
        existing: String,
        /// The capture name in the new pattern.
        new: String,
    },

    /// A route id was already bound to a different pattern.
    #[error("route id '{route_id}' is already registered for '{pattern}'")]
    DuplicateRouteId {
        /// The duplicated id.
        route_id: String,
        /// The pattern that already owns it.
        pattern: String,
    },
}
