//! Handler registration and dispatch.
//!
//! Handlers are registered against the route id the router resolves to.
//! Each handler receives the request's [`ExtractionContext`], already
//! carrying its path captures, and returns an [`HttpResponse`].
//!
//! # Example
//!
//! ```rust
//! use agora_server::{response, HandlerRegistry};
//! use http::StatusCode;
//!
//! let mut handlers = HandlerRegistry::new();
//! handlers.register("ping", |_ctx| async { response::text(StatusCode::OK, "pong") });
//!
//! assert!(handlers.contains("ping"));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use agora_extract::ExtractionContext;

use crate::response::HttpResponse;

/// Type alias for a boxed handler future.
pub type BoxedResponse = Pin<Box<dyn Future<Output = HttpResponse> + Send>>;

/// A type-erased handler function.
pub type ErasedHandler = Arc<dyn Fn(ExtractionContext) -> BoxedResponse + Send + Sync>;

/// Route id to handler table.
#[derive(Default, Clone)]
pub struct HandlerRegistry {
    handlers: HashMap<String, ErasedHandler>,
}

impl HandlerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler for a route id, replacing any previous one.
    pub fn register<F, Fut>(&mut self, route_id: impl Into<String>, handler: F) -> &mut Self
    where
        F: Fn(ExtractionContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HttpResponse> + Send + 'static,
    {
        let erased: ErasedHandler = Arc::new(move |ctx| Box::pin(handler(ctx)));
        self.handlers.insert(route_id.into(), erased);
        self
    }

    /// Returns the handler for a route id.
    #[must_use]
    pub fn get(&self, route_id: &str) -> Option<&ErasedHandler> {
        self.handlers.get(route_id)
    }

    /// Returns true if a handler is registered for the route id.
    #[must_use]
    pub fn contains(&self, route_id: &str) -> bool {
        self.handlers.contains_key(route_id)
    }

    /// Returns the number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns true if no handlers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        ids.sort_unstable();
        f.debug_struct("HandlerRegistry").field("routes", &ids).finish()
    }
}
