//! # Agora Server
//!
//! HTTP/1.1 server for Agora applications.
//!
//! The server owns a [`Router`](agora_router::Router) and a
//! [`HandlerRegistry`] keyed by route id. For each request it collects the
//! body, resolves the route, builds an
//! [`ExtractionContext`](agora_extract::ExtractionContext) and hands it to
//! the handler. Handlers bind their input with `agora-bind` and render the
//! outcome with the [`response`] builders.
//!
//! ## Features
//!
//! - Body size limit and request timeout
//! - JSON error envelopes for 404, 405, 413 and handler failures
//! - Static files from a catch-all route
//! - Graceful shutdown on SIGINT or SIGTERM

#![doc(html_root_url = "https://docs.rs/agora-server/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod handler;
pub mod response;
mod server;
mod shutdown;
pub mod static_files;

pub use config::{
    ServerConfig, ServerConfigBuilder, DEFAULT_HTTP_ADDR, DEFAULT_MAX_BODY_BYTES,
    DEFAULT_REQUEST_TIMEOUT_MS, DEFAULT_SHUTDOWN_TIMEOUT_SECS,
};
pub use error::ServerError;
pub use handler::{BoxedResponse, ErasedHandler, HandlerRegistry};
pub use response::HttpResponse;
pub use server::Server;
pub use shutdown::{ConnectionToken, ConnectionTracker, ShutdownSignal};
pub use static_files::{StaticFileError, StaticFiles};
