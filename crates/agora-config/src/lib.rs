//! Typed configuration for Agora applications.
//!
//! [`AgoraConfig`] has three sections:
//!
//! - [`ServerSection`] - bind address, timeouts, body limit
//! - [`LoggingSection`] - filter level and output format
//! - [`SiteSection`] - asset directories and the header gate token
//!
//! [`ConfigLoader`] layers defaults, a TOML or JSON file, a `.env` file and
//! environment overrides, then validates the result. Unknown keys are
//! rejected at every layer.
//!
//! # Configuration File Format
//!
//! ```toml
//! [server]
//! http_addr = "0.0.0.0:3000"
//! shutdown_timeout_secs = 30
//! request_timeout_ms = 30000
//! max_body_bytes = 1048576
//!
//! [logging]
//! level = "info"
//! format = "json"
//!
//! [site]
//! static_dir = "static"
//! templates_dir = "templates"
//! secure_host_token = "3000"
//! ```
//!
//! # Environment Variable Overrides
//!
//! - `AGORA__SERVER__HTTP_ADDR=0.0.0.0:9000`
//! - `AGORA__LOGGING__FORMAT=pretty`
//! - `AGORA__SITE__SECURE_HOST_TOKEN=4000`

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::AgoraConfig;
pub use error::ConfigError;
pub use loader::{ConfigLoader, DEFAULT_ENV_PREFIX};
pub use schema::{LogFormat, LoggingSection, ServerSection, SiteSection};
