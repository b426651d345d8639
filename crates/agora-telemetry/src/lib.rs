//! # Agora Telemetry
//!
//! Logging setup shared by Agora binaries. Everything else in the
//! workspace only emits `tracing` events; this crate decides where they go.

#![doc(html_root_url = "https://docs.rs/agora-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{init_logging, LogConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
