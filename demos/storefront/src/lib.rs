//! # Storefront
//!
//! A small storefront on the Agora stack: two HTML pages, a static file
//! mount and a JSON API whose inputs are bound and validated by
//! `agora-bind`.
//!
//! The server is assembled by [`build_server`]; `main` only loads
//! configuration, installs logging and runs it.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod app;
pub mod gate;
pub mod pages;
pub mod routes;
pub mod schemas;

pub use app::{build_server, AppState};
