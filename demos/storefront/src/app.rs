//! Application state and server assembly.

use std::sync::Arc;
use std::time::Duration;

use agora_bind::Binder;
use agora_config::{AgoraConfig, ServerSection};
use agora_server::{Server, ServerConfig, StaticFiles};
use anyhow::Context;
use tracing::info;

use crate::pages::Templates;
use crate::routes;
use crate::schemas::{self, Schemas};

/// Shared state handed to every handler.
#[derive(Debug)]
pub struct AppState {
    /// Binder over the storefront rule registry.
    pub binder: Binder,
    /// Checked record schemas.
    pub schemas: Schemas,
    /// Loaded page templates.
    pub templates: Templates,
    /// Files under `/storage/v1/file/`.
    pub static_files: StaticFiles,
    /// Expected `X-Secure-Host` value.
    pub secure_host_token: String,
}

impl AppState {
    /// Builds the registry and schemas and loads templates.
    ///
    /// # Errors
    ///
    /// Fails on a schema error or an unreadable template.
    pub fn from_config(config: &AgoraConfig) -> anyhow::Result<Self> {
        let registry = schemas::registry().context("failed to build rule registry")?;
        let binder = Binder::new(Arc::new(registry));
        let schemas = Schemas::build(&binder).context("invalid record schema")?;
        let templates = Templates::load(&config.site.templates_dir)?;

        Ok(Self {
            binder,
            schemas,
            templates,
            static_files: StaticFiles::new(&config.site.static_dir),
            secure_host_token: config.site.secure_host_token.clone(),
        })
    }
}

/// Converts the `[server]` section.
#[must_use]
pub fn server_config(section: &ServerSection) -> ServerConfig {
    ServerConfig::builder()
        .http_addr(section.http_addr.clone())
        .shutdown_timeout(Duration::from_secs(section.shutdown_timeout_secs))
        .request_timeout(Duration::from_millis(section.request_timeout_ms))
        .max_body_bytes(section.max_body_bytes)
        .build()
}

/// Assembles the storefront server.
///
/// Route captures are checked against the schemas before the server is
/// built.
///
/// # Errors
///
/// Fails if any schema, route or template is invalid, or a route has no
/// handler.
pub fn build_server(config: &AgoraConfig) -> anyhow::Result<Server> {
    let state = Arc::new(AppState::from_config(config)?);
    let router = routes::router().context("invalid route table")?;
    state
        .schemas
        .check_routes(&router)
        .context("schema does not match its route")?;

    let handlers = routes::handlers(&state);
    let server = Server::new(server_config(&config.server), router, handlers)?;
    info!(
        routes = server.router().len(),
        static_dir = %config.site.static_dir.display(),
        "storefront assembled"
    );
    Ok(server)
}
