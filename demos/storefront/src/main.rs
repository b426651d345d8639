//! Storefront binary.

use agora_config::{ConfigLoader, DEFAULT_ENV_PREFIX};
use agora_telemetry::init_logging;
use anyhow::Context;

const CONFIG_FILE: &str = "storefront.toml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ConfigLoader::new()
        .with_optional_file(CONFIG_FILE)?
        .with_dotenv()?
        .with_env_prefix(DEFAULT_ENV_PREFIX)
        .load()
        .context("failed to load configuration")?;

    init_logging(&config.logging.log_config())?;
    tracing::info!(addr = %config.server.http_addr, "starting storefront");

    let server = storefront::build_server(&config)?;
    server.run().await?;

    tracing::info!("storefront stopped");
    Ok(())
}
