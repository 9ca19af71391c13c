//! OpenSlot - calendar availability service
//!
//! Main entry point for the HTTP API.

use std::sync::Arc;

use openslot_api::context::AppContext;
use openslot_api::server;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging FIRST so config loading is visible
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load environment variables from .env file
    match dotenvy::dotenv() {
        Ok(path) => info!(path = %path.display(), "loaded environment from .env"),
        Err(_) => info!("no .env file found, using process environment"),
    }

    info!("Starting calendar availability service");

    let config = openslot_infra::config::load()?;
    let ctx = AppContext::initialize(config).await?;

    server::serve(Arc::new(ctx)).await?;
    Ok(())
}
