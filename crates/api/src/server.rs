//! HTTP server setup and lifecycle.

use std::sync::Arc;

use openslot_domain::{OpenSlotError, Result};
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::context::AppContext;
use crate::routes::build_router;

/// Serve the API until a shutdown signal arrives.
pub async fn serve(ctx: Arc<AppContext>) -> Result<()> {
    let bind_addr = ctx.config.http.bind_addr.clone();
    let app = build_router(ctx);

    let listener = TcpListener::bind(&bind_addr).await.map_err(|err| {
        OpenSlotError::Network(format!("failed to bind {bind_addr}: {err}"))
    })?;
    info!(%bind_addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| OpenSlotError::Internal(format!("server error: {err}")))
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(err) => error!(%err, "failed to listen for shutdown signal"),
    }
}
