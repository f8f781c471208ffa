//! chatd - line-oriented multi-user chat server.
//!
//! Clients connect over TCP, claim a username, and exchange broadcast and
//! private messages as `TYPE:field[:field...]` lines.

mod config;
mod error;
mod handlers;
mod network;
mod state;
mod telemetry;

use crate::config::Config;
use crate::handlers::Router;
use crate::network::Gateway;
use crate::state::SessionRegistry;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    info!(
        server = %config.server.name,
        address = %config.listen.address,
        max_line_len = config.limits.max_line_len,
        "Starting chatd"
    );

    let registry = Arc::new(SessionRegistry::new());
    let router = Arc::new(Router::new(registry, config.limits.clone()));

    let gateway = Gateway::bind(config.listen.address, Arc::clone(&router)).await?;
    info!(address = %gateway.local_addr()?, "Accepting connections");

    // Ctrl-C starts a graceful shutdown
    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Shutdown requested");
                    shutdown.cancel();
                }
                Err(e) => error!(error = %e, "Failed to listen for shutdown signal"),
            }
        });
    }

    gateway.run(shutdown).await?;

    router.log_command_stats();
    let registry = router.registry();
    if !registry.is_empty() {
        warn!(remaining = registry.len(), "Sessions still registered after shutdown");
    }
    info!("Server stopped");
    Ok(())
}
