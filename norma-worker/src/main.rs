//! # Norma Scanner Worker
//!
//! This binary runs the scheduled expiry scan: it walks every organization
//! on a timer, turns approaching compliance deadlines into alerts, and
//! dispatches notifications through the configured channels.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p norma-worker
//! ```

use norma_shared::db::pool::{create_pool, DatabaseConfig};
use norma_worker::config::Config;
use norma_worker::scanner::ExpiryScanner;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "norma_worker=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Norma worker v{} starting...", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env()?;

    let pool = create_pool(DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    let channels = norma_worker::build_channels(&config.notifications)?;
    if channels.is_empty() {
        tracing::warn!("No notification channels configured; scans will only create alerts");
    }

    let scanner = ExpiryScanner::with_config(pool, channels, config.scan.to_scanner_config());
    let shutdown_token = scanner.shutdown_token();

    let scanner_handle = tokio::spawn(async move { scanner.run().await });

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown signal received, stopping scanner...");
    shutdown_token.cancel();

    scanner_handle.await??;
    tracing::info!("Worker stopped");

    Ok(())
}
