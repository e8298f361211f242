//! Coin Price Proxy - Main entry point
//!
//! Loads configuration from the environment, initializes logging and serves the
//! proxy API until Ctrl-C.

use anyhow::Result;
use coin_price_proxy::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // RUST_LOG wins over LOG_LEVEL
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    info!("Configuration loaded successfully");
    info!(
        "Cache TTL: {} seconds, upstream timeouts: prices {}s, market chart {}s",
        config.cache_ttl_seconds, config.price_timeout_seconds, config.chart_timeout_seconds
    );

    coin_price_proxy::run_server(config).await?;

    info!("Coin Price Proxy shutdown complete");
    Ok(())
}
