//! HTTP server for the coin price proxy.
//!
//! This module wires the axum router, applies the CORS policy and runs the
//! listener until Ctrl-C.

pub mod extract;
pub mod handlers;
pub mod state;

pub use state::AppState;

use crate::config::{Config, CorsOrigins};
use anyhow::{Context, Result};
use axum::http::HeaderValue;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::info;

/// Build the router with every API route, a JSON 404 fallback and the CORS layer.
pub fn build_router(state: AppState, cors_origins: &CorsOrigins) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/prices", get(handlers::prices))
        .route("/api/market_chart/:coin_id", get(handlers::market_chart))
        .route("/api/metrics", get(handlers::metrics))
        .fallback(handlers::not_found)
        .layer(cors_layer(cors_origins))
        .with_state(state)
}

/// Translate the configured origin policy into a CORS layer.
///
/// `Any` mirrors the request's origin and allows credentials, methods and
/// headers. It is meant for development; production should list origins.
pub fn cors_layer(cors_origins: &CorsOrigins) -> CorsLayer {
    match cors_origins {
        CorsOrigins::Any => CorsLayer::very_permissive(),
        CorsOrigins::List(origins) => {
            // Origins were validated when the config was loaded
            let origins: Vec<HeaderValue> = origins
                .iter()
                .filter_map(|origin| HeaderValue::from_str(origin).ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        }
    }
}

/// Run the proxy until Ctrl-C.
///
/// # Arguments
/// * `config` - Loaded configuration
///
/// # Returns
/// An error if the listener cannot be bound or the server fails
pub async fn run_server(config: Config) -> Result<()> {
    let state = AppState::from_config(&config);
    let app = build_router(state, &config.cors_origins);

    if config.cors_origins == CorsOrigins::Any {
        tracing::warn!("CORS allows every origin; set CORS_ALLOWED_ORIGINS outside development");
    }

    let listener = TcpListener::bind(config.bind_address)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_address))?;

    info!("Listening on http://{}", config.bind_address);
    info!("Proxying {}", config.coingecko_api_url);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal, stopping server...");
}
