//! Coin Price Proxy - a caching HTTP proxy in front of the CoinGecko API.
//!
//! The proxy serves simple prices and market charts. Successful upstream replies are
//! kept in a process-local cache for a fixed TTL so repeated lookups don't hit
//! CoinGecko again.
//!
//! # Architecture
//!
//! - **cache**: TTL cache with lazy eviction on read
//! - **client**: Blocking CoinGecko client and its async wrapper
//! - **config**: Configuration management from environment variables
//! - **error**: Custom error types for precise error handling
//! - **metrics**: Upstream and cache counters
//! - **models**: Query parameters, cache keys and response bodies
//! - **services**: Cache-then-upstream lookup logic
//! - **server**: axum routes, CORS and the listener

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod server;
pub mod services;

pub use cache::TimedCache;
pub use client::{AsyncUpstream, AsyncUpstreamImpl, CoinGeckoClient};
pub use config::{Config, CorsOrigins};
pub use error::{ConfigError, ProxyError, RequestError, UpstreamError};
pub use metrics::{Metrics, MetricsSummary};
pub use models::{ChartQuery, Endpoint, PriceQuery, UpstreamResponse};
pub use server::{build_router, run_server, AppState};
pub use services::{MarketDataService, MarketDataServiceImpl, ResponseCache, UpstreamTimeouts};
