//! Shared application state for the HTTP server.

use crate::client::{AsyncUpstream, AsyncUpstreamImpl, CoinGeckoClient};
use crate::config::Config;
use crate::metrics::Metrics;
use crate::services::{MarketDataService, MarketDataServiceImpl, ResponseCache, UpstreamTimeouts};
use std::sync::Arc;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    /// Cached upstream lookups
    pub service: Arc<dyn MarketDataService>,

    /// The response cache behind `service`, for reporting its size
    pub cache: ResponseCache,

    pub metrics: Metrics,

    /// Server startup time
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    /// Assemble state from already-built parts.
    pub fn new(service: Arc<dyn MarketDataService>, cache: ResponseCache, metrics: Metrics) -> Self {
        Self {
            service,
            cache,
            metrics,
            started_at: chrono::Utc::now(),
        }
    }

    /// Wire a state around `upstream` using the cache and timeout settings of `config`.
    pub fn with_upstream(config: &Config, upstream: Arc<dyn AsyncUpstream>, metrics: Metrics) -> Self {
        let cache = ResponseCache::new(config.cache_ttl_seconds);
        let service = Arc::new(MarketDataServiceImpl::new(
            upstream,
            cache.clone(),
            metrics.clone(),
            UpstreamTimeouts::from_config(config),
        )) as Arc<dyn MarketDataService>;

        Self::new(service, cache, metrics)
    }

    /// Production wiring: CoinGecko client behind the async wrapper.
    pub fn from_config(config: &Config) -> Self {
        let metrics = Metrics::new();
        let client = CoinGeckoClient::new(config, metrics.clone());
        let upstream = Arc::new(AsyncUpstreamImpl::new(client)) as Arc<dyn AsyncUpstream>;

        Self::with_upstream(config, upstream, metrics)
    }
}
