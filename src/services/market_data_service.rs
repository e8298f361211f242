//! Market data service layer.
//!
//! Serves price and market-chart lookups from a short-lived cache, falling back to
//! the upstream API on a miss. Only successful (200, valid JSON) upstream replies
//! are cached.
//!
//! The cache is consulted and filled without holding any lock across the upstream
//! call, so two concurrent misses on the same key both go upstream and the later
//! write wins.

use crate::cache::TimedCache;
use crate::client::AsyncUpstream;
use crate::config::Config;
use crate::error::{ProxyError, ProxyResult};
use crate::metrics::Metrics;
use crate::models::{ChartQuery, Endpoint, PriceQuery, QueryParams};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Cached upstream payloads, keyed by endpoint and normalized parameters.
pub type ResponseCache = TimedCache<String, Arc<Value>>;

/// Per-endpoint upstream timeouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpstreamTimeouts {
    pub prices: Duration,
    pub market_chart: Duration,
}

impl Default for UpstreamTimeouts {
    fn default() -> Self {
        Self {
            prices: Duration::from_secs(10),
            market_chart: Duration::from_secs(15),
        }
    }
}

impl UpstreamTimeouts {
    pub fn from_config(config: &Config) -> Self {
        Self {
            prices: Duration::from_secs(config.price_timeout_seconds),
            market_chart: Duration::from_secs(config.chart_timeout_seconds),
        }
    }

    fn for_endpoint(&self, endpoint: Endpoint) -> Duration {
        match endpoint {
            Endpoint::Prices => self.prices,
            Endpoint::MarketChart => self.market_chart,
        }
    }
}

/// Market data service trait for the proxied read operations.
#[async_trait]
pub trait MarketDataService: Send + Sync {
    /// Simple prices for a set of coins in one currency.
    async fn prices(&self, query: &PriceQuery) -> ProxyResult<Arc<Value>>;

    /// Historical price, market cap and volume series for one coin.
    async fn market_chart(&self, coin_id: &str, query: &ChartQuery) -> ProxyResult<Arc<Value>>;
}

/// Default implementation of MarketDataService.
pub struct MarketDataServiceImpl {
    upstream: Arc<dyn AsyncUpstream>,
    cache: ResponseCache,
    metrics: Metrics,
    timeouts: UpstreamTimeouts,
}

impl MarketDataServiceImpl {
    /// Create a new market data service.
    pub fn new(
        upstream: Arc<dyn AsyncUpstream>,
        cache: ResponseCache,
        metrics: Metrics,
        timeouts: UpstreamTimeouts,
    ) -> Self {
        Self {
            upstream,
            cache,
            metrics,
            timeouts,
        }
    }

    /// Serve `key` from cache, or fetch `path` upstream and cache the JSON body.
    async fn cached_fetch(
        &self,
        endpoint: Endpoint,
        key: String,
        path: &str,
        params: QueryParams,
    ) -> ProxyResult<Arc<Value>> {
        if let Some(payload) = self.cache.get(&key) {
            debug!(%endpoint, key = %key, "cache hit");
            self.metrics.record_cache_hit();
            return Ok(payload);
        }

        debug!(%endpoint, key = %key, "cache miss");
        self.metrics.record_cache_miss();

        let timeout = self.timeouts.for_endpoint(endpoint);
        let response = self
            .upstream
            .fetch(path, params, timeout)
            .await
            .map_err(|source| {
                warn!(%endpoint, key = %key, error = %source, "upstream unreachable");
                ProxyError::Transport { endpoint, source }
            })?;

        if !response.is_ok() {
            warn!(%endpoint, key = %key, status = response.status, "upstream rejected request");
            return Err(ProxyError::UpstreamStatus {
                endpoint,
                status: response.status,
            });
        }

        let payload: Value = serde_json::from_slice(&response.body).map_err(|source| {
            warn!(%endpoint, key = %key, error = %source, "upstream body is not JSON");
            self.metrics.record_upstream_error();
            ProxyError::MalformedBody { endpoint, source }
        })?;

        let payload = Arc::new(payload);
        self.cache.insert(key, payload.clone());
        Ok(payload)
    }
}

#[async_trait]
impl MarketDataService for MarketDataServiceImpl {
    async fn prices(&self, query: &PriceQuery) -> ProxyResult<Arc<Value>> {
        self.cached_fetch(
            Endpoint::Prices,
            query.cache_key(),
            &query.upstream_path(),
            query.upstream_params(),
        )
        .await
    }

    async fn market_chart(&self, coin_id: &str, query: &ChartQuery) -> ProxyResult<Arc<Value>> {
        self.cached_fetch(
            Endpoint::MarketChart,
            query.cache_key(coin_id),
            &query.upstream_path(coin_id),
            query.upstream_params(),
        )
        .await
    }
}
