//! Async wrapper around the synchronous CoinGeckoClient.
//!
//! This module provides an async interface to the synchronous client by using
//! `tokio::task::spawn_blocking` to run HTTP operations on a dedicated thread pool,
//! preventing blocking of the async runtime.

use crate::client::CoinGeckoClient;
use crate::error::{UpstreamError, UpstreamResult};
use crate::models::{QueryParams, UpstreamResponse};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Async access to the upstream price API.
///
/// This is the seam the market data service depends on; tests substitute
/// an in-memory implementation.
#[async_trait]
pub trait AsyncUpstream: Send + Sync {
    /// GET `path` with `query`, giving up after `timeout`.
    async fn fetch(
        &self,
        path: &str,
        query: QueryParams,
        timeout: Duration,
    ) -> UpstreamResult<UpstreamResponse>;
}

/// Async wrapper around synchronous CoinGeckoClient.
///
/// Uses `tokio::task::spawn_blocking` to run synchronous HTTP
/// operations on a dedicated thread pool. If the caller is dropped while
/// the request is in flight, the request still runs to completion.
#[derive(Clone)]
pub struct AsyncUpstreamImpl {
    client: Arc<CoinGeckoClient>,
}

impl AsyncUpstreamImpl {
    pub fn new(client: CoinGeckoClient) -> Self {
        Self {
            client: Arc::new(client),
        }
    }
}

#[async_trait]
impl AsyncUpstream for AsyncUpstreamImpl {
    async fn fetch(
        &self,
        path: &str,
        query: QueryParams,
        timeout: Duration,
    ) -> UpstreamResult<UpstreamResponse> {
        let client = self.client.clone();
        let path = path.to_string();

        tokio::task::spawn_blocking(move || client.fetch(&path, &query, timeout))
            .await
            .map_err(|e| UpstreamError::TaskJoin(e.to_string()))?
    }
}
