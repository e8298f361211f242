//! HTTP client for the CoinGecko API.
//!
//! This module provides a synchronous HTTP client that can be used from async contexts
//! via `tokio::task::spawn_blocking`. The client sends parameterized GET requests with
//! an identifying User-Agent and hands back whatever status and body upstream produced.
//! Only transport failures are errors.

mod async_wrapper;
pub use async_wrapper::{AsyncUpstream, AsyncUpstreamImpl};

use crate::config::Config;
use crate::error::{UpstreamError, UpstreamResult};
use crate::metrics::{Metrics, UpstreamTimer};
use crate::models::UpstreamResponse;
use std::io::Read;
use std::sync::Arc;
use std::time::Duration;

/// HTTP client for the CoinGecko API.
///
/// This client uses `ureq` for synchronous HTTP requests and can be called
/// from async contexts using `tokio::task::spawn_blocking`. The underlying
/// agent pools connections across requests.
#[derive(Clone)]
pub struct CoinGeckoClient {
    /// Base URL for the CoinGecko API
    base_url: String,

    /// Value of the User-Agent header sent with every request
    user_agent: String,

    /// HTTP client agent
    agent: Arc<ureq::Agent>,

    /// Metrics collector
    metrics: Metrics,
}

impl CoinGeckoClient {
    /// Create a new client from configuration, reporting into `metrics`.
    pub fn new(config: &Config, metrics: Metrics) -> Self {
        Self {
            base_url: config.coingecko_api_url.clone(),
            user_agent: config.user_agent.clone(),
            agent: Arc::new(ureq::AgentBuilder::new().build()),
            metrics,
        }
    }

    /// Build a full URL from a path.
    fn build_url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    /// Execute a GET request against `path` with the given query parameters.
    ///
    /// Returns the upstream status and raw body for any completed exchange,
    /// including 4xx and 5xx replies.
    pub fn fetch(
        &self,
        path: &str,
        query: &[(&str, String)],
        timeout: Duration,
    ) -> UpstreamResult<UpstreamResponse> {
        let timer = UpstreamTimer::new(self.metrics.clone());
        let url = self.build_url(path);

        tracing::debug!(url = %url, timeout_secs = timeout.as_secs(), "GET upstream");

        let mut request = self
            .agent
            .get(&url)
            .timeout(timeout)
            .set("User-Agent", &self.user_agent)
            .set("Accept", "application/json");
        for (name, value) in query {
            request = request.query(name, value);
        }

        let result = match request.call() {
            Ok(response) => Self::read_response(response),
            Err(ureq::Error::Status(_, response)) => Self::read_response(response),
            Err(ureq::Error::Transport(transport)) => Err(Self::map_transport_error(transport)),
        };

        match &result {
            Ok(response) if response.is_ok() => {
                tracing::debug!(url = %url, status = response.status, "upstream responded");
                timer.complete();
            }
            Ok(response) => {
                tracing::warn!(url = %url, status = response.status, "upstream error status");
                timer.complete_with_error();
            }
            Err(e) => {
                tracing::error!(url = %url, error = %e, "upstream request failed");
                timer.complete_with_error();
            }
        }

        result
    }

    /// Drain a response into status and body bytes.
    fn read_response(response: ureq::Response) -> UpstreamResult<UpstreamResponse> {
        let status = response.status();
        let mut body = Vec::new();
        response.into_reader().read_to_end(&mut body)?;
        Ok(UpstreamResponse::new(status, body))
    }

    /// Map ureq transport errors to our error type.
    fn map_transport_error(transport: ureq::Transport) -> UpstreamError {
        match transport.kind() {
            ureq::ErrorKind::Dns | ureq::ErrorKind::ConnectionFailed => {
                UpstreamError::Connection(transport.to_string())
            }
            ureq::ErrorKind::Io if Self::is_timeout(&transport) => UpstreamError::Timeout,
            _ => UpstreamError::Http(transport.to_string()),
        }
    }

    fn is_timeout(transport: &ureq::Transport) -> bool {
        std::error::Error::source(transport)
            .and_then(|source| source.downcast_ref::<std::io::Error>())
            .map(|io| {
                matches!(
                    io.kind(),
                    std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock
                )
            })
            .unwrap_or(false)
    }
}
