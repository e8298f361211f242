//! Basic metrics instrumentation for tracking proxy behaviour.
//!
//! Provides counters for upstream calls and cache effectiveness.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Metrics collector shared by the upstream client and the market data service.
#[derive(Debug, Clone)]
pub struct Metrics {
    /// Total number of upstream requests made
    upstream_requests_total: Arc<AtomicU64>,

    /// Upstream transport failures plus non-2xx statuses
    upstream_errors_total: Arc<AtomicU64>,

    /// Total duration of all upstream requests in milliseconds
    upstream_duration_total_ms: Arc<AtomicU64>,

    /// Requests served from the cache
    cache_hits_total: Arc<AtomicU64>,

    /// Requests that had to go upstream
    cache_misses_total: Arc<AtomicU64>,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Create a new metrics collector.
    pub fn new() -> Self {
        Self {
            upstream_requests_total: Arc::new(AtomicU64::new(0)),
            upstream_errors_total: Arc::new(AtomicU64::new(0)),
            upstream_duration_total_ms: Arc::new(AtomicU64::new(0)),
            cache_hits_total: Arc::new(AtomicU64::new(0)),
            cache_misses_total: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Record an upstream request with duration.
    pub fn record_upstream_request(&self, duration: Duration) {
        self.upstream_requests_total.fetch_add(1, Ordering::Relaxed);
        self.upstream_duration_total_ms
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    /// Record an upstream error.
    pub fn record_upstream_error(&self) {
        self.upstream_errors_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_miss(&self) {
        self.cache_misses_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Get total upstream requests.
    pub fn upstream_requests_total(&self) -> u64 {
        self.upstream_requests_total.load(Ordering::Relaxed)
    }

    /// Get total upstream errors.
    pub fn upstream_errors_total(&self) -> u64 {
        self.upstream_errors_total.load(Ordering::Relaxed)
    }

    /// Get total upstream duration in milliseconds.
    pub fn upstream_duration_total_ms(&self) -> u64 {
        self.upstream_duration_total_ms.load(Ordering::Relaxed)
    }

    /// Get average upstream request duration in milliseconds.
    pub fn upstream_duration_avg_ms(&self) -> f64 {
        let total = self.upstream_duration_total_ms.load(Ordering::Relaxed);
        let count = self.upstream_requests_total.load(Ordering::Relaxed);
        if count == 0 {
            0.0
        } else {
            total as f64 / count as f64
        }
    }

    pub fn cache_hits_total(&self) -> u64 {
        self.cache_hits_total.load(Ordering::Relaxed)
    }

    pub fn cache_misses_total(&self) -> u64 {
        self.cache_misses_total.load(Ordering::Relaxed)
    }

    /// Fraction of lookups served from cache, 0.0 when nothing was looked up yet.
    pub fn cache_hit_rate(&self) -> f64 {
        let hits = self.cache_hits_total();
        let total = hits + self.cache_misses_total();
        if total == 0 {
            0.0
        } else {
            hits as f64 / total as f64
        }
    }

    /// Get a summary of all metrics.
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            upstream_requests_total: self.upstream_requests_total(),
            upstream_errors_total: self.upstream_errors_total(),
            upstream_duration_total_ms: self.upstream_duration_total_ms(),
            upstream_duration_avg_ms: self.upstream_duration_avg_ms(),
            cache_hits_total: self.cache_hits_total(),
            cache_misses_total: self.cache_misses_total(),
            cache_hit_rate: self.cache_hit_rate(),
        }
    }
}

/// A snapshot of metrics values.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSummary {
    pub upstream_requests_total: u64,
    pub upstream_errors_total: u64,
    pub upstream_duration_total_ms: u64,
    pub upstream_duration_avg_ms: f64,
    pub cache_hits_total: u64,
    pub cache_misses_total: u64,
    pub cache_hit_rate: f64,
}

/// Helper for timing upstream requests.
pub struct UpstreamTimer {
    start: Instant,
    metrics: Metrics,
}

impl UpstreamTimer {
    /// Start timing an upstream request.
    pub fn new(metrics: Metrics) -> Self {
        Self {
            start: Instant::now(),
            metrics,
        }
    }

    /// Complete the timing and record the duration.
    pub fn complete(self) {
        let duration = self.start.elapsed();
        self.metrics.record_upstream_request(duration);
    }

    /// Complete the timing and record as an error.
    pub fn complete_with_error(self) {
        let duration = self.start.elapsed();
        self.metrics.record_upstream_request(duration);
        self.metrics.record_upstream_error();
    }
}
