//! Response shapes: what upstream hands back and what the proxy serves.

use crate::metrics::MetricsSummary;
use serde::{Deserialize, Serialize};

/// Raw upstream reply. Any completed HTTP exchange produces one, whatever
/// the status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl UpstreamResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Only a plain 200 counts as a usable reply.
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Body of `GET /api/health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
}

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// Body of `GET /api/metrics`.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsResponse {
    #[serde(flatten)]
    pub metrics: MetricsSummary,

    /// Stored entries, including expired ones nobody has read since
    pub cache_entries: usize,

    /// RFC 3339 start time of the process
    pub started_at: String,

    pub uptime_seconds: i64,
}
