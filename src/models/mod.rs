//! Data models for the coin price proxy.
//!
//! This module contains the request parameter types, the upstream reply and the
//! JSON bodies the proxy serves itself.

pub mod endpoint;
pub mod query;
pub mod response;

pub use endpoint::Endpoint;
pub use query::{ChartQuery, PriceQuery, QueryParams};
pub use response::{ErrorBody, HealthResponse, MetricsResponse, UpstreamResponse};
