//! Application service layer.
//!
//! Services contain the caching and upstream orchestration. They provide a clean
//! boundary between the HTTP handlers and the upstream client.

mod market_data_service;

pub use market_data_service::{
    MarketDataService, MarketDataServiceImpl, ResponseCache, UpstreamTimeouts,
};
