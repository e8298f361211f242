//! The proxied upstream endpoints.

use std::fmt;

/// One of the two upstream endpoint shapes this proxy serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `/simple/price`
    Prices,
    /// `/coins/{id}/market_chart`
    MarketChart,
}

impl Endpoint {
    /// Prefix used for cache keys of this endpoint.
    pub fn key_prefix(&self) -> &'static str {
        match self {
            Endpoint::Prices => "prices",
            Endpoint::MarketChart => "chart",
        }
    }

    /// Fixed message returned to clients when the upstream call fails.
    pub fn error_detail(&self) -> &'static str {
        match self {
            Endpoint::Prices => "CoinGecko error",
            Endpoint::MarketChart => "CoinGecko market chart error",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Prices => write!(f, "prices"),
            Endpoint::MarketChart => write!(f, "market_chart"),
        }
    }
}
