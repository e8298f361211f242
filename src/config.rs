//! Configuration management for the coin price proxy.
//!
//! This module handles loading and validating configuration from environment variables.
//! A `.env` file in the working directory is honoured if present. Every setting has a
//! default, so an empty environment yields a working development server.

use crate::error::{ConfigError, ConfigResult};
use axum::http::HeaderValue;
use std::env;
use std::net::SocketAddr;

/// Public CoinGecko API root.
pub const DEFAULT_API_BASE_URL: &str = "https://api.coingecko.com/api/v3";

/// Which browser origins may call the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    /// Any origin, method and header. Development only.
    Any,
    /// Only these exact origins.
    List(Vec<String>),
}

impl CorsOrigins {
    /// Parse `*` or a comma-separated list of origins.
    fn parse(var_name: &str, raw: &str) -> ConfigResult<Self> {
        let raw = raw.trim();
        if raw == "*" {
            return Ok(CorsOrigins::Any);
        }

        let origins: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        if origins.is_empty() {
            return Err(ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: "Must be '*' or a comma-separated list of origins".to_string(),
            });
        }

        for origin in &origins {
            if HeaderValue::from_str(origin).is_err() {
                return Err(ConfigError::InvalidValue {
                    var: var_name.to_string(),
                    reason: format!("Not a valid origin: {}", origin),
                });
            }
        }

        Ok(CorsOrigins::List(origins))
    }
}

/// Configuration for the coin price proxy.
#[derive(Debug, Clone)]
pub struct Config {
    /// CoinGecko API base URL
    pub coingecko_api_url: String,

    /// Socket address the HTTP server binds to
    pub bind_address: SocketAddr,

    /// How long a cached upstream response stays fresh (default: 60)
    pub cache_ttl_seconds: u64,

    /// Upstream timeout for price lookups in seconds (default: 10)
    pub price_timeout_seconds: u64,

    /// Upstream timeout for market chart lookups in seconds (default: 15)
    pub chart_timeout_seconds: u64,

    /// CORS origin policy (default: any)
    pub cors_origins: CorsOrigins,

    /// User-Agent header identifying this proxy to upstream
    pub user_agent: String,

    /// Log level used when `RUST_LOG` is not set (default: "info")
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - `COINGECKO_API_BASE_URL`: Upstream base URL (default: public CoinGecko v3 API)
    /// - `BIND_ADDRESS`: Listen address (default: 127.0.0.1:8000)
    /// - `CACHE_TTL_SECONDS`: Cache TTL in seconds (default: 60)
    /// - `PRICE_TIMEOUT_SECONDS`: Price lookup timeout (default: 10)
    /// - `CHART_TIMEOUT_SECONDS`: Market chart lookup timeout (default: 15)
    /// - `CORS_ALLOWED_ORIGINS`: `*` or comma-separated origins (default: `*`)
    /// - `USER_AGENT`: Identifying User-Agent (default: coin-price-proxy/<version>)
    /// - `LOG_LEVEL`: Logging level (default: "info")
    pub fn from_env() -> ConfigResult<Self> {
        // A missing .env file is fine
        let _ = dotenvy::dotenv();

        let defaults = Config::default();

        let coingecko_api_url =
            env::var("COINGECKO_API_BASE_URL").unwrap_or(defaults.coingecko_api_url);
        if !coingecko_api_url.starts_with("http://") && !coingecko_api_url.starts_with("https://")
        {
            return Err(ConfigError::InvalidValue {
                var: "COINGECKO_API_BASE_URL".to_string(),
                reason: "Must start with http:// or https://".to_string(),
            });
        }

        let bind_address = match env::var("BIND_ADDRESS") {
            Ok(val) => val
                .parse::<SocketAddr>()
                .map_err(|_| ConfigError::InvalidValue {
                    var: "BIND_ADDRESS".to_string(),
                    reason: format!("Must be a socket address like 127.0.0.1:8000, got: {}", val),
                })?,
            Err(_) => defaults.bind_address,
        };

        let cache_ttl_seconds = Self::parse_env_u64("CACHE_TTL_SECONDS", defaults.cache_ttl_seconds)?;
        let price_timeout_seconds =
            Self::parse_timeout("PRICE_TIMEOUT_SECONDS", defaults.price_timeout_seconds)?;
        let chart_timeout_seconds =
            Self::parse_timeout("CHART_TIMEOUT_SECONDS", defaults.chart_timeout_seconds)?;

        let cors_origins = match env::var("CORS_ALLOWED_ORIGINS") {
            Ok(val) => CorsOrigins::parse("CORS_ALLOWED_ORIGINS", &val)?,
            Err(_) => defaults.cors_origins,
        };

        let user_agent = env::var("USER_AGENT").unwrap_or(defaults.user_agent);
        if user_agent.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                var: "USER_AGENT".to_string(),
                reason: "Cannot be empty".to_string(),
            });
        }

        let log_level = env::var("LOG_LEVEL").unwrap_or(defaults.log_level);

        Ok(Config {
            coingecko_api_url,
            bind_address,
            cache_ttl_seconds,
            price_timeout_seconds,
            chart_timeout_seconds,
            cors_origins,
            user_agent,
            log_level,
        })
    }

    /// Parse an environment variable as u64 with a default value.
    fn parse_env_u64(var_name: &str, default: u64) -> ConfigResult<u64> {
        match env::var(var_name) {
            Ok(val) => val.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: format!("Must be a positive number, got: {}", val),
            }),
            Err(_) => Ok(default),
        }
    }

    /// Parse a timeout in seconds; zero would make every request fail.
    fn parse_timeout(var_name: &str, default: u64) -> ConfigResult<u64> {
        let value = Self::parse_env_u64(var_name, default)?;
        if value == 0 {
            return Err(ConfigError::InvalidValue {
                var: var_name.to_string(),
                reason: "Must be greater than zero".to_string(),
            });
        }
        Ok(value)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            coingecko_api_url: DEFAULT_API_BASE_URL.to_string(),
            bind_address: SocketAddr::from(([127, 0, 0, 1], 8000)),
            cache_ttl_seconds: 60,
            price_timeout_seconds: 10,
            chart_timeout_seconds: 15,
            cors_origins: CorsOrigins::Any,
            user_agent: concat!("coin-price-proxy/", env!("CARGO_PKG_VERSION")).to_string(),
            log_level: "info".to_string(),
        }
    }
}
