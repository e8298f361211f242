//! Request parameters for the proxied endpoints.
//!
//! Each query knows how to derive its cache key and the parameter list sent
//! upstream. Booleans are rendered as lowercase `true`/`false` in both places,
//! whatever spelling the caller used.

use super::Endpoint;
use serde::de::{self, Deserializer, Unexpected, Visitor};
use serde::Deserialize;
use std::fmt;

/// Coins requested when the caller does not name any.
pub const DEFAULT_IDS: &str = "bitcoin,ethereum";

/// Quote currency used when the caller does not name one.
pub const DEFAULT_VS_CURRENCY: &str = "usd";

/// Chart window in days used when the caller does not name one.
pub const DEFAULT_DAYS: i64 = 7;

/// Query-string parameters sent upstream, in order.
pub type QueryParams = Vec<(&'static str, String)>;

fn default_ids() -> String {
    DEFAULT_IDS.to_string()
}

fn default_vs_currency() -> String {
    DEFAULT_VS_CURRENCY.to_string()
}

fn default_include_24hr_change() -> bool {
    true
}

fn default_days() -> i64 {
    DEFAULT_DAYS
}

/// Accepts the usual query-string spellings of a boolean, case-insensitively:
/// `true`/`1`/`yes`/`on`/`t`/`y` and `false`/`0`/`no`/`off`/`f`/`n`.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    struct FlagVisitor;

    impl<'de> Visitor<'de> for FlagVisitor {
        type Value = bool;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a boolean such as true, false, 1, 0, yes, no, on or off")
        }

        fn visit_bool<E: de::Error>(self, value: bool) -> Result<bool, E> {
            Ok(value)
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<bool, E> {
            match value {
                0 => Ok(false),
                1 => Ok(true),
                _ => Err(E::invalid_value(Unexpected::Unsigned(value), &self)),
            }
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<bool, E> {
            match value.trim().to_ascii_lowercase().as_str() {
                "true" | "1" | "yes" | "on" | "t" | "y" => Ok(true),
                "false" | "0" | "no" | "off" | "f" | "n" => Ok(false),
                _ => Err(E::invalid_value(Unexpected::Str(value), &self)),
            }
        }
    }

    deserializer.deserialize_any(FlagVisitor)
}

/// Parameters of `GET /api/prices`.
///
/// Values are passed through untouched; upstream decides what an unknown
/// coin id or currency means.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PriceQuery {
    /// Comma-separated coin ids
    #[serde(default = "default_ids")]
    pub ids: String,

    #[serde(default = "default_vs_currency")]
    pub vs_currency: String,

    #[serde(
        default = "default_include_24hr_change",
        deserialize_with = "deserialize_flag"
    )]
    pub include_24hr_change: bool,
}

impl Default for PriceQuery {
    fn default() -> Self {
        Self {
            ids: default_ids(),
            vs_currency: default_vs_currency(),
            include_24hr_change: default_include_24hr_change(),
        }
    }
}

impl PriceQuery {
    /// `prices:{ids}:{vs_currency}:{flag}`. Parts are joined unescaped, so values
    /// that themselves contain `:` could collide; coin ids and currency codes never do.
    pub fn cache_key(&self) -> String {
        format!(
            "{}:{}:{}:{}",
            Endpoint::Prices.key_prefix(),
            self.ids,
            self.vs_currency,
            self.include_24hr_change
        )
    }

    /// Upstream path, relative to the API base URL.
    pub fn upstream_path(&self) -> String {
        "/simple/price".to_string()
    }

    pub fn upstream_params(&self) -> QueryParams {
        vec![
            ("ids", self.ids.clone()),
            ("vs_currencies", self.vs_currency.clone()),
            ("include_24hr_change", self.include_24hr_change.to_string()),
        ]
    }
}

/// Query parameters of `GET /api/market_chart/{coin_id}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChartQuery {
    #[serde(default = "default_vs_currency")]
    pub vs_currency: String,

    #[serde(default = "default_days")]
    pub days: i64,
}

impl Default for ChartQuery {
    fn default() -> Self {
        Self {
            vs_currency: default_vs_currency(),
            days: default_days(),
        }
    }
}

impl ChartQuery {
    /// `chart:{coin_id}:{vs_currency}:{days}`, joined unescaped like the price key.
    pub fn cache_key(&self, coin_id: &str) -> String {
        format!(
            "{}:{}:{}:{}",
            Endpoint::MarketChart.key_prefix(),
            coin_id,
            self.vs_currency,
            self.days
        )
    }

    /// Upstream path for `coin_id`. The id is percent-encoded so it stays a
    /// single path segment.
    pub fn upstream_path(&self, coin_id: &str) -> String {
        format!("/coins/{}/market_chart", urlencoding::encode(coin_id))
    }

    pub fn upstream_params(&self) -> QueryParams {
        vec![
            ("vs_currency", self.vs_currency.clone()),
            ("days", self.days.to_string()),
        ]
    }
}
