//! Tests for the cache-then-upstream flow of the market data service.

mod mocks;

use coin_price_proxy::models::{ChartQuery, PriceQuery};
use coin_price_proxy::services::{
    MarketDataService, MarketDataServiceImpl, ResponseCache, UpstreamTimeouts,
};
use coin_price_proxy::{Metrics, ProxyError};
use mocks::{MockReply, MockUpstream};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

const PRICE_PATH: &str = "/simple/price";
const BTC_CHART_PATH: &str = "/coins/bitcoin/market_chart";

struct Fixture {
    upstream: MockUpstream,
    cache: ResponseCache,
    metrics: Metrics,
    service: MarketDataServiceImpl,
}

fn fixture_with_ttl(ttl: Duration) -> Fixture {
    let upstream = MockUpstream::new();
    let cache = ResponseCache::with_ttl(ttl);
    let metrics = Metrics::new();
    let service = MarketDataServiceImpl::new(
        Arc::new(upstream.clone()),
        cache.clone(),
        metrics.clone(),
        UpstreamTimeouts::default(),
    );

    Fixture {
        upstream,
        cache,
        metrics,
        service,
    }
}

fn fixture() -> Fixture {
    fixture_with_ttl(Duration::from_secs(60))
}

fn btc_query() -> PriceQuery {
    PriceQuery {
        ids: "bitcoin".to_string(),
        vs_currency: "usd".to_string(),
        include_24hr_change: false,
    }
}

#[tokio::test]
async fn test_prices_miss_then_hit() {
    let f = fixture();
    f.upstream
        .set_json(PRICE_PATH, r#"{"bitcoin": {"usd": 50000}}"#);

    let first = f.service.prices(&btc_query()).await.unwrap();
    let second = f.service.prices(&btc_query()).await.unwrap();

    assert_eq!(*first, json!({"bitcoin": {"usd": 50000}}));
    assert_eq!(first, second);
    assert_eq!(f.upstream.call_count(PRICE_PATH), 1);
    assert_eq!(f.metrics.cache_misses_total(), 1);
    assert_eq!(f.metrics.cache_hits_total(), 1);
}

#[tokio::test]
async fn test_prices_sends_upstream_params_and_timeout() {
    let f = fixture();
    f.upstream.set_json(PRICE_PATH, "{}");

    f.service.prices(&btc_query()).await.unwrap();

    let call = f.upstream.last_call().unwrap();
    assert_eq!(call.path, PRICE_PATH);
    assert_eq!(
        call.query,
        vec![
            ("ids", "bitcoin".to_string()),
            ("vs_currencies", "usd".to_string()),
            ("include_24hr_change", "false".to_string()),
        ]
    );
    assert_eq!(call.timeout, Duration::from_secs(10));
}

#[tokio::test]
async fn test_prices_cached_under_canonical_key() {
    let f = fixture();
    f.upstream.set_json(PRICE_PATH, r#"{"bitcoin": {"usd": 1}}"#);

    f.service.prices(&btc_query()).await.unwrap();

    assert_eq!(
        f.cache.get(&"prices:bitcoin:usd:false".to_string()),
        Some(Arc::new(json!({"bitcoin": {"usd": 1}})))
    );
}

#[tokio::test]
async fn test_prices_different_ids_are_cached_separately() {
    let f = fixture();
    f.upstream.set_json(PRICE_PATH, "{}");

    let eth = PriceQuery {
        ids: "ethereum".to_string(),
        ..btc_query()
    };

    f.service.prices(&btc_query()).await.unwrap();
    f.service.prices(&eth).await.unwrap();
    f.service.prices(&eth).await.unwrap();

    assert_eq!(f.upstream.call_count(PRICE_PATH), 2);
    assert_eq!(f.cache.len(), 2);
}

#[tokio::test]
async fn test_prices_change_flag_is_part_of_key() {
    let f = fixture();
    f.upstream.set_json(PRICE_PATH, "{}");

    let with_change = PriceQuery {
        include_24hr_change: true,
        ..btc_query()
    };

    f.service.prices(&btc_query()).await.unwrap();
    f.service.prices(&with_change).await.unwrap();

    assert_eq!(f.upstream.call_count(PRICE_PATH), 2);
}

#[tokio::test]
async fn test_prices_unknown_ids_pass_through() {
    let f = fixture();
    f.upstream.set_json(PRICE_PATH, "{}");

    let query = PriceQuery {
        ids: "not-a-coin".to_string(),
        ..btc_query()
    };
    let payload = f.service.prices(&query).await.unwrap();

    assert_eq!(*payload, json!({}));
}

#[tokio::test]
async fn test_prices_error_status_is_not_cached() {
    let f = fixture();
    f.upstream
        .set_reply(PRICE_PATH, MockReply::Status(429, "rate limited".to_string()));

    let err = f.service.prices(&btc_query()).await.unwrap_err();
    assert!(matches!(err, ProxyError::UpstreamStatus { status: 429, .. }));
    assert_eq!(err.detail(), "CoinGecko error");
    assert!(f.cache.is_empty());

    // The retry goes upstream again rather than to the cache
    f.upstream.set_json(PRICE_PATH, r#"{"bitcoin": {"usd": 2}}"#);
    let payload = f.service.prices(&btc_query()).await.unwrap();

    assert_eq!(*payload, json!({"bitcoin": {"usd": 2}}));
    assert_eq!(f.upstream.call_count(PRICE_PATH), 2);
}

#[tokio::test]
async fn test_prices_non_200_success_status_is_rejected() {
    let f = fixture();
    f.upstream
        .set_reply(PRICE_PATH, MockReply::Status(204, String::new()));

    let err = f.service.prices(&btc_query()).await.unwrap_err();
    assert!(matches!(err, ProxyError::UpstreamStatus { status: 204, .. }));
    assert!(f.cache.is_empty());
}

#[tokio::test]
async fn test_prices_transport_failure_maps_to_proxy_error() {
    let f = fixture();
    f.upstream.set_reply(PRICE_PATH, MockReply::ConnectionFailed);

    let err = f.service.prices(&btc_query()).await.unwrap_err();
    assert!(matches!(err, ProxyError::Transport { .. }));
    assert_eq!(err.detail(), "CoinGecko error");
    assert!(f.cache.is_empty());
}

#[tokio::test]
async fn test_prices_malformed_body_maps_to_proxy_error() {
    let f = fixture();
    f.upstream
        .set_reply(PRICE_PATH, MockReply::Status(200, "<html>oops</html>".to_string()));

    let err = f.service.prices(&btc_query()).await.unwrap_err();
    assert!(matches!(err, ProxyError::MalformedBody { .. }));
    assert!(f.cache.is_empty());
    assert_eq!(f.metrics.upstream_errors_total(), 1);
}

#[tokio::test]
async fn test_prices_refetched_after_ttl() {
    let f = fixture_with_ttl(Duration::from_millis(50));
    f.upstream.set_json(PRICE_PATH, "{}");

    f.service.prices(&btc_query()).await.unwrap();
    tokio::time::sleep(Duration::from_millis(80)).await;
    f.service.prices(&btc_query()).await.unwrap();

    assert_eq!(f.upstream.call_count(PRICE_PATH), 2);
    assert_eq!(f.cache.len(), 1);
}

#[tokio::test]
async fn test_market_chart_miss_then_hit() {
    let f = fixture();
    let body = r#"{"prices": [[1700000000000, 37000.5]], "market_caps": [], "total_volumes": []}"#;
    f.upstream.set_json(BTC_CHART_PATH, body);

    let query = ChartQuery {
        vs_currency: "usd".to_string(),
        days: 1,
    };
    let first = f.service.market_chart("bitcoin", &query).await.unwrap();
    let second = f.service.market_chart("bitcoin", &query).await.unwrap();

    assert_eq!(first["prices"][0][1], json!(37000.5));
    assert_eq!(first, second);
    assert_eq!(f.upstream.call_count(BTC_CHART_PATH), 1);
    assert!(f
        .cache
        .get(&"chart:bitcoin:usd:1".to_string())
        .is_some());
}

#[tokio::test]
async fn test_market_chart_sends_upstream_params_and_timeout() {
    let f = fixture();
    f.upstream.set_json(BTC_CHART_PATH, "{}");

    f.service
        .market_chart("bitcoin", &ChartQuery::default())
        .await
        .unwrap();

    let call = f.upstream.last_call().unwrap();
    assert_eq!(
        call.query,
        vec![("vs_currency", "usd".to_string()), ("days", "7".to_string())]
    );
    assert_eq!(call.timeout, Duration::from_secs(15));
}

#[tokio::test]
async fn test_market_chart_days_is_part_of_key() {
    let f = fixture();
    f.upstream.set_json(BTC_CHART_PATH, "{}");

    let week = ChartQuery::default();
    let month = ChartQuery {
        days: 30,
        ..ChartQuery::default()
    };

    f.service.market_chart("bitcoin", &week).await.unwrap();
    f.service.market_chart("bitcoin", &month).await.unwrap();

    assert_eq!(f.upstream.call_count(BTC_CHART_PATH), 2);
}

#[tokio::test]
async fn test_market_chart_error_is_not_cached() {
    let f = fixture();
    f.upstream
        .set_reply(BTC_CHART_PATH, MockReply::Status(500, "boom".to_string()));

    let query = ChartQuery {
        days: 1,
        ..ChartQuery::default()
    };
    let err = f.service.market_chart("bitcoin", &query).await.unwrap_err();

    assert_eq!(err.detail(), "CoinGecko market chart error");
    assert!(f.cache.get(&"chart:bitcoin:usd:1".to_string()).is_none());
}

#[tokio::test]
async fn test_market_chart_timeout_maps_to_proxy_error() {
    let f = fixture();
    f.upstream.set_reply(BTC_CHART_PATH, MockReply::Timeout);

    let err = f
        .service
        .market_chart("bitcoin", &ChartQuery::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ProxyError::Transport { .. }));
    assert_eq!(err.detail(), "CoinGecko market chart error");
}

#[tokio::test]
async fn test_concurrent_misses_may_both_fetch() {
    let f = fixture();
    f.upstream.set_json(PRICE_PATH, r#"{"bitcoin": {"usd": 3}}"#);
    f.upstream.set_delay(Duration::from_millis(50));

    let query = btc_query();
    let (a, b) = tokio::join!(f.service.prices(&query), f.service.prices(&query));

    assert_eq!(a.unwrap(), b.unwrap());
    // Both requests missed before either wrote; the cache still ends up with one entry
    assert_eq!(f.upstream.call_count(PRICE_PATH), 2);
    assert_eq!(f.cache.len(), 1);
}
