//! HTTP route handlers.
//!
//! Handlers only extract parameters and delegate to the market data service;
//! upstream failures turn into 502 responses through `ProxyError`'s `IntoResponse`.
//! Malformed parameters are rejected by the extractors with a JSON body.

use crate::error::{ProxyResult, RequestError};
use crate::models::{ChartQuery, HealthResponse, MetricsResponse, PriceQuery};
use crate::server::extract::{ApiPath, ApiQuery};
use crate::server::state::AppState;
use axum::extract::State;
use axum::Json;
use serde_json::Value;
use std::sync::Arc;

/// `GET /api/health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { ok: true })
}

/// `GET /api/prices?ids=..&vs_currency=..&include_24hr_change=..`
pub async fn prices(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PriceQuery>,
) -> ProxyResult<Json<Arc<Value>>> {
    let payload = state.service.prices(&query).await?;
    Ok(Json(payload))
}

/// `GET /api/market_chart/{coin_id}?vs_currency=..&days=..`
pub async fn market_chart(
    State(state): State<AppState>,
    ApiPath(coin_id): ApiPath<String>,
    ApiQuery(query): ApiQuery<ChartQuery>,
) -> ProxyResult<Json<Arc<Value>>> {
    let payload = state.service.market_chart(&coin_id, &query).await?;
    Ok(Json(payload))
}

/// Any unmatched route.
pub async fn not_found() -> RequestError {
    RequestError::NotFound
}

/// `GET /api/metrics`
pub async fn metrics(State(state): State<AppState>) -> Json<MetricsResponse> {
    let uptime = chrono::Utc::now() - state.started_at;

    Json(MetricsResponse {
        metrics: state.metrics.summary(),
        cache_entries: state.cache.len(),
        started_at: state.started_at.to_rfc3339(),
        uptime_seconds: uptime.num_seconds(),
    })
}
