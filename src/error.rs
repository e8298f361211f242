//! Error types for the coin price proxy.
//!
//! This module defines custom error types using `thiserror` for precise error handling.
//! Two errors reach HTTP clients, both as a JSON `{"detail": ...}` body: `ProxyError`
//! always renders as a 502 with the endpoint's fixed detail message, and
//! `RequestError` covers requests rejected before any upstream call.

use crate::models::{Endpoint, ErrorBody};
use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Transport-level failures talking to the upstream API.
///
/// HTTP error statuses are not represented here: the client hands those back
/// as a normal response and lets the caller decide.
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// The request did not complete within its timeout
    #[error("Request timeout")]
    Timeout,

    /// DNS lookup or TCP connect failed
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Any other transport failure (TLS, malformed response, bad URL)
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Reading the response body failed
    #[error("Failed to read response body: {0}")]
    Io(#[from] std::io::Error),

    /// The blocking worker running the request panicked or was cancelled
    #[error("Task join error: {0}")]
    TaskJoin(String),
}

/// Failure to obtain a usable upstream response for an endpoint.
#[derive(Error, Debug)]
pub enum ProxyError {
    /// Upstream answered with something other than 200
    #[error("{endpoint}: upstream returned status {status}")]
    UpstreamStatus { endpoint: Endpoint, status: u16 },

    /// Upstream could not be reached
    #[error("{endpoint}: {source}")]
    Transport {
        endpoint: Endpoint,
        #[source]
        source: UpstreamError,
    },

    /// Upstream answered 200 with a body that is not JSON
    #[error("{endpoint}: malformed upstream body: {source}")]
    MalformedBody {
        endpoint: Endpoint,
        #[source]
        source: serde_json::Error,
    },
}

impl ProxyError {
    /// The endpoint whose upstream call failed.
    pub fn endpoint(&self) -> Endpoint {
        match self {
            ProxyError::UpstreamStatus { endpoint, .. }
            | ProxyError::Transport { endpoint, .. }
            | ProxyError::MalformedBody { endpoint, .. } => *endpoint,
        }
    }

    /// Static message returned to clients in the `detail` field.
    pub fn detail(&self) -> &'static str {
        self.endpoint().error_detail()
    }

    /// Every upstream failure is a Bad Gateway from the client's point of view.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::BAD_GATEWAY
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            detail: self.detail().to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

/// A request that never reached the service.
#[derive(Error, Debug)]
pub enum RequestError {
    /// Query string failed to parse into the endpoint's parameters
    #[error(transparent)]
    InvalidQuery(#[from] QueryRejection),

    /// Path segment failed to parse
    #[error(transparent)]
    InvalidPath(#[from] PathRejection),

    /// No route matches
    #[error("Not Found")]
    NotFound,
}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::InvalidQuery(rejection) => rejection.status(),
            RequestError::InvalidPath(rejection) => rejection.status(),
            RequestError::NotFound => StatusCode::NOT_FOUND,
        }
    }

    /// Message returned to clients in the `detail` field.
    pub fn detail(&self) -> String {
        match self {
            RequestError::InvalidQuery(rejection) => rejection.body_text(),
            RequestError::InvalidPath(rejection) => rejection.body_text(),
            RequestError::NotFound => self.to_string(),
        }
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            detail: self.detail(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

/// Errors that can occur during configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Environment variable has invalid value
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },
}

/// Convenience type alias for Results with UpstreamError
pub type UpstreamResult<T> = Result<T, UpstreamError>;

/// Convenience type alias for Results with ProxyError
pub type ProxyResult<T> = Result<T, ProxyError>;

/// Convenience type alias for Results with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;
