use async_trait::async_trait;
use coin_price_proxy::client::AsyncUpstream;
use coin_price_proxy::error::{UpstreamError, UpstreamResult};
use coin_price_proxy::models::{QueryParams, UpstreamResponse};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What the mock answers for a path.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub enum MockReply {
    /// A completed HTTP exchange
    Status(u16, String),
    /// A connection failure
    ConnectionFailed,
    /// A request that ran out of time
    Timeout,
}

/// One call seen by the mock.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub path: String,
    pub query: QueryParams,
    pub timeout: Duration,
}

/// Mock upstream for testing.
///
/// Answers from a per-path table and records every call so tests can verify
/// whether the cache was used. Unknown paths get a 404.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct MockUpstream {
    replies: Arc<Mutex<HashMap<String, MockReply>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    delay: Arc<Mutex<Option<Duration>>>,
}

#[allow(dead_code)]
impl MockUpstream {
    /// Create a mock with no configured replies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer requests for `path` with `reply` from now on.
    pub fn set_reply(&self, path: &str, reply: MockReply) {
        let mut replies = self.replies.lock().unwrap();
        replies.insert(path.to_string(), reply);
    }

    /// Answer `path` with a 200 and `body`.
    pub fn set_json(&self, path: &str, body: &str) {
        self.set_reply(path, MockReply::Status(200, body.to_string()));
    }

    /// Hold every reply back for `delay`, simulating a slow upstream.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    /// Number of calls made for `path`.
    pub fn call_count(&self, path: &str) -> usize {
        let calls = self.calls.lock().unwrap();
        calls.iter().filter(|call| call.path == path).count()
    }

    /// Number of calls made for any path.
    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Every recorded call, oldest first.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// The most recent call, if any.
    pub fn last_call(&self) -> Option<RecordedCall> {
        self.calls.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl AsyncUpstream for MockUpstream {
    async fn fetch(
        &self,
        path: &str,
        query: QueryParams,
        timeout: Duration,
    ) -> UpstreamResult<UpstreamResponse> {
        {
            let mut calls = self.calls.lock().unwrap();
            calls.push(RecordedCall {
                path: path.to_string(),
                query,
                timeout,
            });
        }

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let reply = {
            let replies = self.replies.lock().unwrap();
            replies
                .get(path)
                .cloned()
                .unwrap_or_else(|| MockReply::Status(404, r#"{"error":"not found"}"#.to_string()))
        };

        match reply {
            MockReply::Status(status, body) => Ok(UpstreamResponse::new(status, body)),
            MockReply::ConnectionFailed => Err(UpstreamError::Connection(
                "connection refused".to_string(),
            )),
            MockReply::Timeout => Err(UpstreamError::Timeout),
        }
    }
}
