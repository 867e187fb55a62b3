//! Token bucket rate limiter middleware.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::Json;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use dashmap::DashMap;
use tracing::warn;

use notepad_core::config::RateLimitConfig;

use crate::extractors::auth::peer_ip;

/// Key used when the peer address is unavailable.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// In-memory token bucket limiter keyed by client IP.
///
/// Buckets refill lazily on each check and are never evicted.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    /// IP → bucket state.
    buckets: Arc<DashMap<String, TokenBucket>>,
    /// Maximum tokens per bucket.
    max_tokens: f64,
    /// Token refill rate per second.
    refill_rate: f64,
    enabled: bool,
}

#[derive(Debug, Clone)]
struct TokenBucket {
    tokens: f64,
    last_refill: Instant,
}

impl RateLimiter {
    /// Creates a limiter with `max_requests` tokens refilled over `window_ms`.
    pub fn new(config: &RateLimitConfig) -> Self {
        let max_tokens = f64::from(config.max_requests);
        let window = Duration::from_millis(config.window_ms.max(1)).as_secs_f64();
        Self {
            buckets: Arc::new(DashMap::new()),
            max_tokens,
            refill_rate: max_tokens / window,
            enabled: config.enabled,
        }
    }

    /// Whether requests are being limited at all.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Attempts to consume a token for the given key.
    pub fn check(&self, key: &str) -> bool {
        self.check_at(key, Instant::now())
    }

    /// Attempts to consume a token for the given key at `now`.
    pub fn check_at(&self, key: &str, now: Instant) -> bool {
        let mut bucket = self
            .buckets
            .entry(key.to_string())
            .or_insert_with(|| TokenBucket {
                tokens: self.max_tokens,
                last_refill: now,
            });

        let elapsed = now.saturating_duration_since(bucket.last_refill).as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed * self.refill_rate).min(self.max_tokens);
        bucket.last_refill = now;

        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }
}

/// Rejects requests with 429 once the caller's bucket is empty.
pub async fn rate_limit(
    State(limiter): State<RateLimiter>,
    request: Request,
    next: Next,
) -> Response {
    if !limiter.is_enabled() {
        return next.run(request).await;
    }

    let ip = peer_ip(request.extensions());
    if limiter.check(&ip) {
        return next.run(request).await;
    }

    warn!(ip = %ip, path = %request.uri().path(), "Rate limit exceeded");
    (
        StatusCode::TOO_MANY_REQUESTS,
        Json(serde_json::json!({ "message": "Rate limit exceeded" })),
    )
        .into_response()
}
