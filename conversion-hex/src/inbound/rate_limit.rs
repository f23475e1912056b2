//! Rate limiting middleware using Governor.
//!
//! Every caller gets its own token bucket so that one client cannot spend the
//! whole upstream quota. Callers are identified by their peer address. The
//! first `X-Forwarded-For` address is used instead only when the service is
//! configured to sit behind a trusted proxy, since clients can set that
//! header to anything.

use axum::{
    Json,
    body::Body,
    extract::{ConnectInfo, State},
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{Quota, RateLimiter, clock::DefaultClock, state::keyed::DashMapStateStore};
use serde_json::json;
use std::{net::SocketAddr, num::NonZeroU32, sync::Arc};

/// Paths that are never rate limited.
const EXEMPT_PATHS: &[&str] = &["/health", "/api-docs/openapi.json"];

/// Rate limiter state shared across requests.
pub struct RateLimiterState {
    /// One bucket per caller key
    limiter: RateLimiter<String, DashMapStateStore<String>, DefaultClock>,
    trust_forwarded_for: bool,
}

impl Default for RateLimiterState {
    fn default() -> Self {
        Self::new(100, false)
    }
}

impl RateLimiterState {
    /// Creates a limiter allowing `requests_per_minute` per caller.
    /// A value of zero is treated as one.
    pub fn new(requests_per_minute: u32, trust_forwarded_for: bool) -> Self {
        let requests = NonZeroU32::new(requests_per_minute).unwrap_or(NonZeroU32::MIN);
        Self::with_quota(Quota::per_minute(requests), trust_forwarded_for)
    }

    fn with_quota(quota: Quota, trust_forwarded_for: bool) -> Self {
        Self {
            limiter: RateLimiter::dashmap(quota),
            trust_forwarded_for,
        }
    }

    /// Returns true if the request is allowed, false if rate limited.
    pub fn check(&self, key: &str) -> bool {
        self.limiter.check_key(&key.to_string()).is_ok()
    }

    /// Drops buckets that have refilled completely.
    pub fn retain_recent(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
    }

    /// Number of callers currently tracked.
    pub fn tracked_callers(&self) -> usize {
        self.limiter.len()
    }

    fn caller_key(&self, request: &Request<Body>) -> String {
        if self.trust_forwarded_for {
            let forwarded = request
                .headers()
                .get("X-Forwarded-For")
                .and_then(|h| h.to_str().ok())
                .and_then(|s| s.split(',').next())
                .map(str::trim)
                .filter(|s| !s.is_empty());
            if let Some(addr) = forwarded {
                return addr.to_string();
            }
        }

        request
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
            .unwrap_or_else(|| "anonymous".to_string())
    }
}

/// Rate limiting middleware.
pub async fn rate_limit_middleware(
    State(limiter): State<Arc<RateLimiterState>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if EXEMPT_PATHS.contains(&request.uri().path()) {
        return next.run(request).await;
    }

    let key = limiter.caller_key(&request);
    if !limiter.check(&key) {
        tracing::warn!(caller = %key, "Rate limit exceeded");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({
                "errors": ["Rate limit exceeded. Please try again later."],
                "retry_after_seconds": 60
            })),
        )
            .into_response();
    }

    next.run(request).await
}
