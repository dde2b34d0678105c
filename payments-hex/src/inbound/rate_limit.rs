//! Rate limiting middleware using Governor.
//!
//! Implements per-API-key rate limiting with a token bucket algorithm.

use axum::{
    Json,
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};
use serde_json::json;
use std::{num::NonZeroU32, sync::Arc, time::Duration};

use super::auth::extract_api_key;
use crate::security::{ApiKeys, hash_api_key};

/// Bucket shared by requests that carry no verified API key.
const ANONYMOUS: &str = "anonymous";

/// Rate limiter state shared across requests.
pub struct RateLimiterState {
    /// Per-key rate limiters, keyed by the hash of the API key
    limiters: DashMap<String, Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>>,
    /// Default quota for new keys
    quota: Quota,
    period: Duration,
}

impl Default for RateLimiterState {
    fn default() -> Self {
        Self::new(NonZeroU32::new(100).unwrap_or(NonZeroU32::MIN), Duration::from_secs(60))
    }
}

impl RateLimiterState {
    /// Creates a new rate limiter state.
    ///
    /// # Arguments
    /// * `requests` - Requests allowed per key in each `period`, all usable as a burst
    /// * `period` - Window over which the full quota replenishes
    pub fn new(requests: NonZeroU32, period: Duration) -> Self {
        let quota = Quota::with_period(period / requests.get())
            .map(|q| q.allow_burst(requests))
            .unwrap_or_else(|| Quota::per_second(requests));

        Self {
            limiters: DashMap::new(),
            quota,
            period,
        }
    }

    /// Checks if a request should be rate limited.
    /// Returns true if the request is allowed, false if rate limited.
    pub fn check(&self, key: &str) -> bool {
        let limiter = self
            .limiters
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(RateLimiter::direct(self.quota)))
            .clone();

        limiter.check().is_ok()
    }

    /// Seconds a limited client should wait before retrying.
    pub fn retry_after_seconds(&self) -> u64 {
        self.period.as_secs().max(1)
    }
}

/// Picks the bucket for a request: the hash of a configured key that
/// verifies, otherwise the shared anonymous bucket.
fn bucket_key(keys: &ApiKeys, auth_header: Option<&str>) -> String {
    extract_api_key(auth_header)
        .filter(|k| !k.is_empty() && keys.verify(k))
        .map(hash_api_key)
        .unwrap_or_else(|| ANONYMOUS.to_string())
}

/// Rate limiting middleware.
/// Buckets are per verified API key; all other requests share a single bucket.
pub async fn rate_limit_middleware(
    State((limiter, keys)): State<(Arc<RateLimiterState>, Arc<ApiKeys>)>,
    request: Request<Body>,
    next: Next,
) -> Response {
    // Skip rate limiting for health endpoint
    if request.uri().path() == "/health" {
        return next.run(request).await;
    }

    let key = bucket_key(
        &keys,
        request
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok()),
    );

    if !limiter.check(&key) {
        tracing::warn!("Rate limit exceeded");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({
                "error": "Rate limit exceeded. Please try again later.",
                "retry_after_seconds": limiter.retry_after_seconds()
            })),
        )
            .into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_is_per_key() {
        let state = RateLimiterState::new(NonZeroU32::new(2).unwrap(), Duration::from_secs(60));
        assert!(state.check("a"));
        assert!(state.check("a"));
        assert!(!state.check("a"));
        assert!(state.check("b"));
    }

    #[test]
    fn test_quota_spreads_requests_over_period() {
        let state = RateLimiterState::new(NonZeroU32::new(2).unwrap(), Duration::from_secs(60));
        assert_eq!(state.quota.replenish_interval(), Duration::from_secs(30));
        assert_eq!(state.quota.burst_size().get(), 2);
    }

    #[test]
    fn test_unverified_keys_share_anonymous_bucket() {
        let none = ApiKeys::default();
        assert_eq!(bucket_key(&none, Some("Bearer junk1")), ANONYMOUS);
        assert_eq!(bucket_key(&none, Some("Bearer junk2")), ANONYMOUS);

        let keys = ApiKeys::from_raw(["sk_live"]);
        assert_eq!(bucket_key(&keys, Some("Bearer sk_other")), ANONYMOUS);
        assert_eq!(bucket_key(&keys, None), ANONYMOUS);
        assert_eq!(bucket_key(&keys, Some("Bearer sk_live")), hash_api_key("sk_live"));
    }

    #[test]
    fn test_retry_after_matches_period() {
        let state = RateLimiterState::new(NonZeroU32::new(1).unwrap(), Duration::from_secs(60));
        assert_eq!(state.retry_after_seconds(), 60);
    }
}
