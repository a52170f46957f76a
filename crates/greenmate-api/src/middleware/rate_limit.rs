use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::constants::{RATE_LIMIT_SWEEP_INTERVAL_SECS, RATE_LIMIT_WINDOW_SECS};
use crate::error::ErrorResponse;

/// Fixed-window counter for one client.
#[derive(Clone)]
struct RateLimitBucket {
    count: u32,
    reset_at: Instant,
}

impl RateLimitBucket {
    fn new(window: Duration) -> Self {
        Self {
            count: 0,
            reset_at: Instant::now() + window,
        }
    }

    fn check_and_increment(&mut self, limit: u32, window: Duration) -> (bool, u32) {
        let now = Instant::now();

        // Reset if window expired
        if now >= self.reset_at {
            self.count = 0;
            self.reset_at = now + window;
        }

        if self.count < limit {
            self.count += 1;
            (true, limit.saturating_sub(self.count))
        } else {
            (false, 0)
        }
    }

    fn reset_in(&self) -> Duration {
        self.reset_at.saturating_duration_since(Instant::now())
    }
}

type Shard = Arc<Mutex<HashMap<String, RateLimitBucket>>>;

/// Sharded in-memory rate limiter keyed by client address.
///
/// Keys are hashed onto a fixed number of shards so concurrent requests from
/// different clients rarely contend on the same mutex.
#[derive(Clone)]
pub struct HttpRateLimiter {
    shards: Vec<Shard>,
    limit_per_minute: u32,
    window: Duration,
    max_buckets: usize, // per shard, before eviction
    trusted_proxy_count: usize,
}

impl HttpRateLimiter {
    /// Create rate limiter with custom shard count (at least one shard).
    pub fn with_shards(limit_per_minute: u32, shard_count: usize) -> Self {
        let shards = (0..shard_count.max(1))
            .map(|_| Arc::new(Mutex::new(HashMap::new())))
            .collect();
        Self {
            shards,
            limit_per_minute,
            window: Duration::from_secs(RATE_LIMIT_WINDOW_SECS),
            max_buckets: 10_000,
            trusted_proxy_count: 0,
        }
    }

    /// Trust the last `count` `X-Forwarded-For` entries as written by our own proxies.
    pub fn with_trusted_proxies(mut self, count: usize) -> Self {
        self.trusted_proxy_count = count;
        self
    }

    pub fn limit_per_minute(&self) -> u32 {
        self.limit_per_minute
    }

    fn shard_index(&self, key: &str) -> usize {
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() as usize) % self.shards.len()
    }

    fn is_live(bucket: &RateLimitBucket, now: Instant, grace: Duration) -> bool {
        bucket.reset_at > now || now.duration_since(bucket.reset_at) < grace
    }

    /// Count one request for `key`.
    ///
    /// Returns the remaining budget, or how long until the window resets when
    /// the key is over its limit.
    pub async fn check_rate_limit(&self, key: &str) -> Result<u32, Duration> {
        let shard_index = self.shard_index(key);
        let mut buckets = self.shards[shard_index].lock().await;

        if buckets.len() >= self.max_buckets {
            let now = Instant::now();
            buckets.retain(|_, bucket| Self::is_live(bucket, now, self.window));

            // Still full: drop the bucket closest to expiry.
            if buckets.len() >= self.max_buckets {
                let oldest_key = buckets
                    .iter()
                    .min_by_key(|(_, bucket)| bucket.reset_at)
                    .map(|(k, _)| k.clone());
                if let Some(key_to_remove) = oldest_key {
                    buckets.remove(&key_to_remove);
                    tracing::debug!(
                        removed_key = %key_to_remove,
                        shard_index,
                        "Evicted oldest rate limit bucket due to capacity limit"
                    );
                }
            }
        }

        let window = self.window;
        let bucket = buckets
            .entry(key.to_string())
            .or_insert_with(|| RateLimitBucket::new(window));

        let (allowed, remaining) = bucket.check_and_increment(self.limit_per_minute, window);
        if allowed {
            Ok(remaining)
        } else {
            Err(bucket.reset_in())
        }
    }

    /// Remove buckets whose window ended more than one window ago.
    pub async fn cleanup_expired_buckets(&self) -> usize {
        let now = Instant::now();
        let mut total_cleaned = 0;

        for shard in &self.shards {
            let mut buckets = shard.lock().await;
            let before = buckets.len();
            buckets.retain(|_, bucket| Self::is_live(bucket, now, self.window));
            total_cleaned += before - buckets.len();
        }

        if total_cleaned > 0 {
            tracing::debug!(
                buckets_cleaned = total_cleaned,
                "Cleaned up expired rate limit buckets across all shards"
            );
        }
        total_cleaned
    }

    /// Periodically sweep expired buckets until `shutdown` is cancelled.
    pub fn spawn_sweeper(self: Arc<Self>, shutdown: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(Duration::from_secs(RATE_LIMIT_SWEEP_INTERVAL_SECS));
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => {
                        tracing::debug!("Rate limiter sweeper stopped");
                        break;
                    }
                    _ = interval.tick() => {
                        self.cleanup_expired_buckets().await;
                    }
                }
            }
        })
    }
}

/// Rate-limit key for a request.
///
/// With no trusted proxies the peer address is used and `X-Forwarded-For` is
/// ignored, since any client can set it. With `N` trusted proxies, each proxy
/// appends the address it saw, so the client is the `N`-th entry from the
/// right. Anything unparsable falls back to the peer, then a shared bucket.
fn client_key(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    trusted_proxy_count: usize,
) -> String {
    let forwarded = (trusted_proxy_count > 0)
        .then(|| headers.get("x-forwarded-for"))
        .flatten()
        .and_then(|v| v.to_str().ok())
        .and_then(|v| {
            let hops: Vec<&str> = v
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect();
            hops.len()
                .checked_sub(trusted_proxy_count)
                .and_then(|pos| hops.get(pos).copied())
        })
        .and_then(|ip| ip.parse::<IpAddr>().ok());

    match (forwarded, peer) {
        (Some(ip), _) => format!("ip:{}", ip),
        (None, Some(addr)) => format!("ip:{}", addr.ip()),
        (None, None) => "ip:unknown".to_string(),
    }
}

fn insert_header(response: &mut Response, name: &'static str, value: impl ToString) {
    if let Ok(header_value) = HeaderValue::from_str(&value.to_string()) {
        response.headers_mut().insert(name, header_value);
    }
}

/// HTTP rate limiting middleware
///
/// Adds `X-RateLimit-Limit` and `X-RateLimit-Remaining` to every response,
/// and `Retry-After` on `429 Too Many Requests`.
pub async fn rate_limit_middleware(
    State(rate_limiter): State<Arc<HttpRateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let key = client_key(request.headers(), peer, rate_limiter.trusted_proxy_count);
    let limit = rate_limiter.limit_per_minute();

    match rate_limiter.check_rate_limit(&key).await {
        Ok(remaining) => {
            let mut response = next.run(request).await;
            insert_header(&mut response, "X-RateLimit-Limit", limit);
            insert_header(&mut response, "X-RateLimit-Remaining", remaining);
            response
        }
        Err(reset_in) => {
            let reset_seconds = reset_in.as_secs().max(1);
            tracing::warn!(
                key = %key,
                path = %request.uri().path(),
                limit,
                "Rate limit exceeded"
            );

            let mut response = (
                StatusCode::TOO_MANY_REQUESTS,
                axum::Json(ErrorResponse {
                    error: "Too many requests. Please slow down.".to_string(),
                    details: None,
                    error_type: None,
                    code: "RATE_LIMIT_EXCEEDED".to_string(),
                    recoverable: true,
                    suggested_action: Some(format!("Wait {}s and retry", reset_seconds)),
                }),
            )
                .into_response();

            insert_header(&mut response, "X-RateLimit-Limit", limit);
            insert_header(&mut response, "X-RateLimit-Remaining", 0);
            insert_header(&mut response, "Retry-After", reset_seconds);
            response
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_limit_is_enforced_per_key() {
        let limiter = HttpRateLimiter::with_shards(2, 4);
        assert_eq!(limiter.check_rate_limit("ip:1.1.1.1").await, Ok(1));
        assert_eq!(limiter.check_rate_limit("ip:1.1.1.1").await, Ok(0));
        let blocked = limiter.check_rate_limit("ip:1.1.1.1").await.unwrap_err();
        assert!(blocked <= Duration::from_secs(RATE_LIMIT_WINDOW_SECS));

        // Other clients are unaffected.
        assert_eq!(limiter.check_rate_limit("ip:2.2.2.2").await, Ok(1));
    }

    #[tokio::test]
    async fn test_zero_shards_is_clamped() {
        let limiter = HttpRateLimiter::with_shards(1, 0);
        assert!(limiter.check_rate_limit("k").await.is_ok());
    }

    #[tokio::test]
    async fn test_cleanup_keeps_live_buckets() {
        let limiter = HttpRateLimiter::with_shards(10, 2);
        limiter.check_rate_limit("a").await.unwrap();
        assert_eq!(limiter.cleanup_expired_buckets().await, 0);
    }

    #[tokio::test]
    async fn test_sweeper_stops_on_cancel() {
        let limiter = Arc::new(HttpRateLimiter::with_shards(10, 2));
        let token = CancellationToken::new();
        let handle = limiter.spawn_sweeper(token.clone());
        token.cancel();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();
    }

    #[test]
    fn test_client_key_ignores_forwarded_for_without_proxies() {
        let mut headers = HeaderMap::new();
        let peer = Some(SocketAddr::from(([10, 0, 0, 1], 5000)));
        assert_eq!(client_key(&headers, peer, 0), "ip:10.0.0.1");
        assert_eq!(client_key(&headers, None, 0), "ip:unknown");

        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.9, 10.0.0.2"),
        );
        assert_eq!(client_key(&headers, peer, 0), "ip:10.0.0.1");
    }

    #[test]
    fn test_client_key_behind_trusted_proxies() {
        let mut headers = HeaderMap::new();
        let peer = Some(SocketAddr::from(([10, 0, 0, 1], 5000)));

        // Client-supplied first hop is not trusted; the proxy-appended entry is.
        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("1.2.3.4, 203.0.113.9"),
        );
        assert_eq!(client_key(&headers, peer, 1), "ip:203.0.113.9");

        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("1.2.3.4, 203.0.113.9, 10.0.0.2"),
        );
        assert_eq!(client_key(&headers, peer, 2), "ip:203.0.113.9");

        // Shorter chain than configured proxies, or garbage: fall back to the peer.
        assert_eq!(client_key(&headers, peer, 5), "ip:10.0.0.1");
        headers.insert("x-forwarded-for", HeaderValue::from_static("garbage"));
        assert_eq!(client_key(&headers, peer, 1), "ip:10.0.0.1");
    }

    #[tokio::test]
    async fn test_rotating_forwarded_for_shares_one_bucket() {
        let limiter = HttpRateLimiter::with_shards(2, 4);
        let peer = Some(SocketAddr::from(([10, 0, 0, 1], 5000)));
        let mut blocked = 0;
        for i in 0..10 {
            let mut headers = HeaderMap::new();
            headers.insert(
                "x-forwarded-for",
                HeaderValue::from_str(&format!("10.0.0.{}", i + 10)).unwrap(),
            );
            let key = client_key(&headers, peer, limiter.trusted_proxy_count);
            if limiter.check_rate_limit(&key).await.is_err() {
                blocked += 1;
            }
        }
        assert_eq!(blocked, 8);
    }
}
