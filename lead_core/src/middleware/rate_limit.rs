//! Best-effort per-IP submission rate limiting
//!
//! Single-process, in-memory, lost on restart. The limiter is an injected
//! dependency of the submission path so a shared-store implementation can
//! replace it without touching the workflow.

use axum::{
    extract::{ConnectInfo, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use parking_lot::Mutex;
use serde_json::json;
use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::RateLimitConfig;
use crate::AppState;

#[derive(Debug)]
pub struct RateLimitError {
    pub retry_after_seconds: u64,
    pub limit: usize,
}

/// Decides whether a source IP may submit another lead.
pub trait RateLimit: Send + Sync {
    fn check(&self, ip: IpAddr) -> Result<(), RateLimitError>;

    /// (used, remaining) within the current window.
    fn usage(&self, ip: IpAddr) -> (usize, usize);

    fn allow(&self, ip: IpAddr) -> bool {
        self.check(ip).is_ok()
    }

    fn limit(&self) -> usize;
}

/// Sliding-window counter over recent submission timestamps per IP.
#[derive(Clone)]
pub struct InMemoryRateLimiter {
    submissions: Arc<Mutex<HashMap<IpAddr, Vec<Instant>>>>,
    max_submissions: usize,
    window: Duration,
}

impl InMemoryRateLimiter {
    pub fn new(max_submissions: usize, window: Duration) -> Self {
        Self {
            submissions: Arc::new(Mutex::new(HashMap::new())),
            max_submissions,
            window,
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(
            config.max_submissions,
            Duration::from_secs(config.window_seconds),
        )
    }

    /// Core check with an explicit clock, so window behavior is testable.
    fn check_at(&self, ip: IpAddr, now: Instant) -> Result<(), RateLimitError> {
        let mut submissions = self.submissions.lock();
        let entries = submissions.entry(ip).or_default();

        entries.retain(|&instant| now.duration_since(instant) < self.window);

        if entries.len() >= self.max_submissions {
            let oldest = entries.first().copied().unwrap_or(now);
            let reset_in = self.window.saturating_sub(now.duration_since(oldest));

            return Err(RateLimitError {
                retry_after_seconds: reset_in.as_secs(),
                limit: self.max_submissions,
            });
        }

        entries.push(now);
        Ok(())
    }
}

impl RateLimit for InMemoryRateLimiter {
    fn check(&self, ip: IpAddr) -> Result<(), RateLimitError> {
        self.check_at(ip, Instant::now())
    }

    fn usage(&self, ip: IpAddr) -> (usize, usize) {
        let now = Instant::now();
        let mut submissions = self.submissions.lock();

        // Read path: never insert an entry for an IP that has not submitted.
        let used = match submissions.get_mut(&ip) {
            Some(entries) => {
                entries.retain(|&instant| now.duration_since(instant) < self.window);
                entries.len()
            }
            None => 0,
        };

        (used, self.max_submissions.saturating_sub(used))
    }

    fn limit(&self) -> usize {
        self.max_submissions
    }
}

impl IntoResponse for RateLimitError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "success": false,
            "error": format!(
                "Too many submissions. Please retry after {} seconds",
                self.retry_after_seconds
            ),
            "retry_after": self.retry_after_seconds,
            "limit": self.limit,
        }));

        let mut response = (StatusCode::TOO_MANY_REQUESTS, body).into_response();

        if let Ok(value) = self.limit.to_string().parse() {
            response.headers_mut().insert("X-RateLimit-Limit", value);
        }
        if let Ok(value) = self.retry_after_seconds.to_string().parse() {
            response.headers_mut().insert("Retry-After", value);
        }

        response
    }
}

pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Result<Response, RateLimitError> {
    let ip = addr.ip();

    if let Err(err) = state.rate_limiter.check(ip) {
        state.metrics.record_rate_limited();
        tracing::warn!(ip = %ip, retry_after = err.retry_after_seconds, "Submission rate limited");
        return Err(err);
    }

    let (_, remaining) = state.rate_limiter.usage(ip);

    let mut response = next.run(request).await;

    if let Ok(value) = state.rate_limiter.limit().to_string().parse() {
        response.headers_mut().insert("X-RateLimit-Limit", value);
    }
    if let Ok(value) = remaining.to_string().parse() {
        response
            .headers_mut()
            .insert("X-RateLimit-Remaining", value);
    }

    Ok(response)
}
