//! Administrator authentication and password attempt throttling.
//!
//! The admin surface is gated by a single bearer key configured at startup,
//! compared in constant time. Password attempts on the public authorize
//! endpoint are throttled per document id to slow down online guessing.

use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use docvault_core::AppError;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use subtle::ConstantTimeEq;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Counts failed authorize attempts per document inside a sliding window.
#[derive(Clone)]
pub struct AuthorizeAttemptLimiter {
    inner: Arc<Mutex<HashMap<Uuid, (u32, Instant)>>>,
    max_failures: u32,
    window: Duration,
}

impl AuthorizeAttemptLimiter {
    pub fn new(max_failures: u32, window_seconds: u64) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            max_failures,
            window: Duration::from_secs(window_seconds),
        }
    }

    /// Record a failed attempt; returns true when the document is now blocked.
    pub async fn record_failure(&self, document_id: Uuid) -> bool {
        let mut guard = self.inner.lock().await;
        let now = Instant::now();
        let (count, reset_at) = guard.entry(document_id).or_insert((0, now + self.window));
        if now >= *reset_at {
            *count = 0;
            *reset_at = now + self.window;
        }
        *count += 1;
        *count >= self.max_failures
    }

    pub async fn is_blocked(&self, document_id: Uuid) -> bool {
        let mut guard = self.inner.lock().await;
        if let Some((count, reset_at)) = guard.get(&document_id) {
            if Instant::now() >= *reset_at {
                guard.remove(&document_id);
                return false;
            }
            return *count >= self.max_failures;
        }
        false
    }

    /// Drop expired entries. Called periodically from a background task.
    pub async fn cleanup_expired(&self) {
        let mut guard = self.inner.lock().await;
        let now = Instant::now();
        guard.retain(|_, (_, reset_at)| now < *reset_at);
    }
}

/// State for the admin auth middleware.
#[derive(Clone)]
pub struct AuthState {
    pub admin_api_key: String,
}

fn secure_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Require a valid admin bearer key on every request passing through.
pub async fn admin_auth_middleware(
    State(auth_state): State<Arc<AuthState>>,
    request: Request,
    next: Next,
) -> Response {
    let auth_header = match request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
    {
        Some(h) => h,
        None => {
            return HttpAppError(AppError::Unauthorized(
                "Missing authorization header".to_string(),
            ))
            .into_response();
        }
    };

    let Some(presented) = auth_header.strip_prefix("Bearer ") else {
        return HttpAppError(AppError::Unauthorized(
            "Authorization header must use Bearer scheme".to_string(),
        ))
        .into_response();
    };

    if !secure_compare(presented, &auth_state.admin_api_key) {
        tracing::debug!("Admin authentication failed");
        return HttpAppError(AppError::Unauthorized("Invalid API key".to_string()))
            .into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secure_compare() {
        assert!(secure_compare("abc123", "abc123"));
        assert!(!secure_compare("abc123", "abc124"));
        assert!(!secure_compare("abc123", "abc12"));
        assert!(!secure_compare("", "x"));
    }

    #[tokio::test]
    async fn test_limiter_blocks_after_max_failures() {
        let limiter = AuthorizeAttemptLimiter::new(3, 60);
        let id = Uuid::new_v4();

        assert!(!limiter.is_blocked(id).await);
        assert!(!limiter.record_failure(id).await);
        assert!(!limiter.record_failure(id).await);
        assert!(limiter.record_failure(id).await);
        assert!(limiter.is_blocked(id).await);
    }

    #[tokio::test]
    async fn test_limiter_is_per_document() {
        let limiter = AuthorizeAttemptLimiter::new(2, 60);
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        limiter.record_failure(a).await;
        limiter.record_failure(a).await;

        assert!(limiter.is_blocked(a).await);
        assert!(!limiter.is_blocked(b).await);
    }

    #[tokio::test]
    async fn test_limiter_window_resets() {
        let limiter = AuthorizeAttemptLimiter::new(1, 0);
        let id = Uuid::new_v4();

        limiter.record_failure(id).await;
        // Zero-length window: the entry expires immediately.
        assert!(!limiter.is_blocked(id).await);
    }

    #[tokio::test]
    async fn test_cleanup_drops_expired_entries() {
        let limiter = AuthorizeAttemptLimiter::new(1, 0);
        let id = Uuid::new_v4();

        limiter.record_failure(id).await;
        limiter.cleanup_expired().await;
        assert!(limiter.inner.lock().await.is_empty());
    }
}
