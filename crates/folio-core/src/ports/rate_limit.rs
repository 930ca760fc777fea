//! Rate limiting port.

use async_trait::async_trait;
use std::time::Duration;

/// Per-key rate limiter.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Check if a request for `key` is allowed and count it.
    async fn check(&self, key: &str) -> Result<RateLimitResult, RateLimitError>;
}

/// Result of a rate limit check.
#[derive(Debug, Clone)]
pub struct RateLimitResult {
    pub allowed: bool,
    pub reset_after: Duration,
}

#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    #[error("Backend error: {0}")]
    Backend(String),
}
