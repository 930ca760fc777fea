//! Advisory "generation in progress" lock.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::LockError;

/// Proof of one acquisition. Release only succeeds for the token that
/// currently owns the key, so a holder that outlived its TTL cannot free
/// a later holder's lock.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LockToken(String);

impl LockToken {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LockToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Short-lived advisory lock. Holders must release; the TTL only bounds
/// how long a crashed holder can block others.
#[async_trait]
pub trait GenerationLock: Send + Sync {
    /// Returns `Ok(None)` when someone else holds the key.
    async fn try_acquire(&self, key: &str, ttl: Duration) -> Result<Option<LockToken>, LockError>;

    /// Frees the key if `token` still owns it. Returns whether anything
    /// was released.
    async fn release(&self, key: &str, token: &LockToken) -> Result<bool, LockError>;
}
