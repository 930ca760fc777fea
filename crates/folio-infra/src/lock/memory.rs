//! Process-local generation lock, used when Redis is not configured.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::Mutex;

use folio_core::error::LockError;
use folio_core::ports::{GenerationLock, LockToken};

struct Hold {
    token: LockToken,
    expires_at: Instant,
}

/// Lock table keyed by name, holding each key's owner and expiry.
///
/// Only serializes runs inside one process.
pub struct InMemoryGenerationLock {
    held: Mutex<HashMap<String, Hold>>,
}

impl InMemoryGenerationLock {
    pub fn new() -> Self {
        Self {
            held: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryGenerationLock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerationLock for InMemoryGenerationLock {
    async fn try_acquire(&self, key: &str, ttl: Duration) -> Result<Option<LockToken>, LockError> {
        let now = Instant::now();
        let mut held = self.held.lock().await;

        if held.get(key).is_some_and(|hold| hold.expires_at > now) {
            return Ok(None);
        }

        let token = LockToken::generate();
        held.insert(
            key.to_string(),
            Hold {
                token: token.clone(),
                expires_at: now + ttl,
            },
        );
        Ok(Some(token))
    }

    async fn release(&self, key: &str, token: &LockToken) -> Result<bool, LockError> {
        let mut held = self.held.lock().await;
        match held.get(key) {
            Some(hold) if hold.token == *token => {
                held.remove(key);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
