//! Redis-backed generation lock, shared by every instance pointing at the
//! same Redis.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{Client, Script};

use folio_core::error::LockError;
use folio_core::ports::{GenerationLock, LockToken};

/// Redis connection configuration.
#[derive(Debug, Clone)]
pub struct RedisConfig {
    /// Redis URL (e.g., redis://localhost:6379)
    pub url: String,
    pub connect_timeout: Duration,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

impl RedisConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` when `REDIS_URL` is unset, meaning no shared lock.
    pub fn from_env() -> Option<Self> {
        let url = std::env::var("REDIS_URL").ok().filter(|u| !u.is_empty())?;
        Some(Self {
            url,
            connect_timeout: Duration::from_secs(
                std::env::var("REDIS_CONNECT_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5),
            ),
        })
    }
}

/// `SET key token NX EX ttl` lock with compare-and-delete release.
pub struct RedisGenerationLock {
    conn: ConnectionManager,
    /// Deletes KEYS[1] only while it still holds ARGV[1].
    release_script: Script,
}

impl RedisGenerationLock {
    pub async fn new(config: RedisConfig) -> Result<Self, LockError> {
        let client =
            Client::open(config.url.as_str()).map_err(|e| LockError::Backend(e.to_string()))?;

        let conn = tokio::time::timeout(config.connect_timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| LockError::Backend("Connection timed out".to_string()))?
            .map_err(|e| LockError::Backend(e.to_string()))?;

        tracing::info!(url = %config.url, "Connected to Redis for generation lock");

        let release_script = Script::new(
            r#"
            if redis.call('GET', KEYS[1]) == ARGV[1] then
                return redis.call('DEL', KEYS[1])
            end
            return 0
            "#,
        );

        Ok(Self {
            conn,
            release_script,
        })
    }
}

#[async_trait]
impl GenerationLock for RedisGenerationLock {
    async fn try_acquire(&self, key: &str, ttl: Duration) -> Result<Option<LockToken>, LockError> {
        let mut conn = self.conn.clone();
        let token = LockToken::generate();
        // Replies OK when set, nil when the key already exists.
        let reply: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(token.as_str())
            .arg("NX")
            .arg("EX")
            .arg(ttl.as_secs().max(1))
            .query_async(&mut conn)
            .await
            .map_err(|e| LockError::Backend(e.to_string()))?;

        Ok(reply.map(|_| token))
    }

    async fn release(&self, key: &str, token: &LockToken) -> Result<bool, LockError> {
        let mut conn = self.conn.clone();
        let deleted: i64 = self
            .release_script
            .key(key)
            .arg(token.as_str())
            .invoke_async(&mut conn)
            .await
            .map_err(|e| LockError::Backend(e.to_string()))?;
        Ok(deleted == 1)
    }
}
