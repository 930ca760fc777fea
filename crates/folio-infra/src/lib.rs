//! # Folio Infrastructure
//!
//! Concrete implementations of the ports defined in `folio-core`:
//! post storage, the completion API, outbound mail, the generation lock and
//! rate limiting.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external services, in-memory only
//! - `postgres` - PostgreSQL post storage via SeaORM
//! - `rate-limit` - Rate limiting via governor
//! - `redis` - Redis-backed generation lock

pub mod database;
pub mod llm;
pub mod lock;
pub mod mail;

#[cfg(feature = "rate-limit")]
pub mod rate_limit;

// Re-exports - always available
pub use database::{DatabaseConfig, InMemoryPostRepository};
pub use llm::{OpenAiClient, OpenAiConfig};
pub use lock::InMemoryGenerationLock;
pub use mail::{ResendConfig, ResendMailer};

#[cfg(feature = "postgres")]
pub use database::PostgresPostRepository;

#[cfg(feature = "rate-limit")]
pub use rate_limit::{InMemoryRateLimiter, RateLimitConfig};

#[cfg(feature = "redis")]
pub use lock::{RedisConfig, RedisGenerationLock};
