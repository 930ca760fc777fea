//! Generation lock implementations.

mod memory;

pub use memory::InMemoryGenerationLock;

#[cfg(feature = "redis")]
mod redis;
#[cfg(feature = "redis")]
pub use self::redis::{RedisConfig, RedisGenerationLock};
