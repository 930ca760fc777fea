//! Middleware modules.

pub mod cron_auth;
pub mod error;
pub mod rate_limit;
