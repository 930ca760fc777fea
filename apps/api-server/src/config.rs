//! Application configuration loaded from environment variables.
//!
//! Everything is resolved once at startup; handlers never read the
//! environment.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use folio_core::GenerationSettings;
use folio_infra::{DatabaseConfig, OpenAiConfig, ResendConfig};

#[cfg(feature = "rate-limit")]
use folio_infra::RateLimitConfig;
#[cfg(feature = "redis")]
use folio_infra::RedisConfig;

#[cfg(feature = "scheduler")]
use crate::background::SchedulerConfig;
use crate::telemetry::TelemetryConfig;

/// Outbound mail addresses plus the provider configuration.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub resend: ResendConfig,
    pub from: String,
    /// Site owner's inbox for contact and lead notifications.
    pub owner: String,
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    /// `None` when `OPENAI_API_KEY` is unset; generation is then unavailable.
    pub openai: Option<OpenAiConfig>,
    pub generation: GenerationSettings,
    /// `None` when `CRON_SECRET` is unset; the cron endpoint then rejects all callers.
    pub cron_secret: Option<String>,
    pub mail: Option<MailConfig>,
    #[cfg(feature = "redis")]
    pub redis: Option<RedisConfig>,
    #[cfg(feature = "rate-limit")]
    pub rate_limit: RateLimitConfig,
    #[cfg(feature = "scheduler")]
    pub scheduler: SchedulerConfig,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = non_empty("DATABASE_URL").map(|url| {
            let mut config = DatabaseConfig::new(url);
            config.max_connections = parse_or("DB_MAX_CONNECTIONS", config.max_connections);
            config.min_connections = parse_or("DB_MIN_CONNECTIONS", config.min_connections);
            config
        });

        let openai = non_empty("OPENAI_API_KEY").map(|key| {
            let config = OpenAiConfig::new(key);
            match non_empty("OPENAI_BASE_URL") {
                Some(base) => config.with_base_url(base),
                None => config,
            }
        });

        let defaults = GenerationSettings::default();
        let generation = GenerationSettings {
            model: non_empty("OPENAI_MODEL").unwrap_or(defaults.model.clone()),
            lock_ttl: Duration::from_secs(parse_or(
                "GENERATION_LOCK_TTL_SECS",
                defaults.lock_ttl.as_secs(),
            )),
            ..defaults
        };

        let mail = non_empty("RESEND_API_KEY").map(|key| MailConfig {
            resend: ResendConfig::new(key),
            from: non_empty("MAIL_FROM")
                .unwrap_or_else(|| "Portfolio <onboarding@resend.dev>".to_string()),
            owner: non_empty("MAIL_TO")
                .or_else(|| non_empty("TO_EMAIL"))
                .unwrap_or_else(|| "owner@example.com".to_string()),
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_or("PORT", 8080),
            database,
            openai,
            generation,
            cron_secret: non_empty("CRON_SECRET"),
            mail,
            #[cfg(feature = "redis")]
            redis: RedisConfig::from_env(),
            #[cfg(feature = "rate-limit")]
            rate_limit: RateLimitConfig::from_env(),
            #[cfg(feature = "scheduler")]
            scheduler: SchedulerConfig::from_env(),
            telemetry: TelemetryConfig::from_env(),
        }
    }
}

fn non_empty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}
