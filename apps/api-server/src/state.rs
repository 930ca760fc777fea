//! Application state - shared across all handlers.

use std::sync::Arc;

use folio_core::ContentGenerator;
use folio_core::ports::{CompletionClient, GenerationLock, Mailer, PostRepository, RateLimiter};
use folio_infra::{InMemoryGenerationLock, InMemoryPostRepository, OpenAiClient, ResendMailer};

#[cfg(feature = "postgres")]
use folio_infra::PostgresPostRepository;
#[cfg(feature = "rate-limit")]
use folio_infra::InMemoryRateLimiter;
#[cfg(feature = "redis")]
use folio_infra::RedisGenerationLock;

use crate::config::AppConfig;
use crate::mail::Outbox;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostRepository>,
    /// Absent when no completion API key is configured.
    pub generator: Option<Arc<ContentGenerator>>,
    /// Absent when mail is not configured.
    pub outbox: Option<Outbox>,
    pub cron_secret: Option<Arc<str>>,
    pub rate_limiter: Option<Arc<dyn RateLimiter>>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    ///
    /// Unreachable optional backends degrade to in-memory stand-ins with a
    /// logged warning rather than aborting startup.
    pub async fn new(config: &AppConfig) -> Self {
        let posts = Self::post_repository(config).await;

        let generator = match &config.openai {
            Some(openai) => match OpenAiClient::new(openai.clone()) {
                Ok(client) => {
                    let completion: Arc<dyn CompletionClient> = Arc::new(client);
                    let generator = ContentGenerator::new(
                        completion,
                        posts.clone(),
                        config.generation.clone(),
                    )
                    .with_lock(Self::generation_lock(config).await);
                    Some(Arc::new(generator))
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to build completion client");
                    None
                }
            },
            None => {
                tracing::warn!("OPENAI_API_KEY not set. Content generation disabled.");
                None
            }
        };

        let outbox = match &config.mail {
            Some(mail) => match ResendMailer::new(mail.resend.clone()) {
                Ok(mailer) => {
                    let mailer: Arc<dyn Mailer> = Arc::new(mailer);
                    Some(Outbox::new(mailer, mail.from.clone(), mail.owner.clone()))
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to build mail client");
                    None
                }
            },
            None => {
                tracing::warn!("RESEND_API_KEY not set. Contact and lead endpoints disabled.");
                None
            }
        };

        if config.cron_secret.is_none() {
            tracing::warn!("CRON_SECRET not set. Cron endpoint will reject every caller.");
        }

        #[cfg(feature = "rate-limit")]
        let rate_limiter: Option<Arc<dyn RateLimiter>> =
            Some(Arc::new(InMemoryRateLimiter::new(config.rate_limit.clone())));

        #[cfg(not(feature = "rate-limit"))]
        let rate_limiter: Option<Arc<dyn RateLimiter>> = None;

        tracing::info!(
            generation = generator.is_some(),
            mail = outbox.is_some(),
            rate_limit = rate_limiter.is_some(),
            "Application state initialized"
        );

        Self {
            posts,
            generator,
            outbox,
            cron_secret: config.cron_secret.as_deref().map(Arc::from),
            rate_limiter,
        }
    }

    #[cfg(feature = "postgres")]
    async fn post_repository(config: &AppConfig) -> Arc<dyn PostRepository> {
        let Some(db_config) = &config.database else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Arc::new(InMemoryPostRepository::new());
        };

        match folio_infra::database::connect(db_config).await {
            Ok(conn) => Arc::new(PostgresPostRepository::new(conn)),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    "Failed to connect to database. Using in-memory fallback."
                );
                Arc::new(InMemoryPostRepository::new())
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn post_repository(_config: &AppConfig) -> Arc<dyn PostRepository> {
        tracing::info!("Running without postgres feature - using in-memory repository");
        Arc::new(InMemoryPostRepository::new())
    }

    #[cfg(feature = "redis")]
    async fn generation_lock(config: &AppConfig) -> Arc<dyn GenerationLock> {
        if let Some(redis) = &config.redis {
            match RedisGenerationLock::new(redis.clone()).await {
                Ok(lock) => return Arc::new(lock),
                Err(e) => tracing::warn!(
                    error = %e,
                    "Redis unavailable. Generation lock is process-local."
                ),
            }
        }
        Arc::new(InMemoryGenerationLock::new())
    }

    #[cfg(not(feature = "redis"))]
    async fn generation_lock(_config: &AppConfig) -> Arc<dyn GenerationLock> {
        Arc::new(InMemoryGenerationLock::new())
    }
}
