//! Cron-style job scheduler using tokio-cron-scheduler.

use std::sync::Arc;

use chrono::Utc;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use folio_core::{ContentGenerator, ScheduledOutcome};

/// Scheduler configuration.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub enabled: bool,
    /// Six-field cron expression (seconds first) for scheduled generation.
    pub generation_cron: String,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            generation_cron: "0 0 9 * * *".to_string(),
        }
    }
}

impl SchedulerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            enabled: std::env::var("SCHEDULER_ENABLED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(defaults.enabled),
            generation_cron: std::env::var("GENERATION_CRON")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.generation_cron),
        }
    }
}

/// Cron job scheduler wrapper.
pub struct Scheduler {
    inner: JobScheduler,
    config: SchedulerConfig,
}

impl Scheduler {
    pub async fn new(config: SchedulerConfig) -> Result<Self, JobSchedulerError> {
        let inner = JobScheduler::new().await?;
        Ok(Self { inner, config })
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Add a cron job.
    pub async fn add_cron<F, Fut>(
        &self,
        schedule: &str,
        task: F,
    ) -> Result<uuid::Uuid, JobSchedulerError>
    where
        F: Fn() -> Fut + Send + Sync + Clone + 'static,
        Fut: std::future::Future<Output = ()> + Send + 'static,
    {
        let job = Job::new_async(schedule, move |_uuid, _lock| {
            let task = task.clone();
            Box::pin(async move {
                task().await;
            })
        })?;

        let id = self.inner.add(job).await?;
        tracing::info!(schedule = %schedule, job_id = %id, "Cron job registered");
        Ok(id)
    }

    /// Start the scheduler. A disabled scheduler never fires its jobs.
    pub async fn start(&self) -> Result<(), JobSchedulerError> {
        if !self.config.enabled {
            tracing::info!("Scheduler disabled");
            return Ok(());
        }

        self.inner.start().await?;
        tracing::info!("Scheduler started");
        Ok(())
    }

    pub async fn shutdown(&mut self) -> Result<(), JobSchedulerError> {
        self.inner.shutdown().await?;
        tracing::info!("Scheduler stopped");
        Ok(())
    }
}

/// Register the scheduled generation run, the in-process twin of the cron
/// HTTP trigger.
pub async fn schedule_generation(
    scheduler: &Scheduler,
    generator: Arc<ContentGenerator>,
) -> Result<uuid::Uuid, JobSchedulerError> {
    let schedule = scheduler.config().generation_cron.clone();
    scheduler
        .add_cron(&schedule, move || {
            let generator = generator.clone();
            async move {
                match generator.run_scheduled(Utc::now()).await {
                    Ok(ScheduledOutcome::Generated(post)) => {
                        tracing::info!(post_id = %post.id, title = %post.title, "Scheduled post generated");
                    }
                    Ok(ScheduledOutcome::Skipped {
                        days_since_last_post,
                    }) => {
                        tracing::info!(days_since_last_post, "Scheduled generation skipped");
                    }
                    Ok(ScheduledOutcome::AlreadyRunning) => {
                        tracing::info!("Scheduled generation skipped: already running");
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Scheduled generation failed");
                    }
                }
            }
        })
        .await
}
