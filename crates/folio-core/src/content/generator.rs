//! The generation pipeline: select, prompt, complete, decode, persist.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::domain::{Post, PostType};
use crate::error::PipelineError;
use crate::ports::{CompletionClient, CompletionRequest, GenerationLock, PostRepository};

use super::prompt::PromptBuilder;
use super::recency::{days_since, should_skip_generation};
use super::reply::{normalize, parse_reply};
use super::selection::choose_type;
use super::settings::GenerationSettings;

/// Key under which scheduled runs serialize when a lock is configured.
pub const GENERATION_LOCK_KEY: &str = "folio:generation-in-progress";

/// Caller overrides; anything left `None` is chosen at random.
#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    pub topic: Option<String>,
    pub post_type: Option<PostType>,
}

/// What a scheduled run did.
#[derive(Debug, Clone, PartialEq)]
pub enum ScheduledOutcome {
    /// The newest post is still within the recency threshold.
    Skipped { days_since_last_post: f64 },
    /// Another run holds the generation lock.
    AlreadyRunning,
    Generated(Post),
}

/// Runs one generation per call. Holds no mutable state between calls.
pub struct ContentGenerator {
    completion: Arc<dyn CompletionClient>,
    posts: Arc<dyn PostRepository>,
    lock: Option<Arc<dyn GenerationLock>>,
    settings: GenerationSettings,
}

impl ContentGenerator {
    pub fn new(
        completion: Arc<dyn CompletionClient>,
        posts: Arc<dyn PostRepository>,
        settings: GenerationSettings,
    ) -> Self {
        Self {
            completion,
            posts,
            lock: None,
            settings,
        }
    }

    /// Serialize scheduled runs through an advisory lock.
    pub fn with_lock(mut self, lock: Arc<dyn GenerationLock>) -> Self {
        self.lock = Some(lock);
        self
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    fn select(&self, request: GenerationRequest) -> (String, PostType) {
        let mut rng = rand::thread_rng();
        let topic = request
            .topic
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| self.settings.topics.pick(&mut rng).to_string());
        let post_type = request
            .post_type
            .unwrap_or_else(|| choose_type(self.settings.case_study_probability, &mut rng));
        (topic, post_type)
    }

    /// Generate and persist one post. Nothing is written unless every step
    /// succeeds.
    pub async fn generate(&self, request: GenerationRequest) -> Result<Post, PipelineError> {
        let (topic, post_type) = self.select(request);
        tracing::info!(topic = %topic, post_type = %post_type, "Generating post");

        let recent_titles: Vec<String> = self
            .posts
            .list(self.settings.recent_titles_limit as u64, 0)
            .await?
            .into_iter()
            .map(|p| p.title)
            .collect();

        let prompt = PromptBuilder::new(&self.settings).build(&topic, post_type, &recent_titles);
        tracing::debug!(
            recent_titles = recent_titles.len(),
            system_len = prompt.system.len(),
            user_len = prompt.user.len(),
            "Prompt assembled"
        );

        let raw = self
            .completion
            .complete(CompletionRequest {
                model: self.settings.model.clone(),
                system: prompt.system,
                user: prompt.user,
                max_tokens: self.settings.max_tokens(post_type),
                temperature: self.settings.temperature,
                json_response: true,
            })
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "Completion call failed"))?;

        let content = parse_reply(&raw)
            .inspect_err(|e| tracing::warn!(error = %e, "Completion reply rejected"))?;
        let content = normalize(content, post_type, &self.settings.fallback_case_study_link);

        let post = self
            .posts
            .insert(content.into_new_post(topic, post_type))
            .await?;

        tracing::info!(
            post_id = %post.id,
            title = %post.title,
            post_type = %post.post_type,
            "Post generated"
        );
        Ok(post)
    }

    /// Entry point for recurring triggers: honours the lock and the recency
    /// guard, then generates with random topic and type.
    pub async fn run_scheduled(&self, now: DateTime<Utc>) -> Result<ScheduledOutcome, PipelineError> {
        let Some(lock) = &self.lock else {
            return self.guarded_generate(now).await;
        };

        let Some(token) = lock
            .try_acquire(GENERATION_LOCK_KEY, self.settings.lock_ttl)
            .await?
        else {
            tracing::info!("Generation already in progress, skipping");
            return Ok(ScheduledOutcome::AlreadyRunning);
        };

        let outcome = self.guarded_generate(now).await;

        match lock.release(GENERATION_LOCK_KEY, &token).await {
            Ok(true) => {}
            Ok(false) => tracing::warn!(
                token = %token,
                "Generation lock expired before release; run outlived lock_ttl"
            ),
            Err(e) => tracing::warn!(error = %e, "Failed to release generation lock"),
        }
        outcome
    }

    async fn guarded_generate(&self, now: DateTime<Utc>) -> Result<ScheduledOutcome, PipelineError> {
        let latest = self.posts.latest().await?;

        if should_skip_generation(latest.as_ref(), now, self.settings.recency_threshold_days) {
            let days_since_last_post = latest.as_ref().map(|p| days_since(p, now)).unwrap_or(0.0);
            tracing::info!(
                days_since_last_post,
                threshold_days = self.settings.recency_threshold_days,
                "Recent post exists, skipping generation"
            );
            return Ok(ScheduledOutcome::Skipped {
                days_since_last_post,
            });
        }

        let post = self.generate(GenerationRequest::default()).await?;
        Ok(ScheduledOutcome::Generated(post))
    }
}
