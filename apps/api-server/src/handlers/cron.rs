//! Scheduled generation trigger.

use actix_web::{HttpResponse, web};
use chrono::Utc;

use folio_core::ScheduledOutcome;
use folio_shared::dto::{PostSummary, ScheduledGenerationResponse};

use crate::middleware::cron_auth::CronCaller;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Map a pipeline outcome onto the cron response body.
fn outcome_response(outcome: &ScheduledOutcome) -> ScheduledGenerationResponse {
    match outcome {
        ScheduledOutcome::Skipped {
            days_since_last_post,
        } => ScheduledGenerationResponse {
            success: true,
            message: "Content already generated recently, skipping...".to_string(),
            days_since_last_post: Some(days_since_last_post.round() as i64),
            post: None,
        },
        ScheduledOutcome::AlreadyRunning => ScheduledGenerationResponse {
            success: true,
            message: "Generation already in progress, skipping...".to_string(),
            days_since_last_post: None,
            post: None,
        },
        ScheduledOutcome::Generated(post) => ScheduledGenerationResponse {
            success: true,
            message: "Content generated successfully".to_string(),
            days_since_last_post: None,
            post: Some(PostSummary {
                id: post.id,
                title: post.title.clone(),
                post_type: post.post_type.as_str().to_string(),
                topic: post.topic.clone(),
            }),
        },
    }
}

/// GET /api/cron/generate-content
pub async fn generate_content(
    _caller: CronCaller,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let generator = state.generator.as_ref().ok_or_else(|| {
        AppError::ServiceUnavailable("Content generation is not configured".to_string())
    })?;

    let outcome = generator.run_scheduled(Utc::now()).await?;
    Ok(HttpResponse::Ok().json(outcome_response(&outcome)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skipped_days_are_rounded() {
        for (days, expected) in [(1.4, 1), (1.5, 2), (0.2, 0)] {
            let body = outcome_response(&ScheduledOutcome::Skipped {
                days_since_last_post: days,
            });
            assert_eq!(body.days_since_last_post, Some(expected), "days = {days}");
        }
    }
}
