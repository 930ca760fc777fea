//! Data Transfer Objects - request/response types for the API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Headline figure attached to a case study.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsDto {
    pub percentage: f64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceDto {
    pub title: String,
    pub url: String,
}

/// A published post as served by the read API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    #[serde(rename = "type")]
    pub post_type: String,
    pub topic: String,
    pub metrics: Option<MetricsDto>,
    pub sources: Vec<SourceDto>,
    pub case_study_link: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostListResponse {
    pub posts: Vec<PostResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostEnvelope {
    pub post: PostResponse,
}

/// Query string of `GET /api/blog`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListPostsQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub id: Option<String>,
}

/// Body of `POST /api/blog/generate`. Both fields are optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratePostRequest {
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default, rename = "type")]
    pub post_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratePostResponse {
    pub success: bool,
    pub post: PostResponse,
}

/// Short form of a post in the cron response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostSummary {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub post_type: String,
    pub topic: String,
}

/// Result of `GET /api/cron/generate-content`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledGenerationResponse {
    pub success: bool,
    pub message: String,
    /// Whole days, rounded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_since_last_post: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post: Option<PostSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactResponse {
    pub success: bool,
    pub message: String,
    pub email_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadResponse {
    pub success: bool,
    pub message: String,
    pub lead_notification_id: String,
    pub welcome_email_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
}
