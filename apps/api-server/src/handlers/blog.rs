//! Post read endpoints and manual generation.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use folio_core::GenerationRequest;
use folio_core::domain::{Post, PostType};
use folio_shared::dto::{
    GeneratePostRequest, GeneratePostResponse, ListPostsQuery, MetricsDto, PostEnvelope,
    PostListResponse, PostResponse, SourceDto,
};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const DEFAULT_LIMIT: i64 = 10;
const MAX_LIMIT: i64 = 50;

pub fn post_response(post: &Post) -> PostResponse {
    PostResponse {
        id: post.id,
        title: post.title.clone(),
        content: post.content.clone(),
        excerpt: post.excerpt.clone(),
        post_type: post.post_type.as_str().to_string(),
        topic: post.topic.clone(),
        metrics: post.metrics.as_ref().map(|m| MetricsDto {
            percentage: m.percentage,
            description: m.description.clone(),
        }),
        sources: post
            .sources
            .iter()
            .map(|s| SourceDto {
                title: s.title.clone(),
                url: s.url.clone(),
            })
            .collect(),
        case_study_link: post.case_study_link.clone(),
        created_at: post.created_at,
        updated_at: post.updated_at,
        published: post.published,
    }
}

fn parse_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::BadRequest("Invalid post id".to_string()))
}

async fn find_post(state: &AppState, id: Uuid) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".to_string()))?;

    Ok(HttpResponse::Ok().json(PostEnvelope {
        post: post_response(&post),
    }))
}

/// GET /api/blog?limit=&offset= or GET /api/blog?id=
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<ListPostsQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();

    if let Some(id) = query.id.as_deref() {
        return find_post(&state, parse_id(id)?).await;
    }

    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT) as u64;
    let offset = match query.offset.unwrap_or(0) {
        o if o < 0 => {
            return Err(AppError::BadRequest("offset must be 0 or more".to_string()));
        }
        o => o as u64,
    };

    let posts = state.posts.list(limit, offset).await?;
    Ok(HttpResponse::Ok().json(PostListResponse {
        posts: posts.iter().map(post_response).collect(),
    }))
}

/// GET /api/blog/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    find_post(&state, parse_id(&path)?).await
}

/// POST /api/blog/generate
pub async fn generate_post(
    state: web::Data<AppState>,
    body: Option<web::Json<GeneratePostRequest>>,
) -> AppResult<HttpResponse> {
    let generator = state.generator.as_ref().ok_or_else(|| {
        AppError::ServiceUnavailable("Content generation is not configured".to_string())
    })?;

    let body = body.map(web::Json::into_inner).unwrap_or_default();

    let post_type = body
        .post_type
        .as_deref()
        .map(str::parse::<PostType>)
        .transpose()
        .map_err(AppError::BadRequest)?;

    let topic = body
        .topic
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    let post = generator
        .generate(GenerationRequest { topic, post_type })
        .await?;

    Ok(HttpResponse::Ok().json(GeneratePostResponse {
        success: true,
        post: post_response(&post),
    }))
}
