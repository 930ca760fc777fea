//! Blog post entity for SeaORM.

use sea_orm::{NotSet, Set};
use sea_orm::entity::prelude::*;

use folio_core::domain::{Metrics, Post, PostType, Source};
use folio_core::error::RepoError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "blog_posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    #[sea_orm(column_type = "Text")]
    pub excerpt: String,
    #[sea_orm(column_name = "type")]
    pub post_type: String,
    pub topic: String,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub metrics: Option<Json>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub sources: Option<Json>,
    #[sea_orm(nullable)]
    pub case_study_link: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
    pub published: bool,
    /// Database-assigned insertion counter; breaks `created_at` ties.
    pub seq: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Rows are decoded strictly: an unknown `type` or mis-shaped JSON column is
/// reported rather than silently dropped.
impl TryFrom<Model> for Post {
    type Error = RepoError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let post_type: PostType = model
            .post_type
            .parse()
            .map_err(|e: String| RepoError::Query(format!("post {}: {}", model.id, e)))?;

        let metrics = model
            .metrics
            .filter(|v| !v.is_null())
            .map(serde_json::from_value::<Metrics>)
            .transpose()
            .map_err(|e| RepoError::Query(format!("post {}: bad metrics: {}", model.id, e)))?;

        let sources = model
            .sources
            .filter(|v| !v.is_null())
            .map(serde_json::from_value::<Vec<Source>>)
            .transpose()
            .map_err(|e| RepoError::Query(format!("post {}: bad sources: {}", model.id, e)))?
            .unwrap_or_default();

        Ok(Post {
            id: model.id,
            title: model.title,
            content: model.content,
            excerpt: model.excerpt,
            post_type,
            topic: model.topic,
            metrics,
            sources,
            case_study_link: model.case_study_link,
            published: model.published,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        })
    }
}

/// Conversion from a domain Post to a SeaORM ActiveModel for insertion.
pub fn to_active_model(post: Post) -> Result<ActiveModel, RepoError> {
    let metrics = post
        .metrics
        .as_ref()
        .map(serde_json::to_value)
        .transpose()
        .map_err(|e| RepoError::Query(e.to_string()))?;
    let sources = serde_json::to_value(&post.sources).map_err(|e| RepoError::Query(e.to_string()))?;

    Ok(ActiveModel {
        id: Set(post.id),
        title: Set(post.title),
        content: Set(post.content),
        excerpt: Set(post.excerpt),
        post_type: Set(post.post_type.as_str().to_string()),
        topic: Set(post.topic),
        metrics: Set(metrics),
        sources: Set(Some(sources)),
        case_study_link: Set(post.case_study_link),
        created_at: Set(post.created_at.into()),
        updated_at: Set(post.updated_at.into()),
        published: Set(post.published),
        seq: NotSet,
    })
}
