//! PostgreSQL post repository.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, DbErr, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Select, SqlErr,
};
use uuid::Uuid;

use folio_core::domain::{NewPost, Post};
use folio_core::error::RepoError;
use folio_core::ports::PostRepository;

use super::entity::post::{self, Entity as PostEntity, to_active_model};

/// PostgreSQL-backed [`PostRepository`].
pub struct PostgresPostRepository {
    db: DbConn,
}

impl PostgresPostRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

fn map_db_err(err: DbErr) -> RepoError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(msg))
        | Some(SqlErr::ForeignKeyConstraintViolation(msg)) => return RepoError::Constraint(msg),
        _ => {}
    }
    match err {
        DbErr::Conn(e) => RepoError::Connection(e.to_string()),
        DbErr::ConnectionAcquire(e) => RepoError::Connection(e.to_string()),
        other => {
            let msg = other.to_string();
            if msg.contains("violates check constraint") {
                RepoError::Constraint(msg)
            } else {
                RepoError::Query(msg)
            }
        }
    }
}

/// Published posts, newest first; equal timestamps fall back to insertion
/// order so paging is deterministic.
pub(crate) fn list_query(limit: u64, offset: u64) -> Select<PostEntity> {
    PostEntity::find()
        .filter(post::Column::Published.eq(true))
        .order_by_desc(post::Column::CreatedAt)
        .order_by_desc(post::Column::Seq)
        .limit(limit)
        .offset(offset)
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn insert(&self, post: NewPost) -> Result<Post, RepoError> {
        let post = post.into_post(Uuid::new_v4(), Utc::now());
        tracing::debug!(post_id = %post.id, post_type = %post.post_type, "Inserting post");

        let model = to_active_model(post)?
            .insert(&self.db)
            .await
            .map_err(map_db_err)?;

        Post::try_from(model)
    }

    async fn list(&self, limit: u64, offset: u64) -> Result<Vec<Post>, RepoError> {
        list_query(limit, offset)
            .all(&self.db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(Post::try_from)
            .collect()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        PostEntity::find_by_id(id)
            .filter(post::Column::Published.eq(true))
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .map(Post::try_from)
            .transpose()
    }
}
