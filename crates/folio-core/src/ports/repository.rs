use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{NewPost, Post};
use crate::error::RepoError;

/// Post storage. Only published posts are ever visible through reads.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Persist a new post, assigning its id and timestamps.
    async fn insert(&self, post: NewPost) -> Result<Post, RepoError>;

    /// Published posts, newest first.
    async fn list(&self, limit: u64, offset: u64) -> Result<Vec<Post>, RepoError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError>;

    /// The most recent published post, same as `list(1, 0)[0]`.
    async fn latest(&self) -> Result<Option<Post>, RepoError> {
        Ok(self.list(1, 0).await?.into_iter().next())
    }
}
