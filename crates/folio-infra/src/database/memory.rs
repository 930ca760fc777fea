//! In-memory post repository - used when no database is configured.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use folio_core::domain::{NewPost, Post};
use folio_core::error::RepoError;
use folio_core::ports::PostRepository;

/// Posts kept in insertion order behind an async RwLock.
///
/// Listing sorts stably by `created_at` descending, so posts sharing a
/// timestamp keep their insertion order.
/// Note: Data is lost on process restart.
#[derive(Default)]
pub struct InMemoryPostRepository {
    posts: RwLock<Vec<Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from existing records, kept exactly as given.
    pub fn with_posts(posts: Vec<Post>) -> Self {
        Self {
            posts: RwLock::new(posts),
        }
    }

    pub async fn len(&self) -> usize {
        self.posts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.posts.read().await.is_empty()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn insert(&self, post: NewPost) -> Result<Post, RepoError> {
        let post = post.into_post(Uuid::new_v4(), Utc::now());
        self.posts.write().await.push(post.clone());
        tracing::debug!(post_id = %post.id, "Post stored in memory");
        Ok(post)
    }

    async fn list(&self, limit: u64, offset: u64) -> Result<Vec<Post>, RepoError> {
        let mut published: Vec<Post> = self
            .posts
            .read()
            .await
            .iter()
            .filter(|p| p.published)
            .cloned()
            .collect();
        published.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(published
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self
            .posts
            .read()
            .await
            .iter()
            .find(|p| p.id == id && p.published)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration};
    use folio_core::domain::{Metrics, PostType, Source};

    fn new_post(title: &str) -> NewPost {
        NewPost {
            title: title.into(),
            content: "Body".into(),
            excerpt: "Short".into(),
            post_type: PostType::CaseStudy,
            topic: "Microservices".into(),
            metrics: Some(Metrics {
                percentage: 42.0,
                description: "less coupling".into(),
            }),
            sources: vec![Source {
                title: "Building Microservices".into(),
                url: "https://samnewman.io".into(),
            }],
            case_study_link: Some("https://martinfowler.com".into()),
        }
    }

    fn stored(title: &str, created_at: DateTime<Utc>, published: bool) -> Post {
        let mut post = new_post(title).into_post(Uuid::new_v4(), created_at);
        post.published = published;
        post
    }

    #[tokio::test]
    async fn test_insert_then_find_round_trip() {
        let repo = InMemoryPostRepository::new();
        let input = new_post("Strangler fig in practice");

        let inserted = repo.insert(input.clone()).await.unwrap();
        let fetched = repo.find_by_id(inserted.id).await.unwrap().unwrap();

        assert_eq!(fetched, inserted);
        assert_eq!(fetched.title, input.title);
        assert_eq!(fetched.content, input.content);
        assert_eq!(fetched.excerpt, input.excerpt);
        assert_eq!(fetched.post_type, input.post_type);
        assert_eq!(fetched.topic, input.topic);
        assert_eq!(fetched.metrics, input.metrics);
        assert_eq!(fetched.sources, input.sources);
        assert_eq!(fetched.case_study_link, input.case_study_link);
        assert!(fetched.published);
    }

    #[tokio::test]
    async fn test_list_newest_first_with_paging() {
        let now = Utc::now();
        let repo = InMemoryPostRepository::with_posts(vec![
            stored("oldest", now - Duration::days(3), true),
            stored("newest", now, true),
            stored("middle", now - Duration::days(1), true),
        ]);

        let titles: Vec<String> = repo
            .list(10, 0)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, ["newest", "middle", "oldest"]);

        let page: Vec<String> = repo
            .list(1, 1)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(page, ["middle"]);
    }

    #[tokio::test]
    async fn test_equal_timestamps_keep_insertion_order() {
        let now = Utc::now();
        let repo = InMemoryPostRepository::with_posts(vec![
            stored("first", now, true),
            stored("second", now, true),
        ]);

        let titles: Vec<String> = repo
            .list(10, 0)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, ["first", "second"]);
        assert_eq!(repo.latest().await.unwrap().unwrap().title, "first");
    }

    #[tokio::test]
    async fn test_unpublished_posts_are_invisible() {
        let now = Utc::now();
        let hidden = stored("draft", now, false);
        let hidden_id = hidden.id;
        let repo = InMemoryPostRepository::with_posts(vec![
            hidden,
            stored("live", now - Duration::hours(1), true),
        ]);

        assert!(repo.find_by_id(hidden_id).await.unwrap().is_none());
        assert_eq!(repo.latest().await.unwrap().unwrap().title, "live");
        assert_eq!(repo.list(10, 0).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_latest_on_empty_store() {
        let repo = InMemoryPostRepository::new();
        assert!(repo.latest().await.unwrap().is_none());
        assert!(repo.is_empty().await);
    }
}
