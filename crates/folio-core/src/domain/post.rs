use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Content variant of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PostType {
    #[serde(rename = "blog")]
    Blog,
    #[serde(rename = "case-study")]
    CaseStudy,
}

impl PostType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostType::Blog => "blog",
            PostType::CaseStudy => "case-study",
        }
    }
}

impl fmt::Display for PostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "blog" => Ok(PostType::Blog),
            "case-study" => Ok(PostType::CaseStudy),
            other => Err(format!("unknown post type '{}'", other)),
        }
    }
}

/// Headline figure attached to a case study.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub percentage: f64,
    pub description: String,
}

/// A cited reference, in the order the generator ranked it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub url: String,
}

/// A persisted post. Write-once: nothing in this crate updates one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub post_type: PostType,
    pub topic: String,
    pub metrics: Option<Metrics>,
    pub sources: Vec<Source>,
    pub case_study_link: Option<String>,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert payload. Identity and timestamps are assigned by the repository.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub post_type: PostType,
    pub topic: String,
    pub metrics: Option<Metrics>,
    pub sources: Vec<Source>,
    pub case_study_link: Option<String>,
}

impl NewPost {
    /// Materialize the stored record. Always published.
    pub fn into_post(self, id: Uuid, now: DateTime<Utc>) -> Post {
        Post {
            id,
            title: self.title,
            content: self.content,
            excerpt: self.excerpt,
            post_type: self.post_type,
            topic: self.topic,
            metrics: self.metrics,
            sources: self.sources,
            case_study_link: self.case_study_link,
            published: true,
            created_at: now,
            updated_at: now,
        }
    }
}
