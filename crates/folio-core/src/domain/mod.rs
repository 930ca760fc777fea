//! Domain entities - the core business objects.

mod contact;
mod post;

pub use contact::{
    Budget, ContactMessage, LeadPriority, LeadSubmission, ProjectType, Timeline, is_valid_email,
};
pub use post::{Metrics, NewPost, Post, PostType, Source};
