//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod completion;
mod lock;
mod mailer;
mod rate_limit;
mod repository;

pub use completion::{CompletionClient, CompletionRequest};
pub use lock::{GenerationLock, LockToken};
pub use mailer::{EmailMessage, MailError, Mailer};
pub use rate_limit::{RateLimitError, RateLimitResult, RateLimiter};
pub use repository::PostRepository;
