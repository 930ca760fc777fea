//! Content-generation policy and the pipeline that applies it.
//!
//! Selection, prompting, reply decoding and the recency guard are pure and
//! live in their own modules; [`ContentGenerator`] wires them to the ports.

mod generator;
pub mod prompt;
pub mod recency;
pub mod reply;
pub mod selection;
mod settings;

pub use generator::{ContentGenerator, GENERATION_LOCK_KEY, GenerationRequest, ScheduledOutcome};
pub use prompt::{Prompt, PromptBuilder};
pub use recency::{days_since, should_skip_generation};
pub use reply::{GeneratedContent, normalize, parse_reply};
pub use selection::{TopicTable, TopicWeight, choose_type, pick_topic};
pub use settings::{DEFAULT_TOPIC_WEIGHTS, GenerationSettings};
