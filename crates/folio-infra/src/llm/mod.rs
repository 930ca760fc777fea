//! Completion API clients.

mod openai;

pub use openai::{OpenAiClient, OpenAiConfig};
