//! Completion API port.

use async_trait::async_trait;

use crate::error::GenerationError;

/// A single chat-completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
    pub temperature: f32,
    /// Ask the backend to constrain output to a JSON object.
    pub json_response: bool,
}

/// Language-model completion backend.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Return the raw text of the first choice.
    async fn complete(&self, request: CompletionRequest) -> Result<String, GenerationError>;
}
