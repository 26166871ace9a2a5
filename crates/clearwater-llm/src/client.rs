//! Client traits at the vendor boundary

use crate::error::LlmResult;
use crate::message::{ChatMessage, ChatResponse};
use async_trait::async_trait;

/// Chat completion against a hosted model
///
/// Implementations are remote, slow and fallible; callers own timeouts.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generate a response for the given conversation
    async fn chat_completion(&self, messages: Vec<ChatMessage>) -> LlmResult<ChatResponse>;

    /// Name of the chat model in use
    fn model_name(&self) -> &str;
}

/// Text embedding against a hosted model
#[async_trait]
pub trait EmbeddingClient: Send + Sync {
    /// Embed a single text into a dense vector
    async fn embed(&self, text: &str) -> LlmResult<Vec<f32>>;

    /// Name of the embedding model in use
    fn embedding_model(&self) -> &str;
}
