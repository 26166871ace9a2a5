//! Memory configuration for session agents

use crate::error::{RagError, RagResult};
use std::time::Duration;

/// Configuration for one agent's conversational memory
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryConfig {
    /// Results returned by a long-term similarity query
    pub similarity_top_k: usize,

    /// Short-term buffer capacity (None = unbounded)
    pub max_turns: Option<usize>,

    /// Deadline for a single embedding call
    pub embed_timeout: Duration,
}

impl MemoryConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the similarity top-k
    pub fn with_similarity_top_k(mut self, top_k: usize) -> Self {
        self.similarity_top_k = top_k;
        self
    }

    /// Bound the short-term buffer
    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = Some(max_turns);
        self
    }

    /// Set the embedding timeout
    pub fn with_embed_timeout(mut self, timeout: Duration) -> Self {
        self.embed_timeout = timeout;
        self
    }

    /// Reject settings that would build a broken memory
    pub fn validate(&self) -> RagResult<()> {
        if self.similarity_top_k == 0 {
            return Err(RagError::validation(
                "similarity_top_k",
                "must be greater than zero",
                "0",
            ));
        }
        if self.max_turns == Some(0) {
            return Err(RagError::validation(
                "max_turns",
                "must be greater than zero when set",
                "0",
            ));
        }
        if self.embed_timeout.is_zero() {
            return Err(RagError::validation(
                "embed_timeout",
                "must be positive",
                "0s",
            ));
        }
        Ok(())
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            similarity_top_k: 5,
            max_turns: None,
            embed_timeout: Duration::from_secs(30),
        }
    }
}
