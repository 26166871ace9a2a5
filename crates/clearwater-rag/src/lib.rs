//! # Clearwater RAG
//!
//! Core of the chat-over-your-data backend:
//!
//! - [`agent`]: session-scoped agents, the registry that hands them out, and their
//!   conversational memory (short-term buffer composed with long-term recall)
//! - [`service`]: query and feedback services used by the HTTP layer
//! - [`data`]: inventory, chart statistics, knowledgebase and object storage accessors
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use clearwater_rag::prelude::*;
//!
//! let factory = DefaultAgentFactory::new(llm, embeddings, AgentConfig::default(), MemoryConfig::default());
//! let registry = Arc::new(SessionRegistry::new(Arc::new(factory), RegistryConfig::default()));
//! let service = QueryService::new(registry);
//!
//! let envelope = service.submit_query("abc", "What is the total quantity in stock?").await?;
//! ```

pub mod agent;
pub mod data;
pub mod error;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{RagError, RagResult};

/// Commonly used types
pub mod prelude {
    pub use crate::agent::memory::{
        AgentMemory, ConversationTurn, EmbeddingBackend, EmbeddingProvider,
        HashEmbeddingProvider, MemoryConfig, MemoryState, RemoteEmbeddingBackend,
        StaticEmbeddingBackend,
    };
    pub use crate::agent::{
        AgentConfig, AgentFactory, AgentReply, AgentResponse, DefaultAgentFactory,
        RegistryConfig, SessionAgent, SessionRegistry,
    };
    pub use crate::error::{RagError, RagResult};
    pub use crate::service::{FeedbackService, QueryEnvelope, QueryService};
}
