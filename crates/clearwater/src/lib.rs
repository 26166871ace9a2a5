//! # Clearwater - Chat over your data
//!
//! **Clearwater** answers natural-language questions about post-trade and inventory data.
//! It brings together:
//!
//! - **Clearwater LLM**: chat completion and embedding client for an OpenAI-compatible
//!   model gateway
//! - **Clearwater RAG**: session-scoped agents whose memory composes a short-term
//!   conversation buffer with long-term similarity recall
//! - **Clearwater Server**: the HTTP API (enable the `server` feature)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use clearwater::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Arc::new(Client::from_env()?);
//!     let embeddings = Arc::new(RemoteEmbeddingBackend::new(client.clone(), 1024));
//!
//!     let factory = DefaultAgentFactory::new(
//!         client,
//!         embeddings,
//!         AgentConfig::default(),
//!         MemoryConfig::default(),
//!     );
//!     let registry = Arc::new(SessionRegistry::new(Arc::new(factory), RegistryConfig::default()));
//!     let service = QueryService::new(registry);
//!
//!     let envelope = service
//!         .submit_query("abc", "What is the total quantity in stock?")
//!         .await?;
//!     println!("{:?}", envelope.response);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//!            ┌────────────────────┐
//!            │     Clearwater     │
//!            │  (umbrella crate)  │
//!            └─────────┬──────────┘
//!                      │
//!        ┌─────────────┼─────────────┐
//!        │             │             │
//!    ┌───▼───┐     ┌───▼───┐    ┌────▼───┐
//!    │  LLM  │◄────│  RAG  │◄───│ Server │
//!    └───────┘     └───────┘    └────────┘
//! ```

#![warn(missing_docs)]

// Re-export sub-crates
#[cfg(feature = "llm")]
pub use clearwater_llm as llm;

#[cfg(feature = "rag")]
pub use clearwater_rag as rag;

#[cfg(feature = "server")]
pub use clearwater_server as server;

/// Commonly used types and traits
pub mod prelude {
    #[cfg(feature = "llm")]
    pub use crate::llm::{
        ChatMessage, ChatResponse, Client, ClientConfig, EmbeddingClient, LlmClient, MessageRole,
    };

    #[cfg(feature = "rag")]
    pub use crate::rag::{
        agent::{
            AgentConfig, AgentFactory, AgentReply, AgentResponse, DefaultAgentFactory,
            RegistryConfig, SessionAgent, SessionRegistry, StructuredResult,
        },
        error::{RagError, RagResult},
        service::{FeedbackEnvelope, FeedbackService, QueryEnvelope, QueryService},
    };

    #[cfg(feature = "rag")]
    pub use crate::rag::agent::memory::{
        generate_session_id, AgentMemory, ConversationTurn, EmbeddingBackend, HashEmbeddingProvider,
        MemoryConfig, MemoryState, RemoteEmbeddingBackend, StaticEmbeddingBackend,
    };

    #[cfg(feature = "rag")]
    pub use crate::rag::data::{InventoryStore, Knowledgebase, ObjectPath, ObjectStore};

    #[cfg(feature = "server")]
    pub use crate::server::{build_router, AppState, ServerConfig};
}
