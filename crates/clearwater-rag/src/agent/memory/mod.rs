//! # Agent Memory System
//!
//! Conversational memory for one session agent, composed of two stores:
//!
//! - **Short-term**: [`ChatMemoryBuffer`], the ordered window of recent turns. This is
//!   what [`AgentMemory::get_all`] lists and what the agent replays as context.
//! - **Long-term**: [`VectorMemory`], an append-only store searched by embedding
//!   similarity. It survives [`AgentMemory::trim_last`] and [`AgentMemory::reset`];
//!   only [`AgentMemory::purge`] clears it.
//!
//! ## Example
//!
//! ```rust,no_run
//! use clearwater_rag::agent::memory::{
//!     AgentMemory, ConversationTurn, HashEmbeddingProvider, MemoryConfig, StaticEmbeddingBackend,
//! };
//! use std::sync::Arc;
//!
//! # async fn example() {
//! let backend = Arc::new(StaticEmbeddingBackend::new(HashEmbeddingProvider::new(256)));
//! let memory = AgentMemory::new("session-1", MemoryConfig::default(), backend);
//!
//! memory.put(ConversationTurn::user("What is the total quantity in stock?")).await;
//! memory.put(ConversationTurn::assistant("42 units")).await;
//!
//! // drop the last exchange from the short-term window
//! memory.trim_last(2);
//!
//! // long-term memory still remembers it
//! let recalled = memory.recall("quantity in stock", None).await;
//! # }
//! ```

mod composable;
mod config;
mod conversation;
mod manager;
mod recall;
mod turn;
mod vector;

pub use composable::ComposableMemory;
pub use config::MemoryConfig;
pub use conversation::{generate_session_id, ChatMemoryBuffer};
pub use manager::{AgentMemory, MemoryState};
pub use recall::VectorMemory;
pub use turn::ConversationTurn;
pub use vector::{
    Embedding, EmbeddingBackend, EmbeddingProvider, HashEmbeddingProvider, LazyEmbeddings,
    RemoteEmbeddingBackend, RemoteEmbeddingProvider, SearchResult, StaticEmbeddingBackend,
};
