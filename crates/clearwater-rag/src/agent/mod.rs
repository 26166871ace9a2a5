//! # Clearwater Agent Module
//!
//! Session-scoped agents: each chat session gets its own [`SessionAgent`] with its own
//! conversational memory, handed out by the [`SessionRegistry`].
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use clearwater_rag::agent::{AgentConfig, DefaultAgentFactory, RegistryConfig, SessionRegistry};
//! use clearwater_rag::agent::memory::MemoryConfig;
//!
//! let factory = DefaultAgentFactory::new(llm, embeddings, AgentConfig::default(), MemoryConfig::default());
//! let registry = SessionRegistry::new(Arc::new(factory), RegistryConfig::default());
//!
//! let agent = registry.get_or_create("session-1").await?;
//! let reply = agent.generate_response("What is the total quantity in stock?").await?;
//! ```

mod agent;
mod config;
pub mod memory;
mod registry;
mod response;

pub use agent::{AgentReply, SessionAgent};
pub use config::{AgentConfig, DEFAULT_SYSTEM_PROMPT};
pub use registry::{AgentFactory, DefaultAgentFactory, RegistryConfig, SessionRegistry};
pub use response::{AgentResponse, StructuredResult};
