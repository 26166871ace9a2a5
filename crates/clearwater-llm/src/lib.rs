//! # Clearwater LLM
//!
//! Client side of the hosted model boundary. The agent core only ever talks to the
//! [`LlmClient`] and [`EmbeddingClient`] traits; [`Client`] implements both against an
//! OpenAI-compatible gateway (Bedrock Access Gateway, Ollama, vLLM, OpenAI itself).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use clearwater_llm::{ChatMessage, Client, LlmClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::from_env()?;
//!
//! let response = client
//!     .chat_completion(vec![
//!         ChatMessage::system("You are a data insights assistant."),
//!         ChatMessage::user("What is the total quantity in stock?"),
//!     ])
//!     .await?;
//!
//! println!("{}", response.content);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod client;
mod config;
mod error;
mod message;

#[cfg(feature = "http")]
mod http;

pub use client::{EmbeddingClient, LlmClient};
pub use config::ClientConfig;
pub use error::{LlmError, LlmResult};
pub use message::{ChatMessage, ChatResponse, MessageRole, Usage};

#[cfg(feature = "http")]
pub use http::Client;
