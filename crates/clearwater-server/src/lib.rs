//! # Clearwater Server
//!
//! HTTP surface of the chat-over-your-data backend: agent queries and feedback,
//! per-session memory inspection, and the inventory, chart, knowledgebase and object
//! download endpoints used by the dashboard.

pub mod config;
pub mod error;
mod routes;
pub mod state;
pub mod telemetry;

pub use config::ServerConfig;
pub use error::ApiError;
pub use routes::build_router;
pub use state::AppState;
