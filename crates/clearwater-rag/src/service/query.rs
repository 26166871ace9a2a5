//! Query service - the entry point for chat queries

use crate::agent::{AgentResponse, SessionRegistry};
use crate::error::{RagError, RagResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info};

/// Inbound chat query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub session_id: String,
    pub query: String,
}

/// Answer returned to the client
///
/// `success: false` carries the failure message as text in `response`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryEnvelope {
    pub success: bool,
    pub response: AgentResponse,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_id: Option<String>,
}

impl QueryEnvelope {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            response: AgentResponse::text(message),
            response_id: None,
        }
    }
}

/// Routes queries to the agent of their session
#[derive(Debug, Clone)]
pub struct QueryService {
    registry: Arc<SessionRegistry>,
}

impl QueryService {
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    /// Answer `query` within `session_id`
    ///
    /// Invalid input and agent construction failures are errors. A failed or timed
    /// out model call is reported as an unsuccessful envelope.
    pub async fn submit_query(&self, session_id: &str, query: &str) -> RagResult<QueryEnvelope> {
        if session_id.trim().is_empty() {
            return Err(RagError::validation("session_id", "must not be empty", session_id));
        }
        if query.trim().is_empty() {
            return Err(RagError::validation("query", "must not be empty", query));
        }

        let agent = self.registry.get_or_create(session_id).await?;

        match agent.generate_response(query).await {
            Ok(reply) => {
                info!(
                    session_id = %session_id,
                    response_id = %reply.response_id,
                    memory_recorded = reply.memory_recorded,
                    "Query answered"
                );
                Ok(QueryEnvelope {
                    success: true,
                    response: reply.response,
                    response_id: Some(reply.response_id),
                })
            }
            Err(e) if e.is_vendor_failure() => {
                error!(session_id = %session_id, error = %e, "Error processing query");
                Ok(QueryEnvelope::failure(e.to_string()))
            }
            Err(e) => Err(e),
        }
    }
}
