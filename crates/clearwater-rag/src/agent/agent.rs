//! Session agent - one conversation with its own memory

use super::config::AgentConfig;
use super::memory::{AgentMemory, ConversationTurn};
use super::response::AgentResponse;
use crate::error::{RagError, RagResult};
use chrono::{DateTime, Utc};
use clearwater_llm::{ChatMessage, LlmClient};
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Result of one agent turn
#[derive(Debug, Clone, Serialize)]
pub struct AgentReply {
    /// Id the client quotes when leaving feedback
    pub response_id: String,

    /// Parsed answer
    pub response: AgentResponse,

    /// Whether both turns were also indexed in long-term memory
    pub memory_recorded: bool,
}

/// Agent bound to a single session
pub struct SessionAgent {
    session_id: String,
    llm: Arc<dyn LlmClient>,
    memory: AgentMemory,
    config: AgentConfig,
    /// Serializes turns within the session
    turn_lock: Mutex<()>,
    created_at: DateTime<Utc>,
}

impl SessionAgent {
    /// Create an agent around an existing memory
    pub fn new(llm: Arc<dyn LlmClient>, memory: AgentMemory, config: AgentConfig) -> Self {
        Self {
            session_id: memory.session_id().to_string(),
            llm,
            memory,
            config,
            turn_lock: Mutex::new(()),
            created_at: Utc::now(),
        }
    }

    /// Session this agent serves
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Conversational memory
    pub fn memory(&self) -> &AgentMemory {
        &self.memory
    }

    /// Agent configuration
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// When the agent was created
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Answer a query in the context of this session
    ///
    /// Turns of one session run one at a time. On success the user query and the
    /// answer are recorded in memory; a failed vendor call records nothing.
    pub async fn generate_response(&self, query: &str) -> RagResult<AgentReply> {
        let _turn = self.turn_lock.lock().await;

        info!(session_id = %self.session_id, query = %query, "Agent received user query");

        let context = self.build_context(query).await;
        debug!(
            session_id = %self.session_id,
            message_count = context.len(),
            "Calling LLM"
        );

        let completion = tokio::time::timeout(
            self.config.vendor_timeout,
            self.llm.chat_completion(context),
        )
        .await
        .map_err(|_| RagError::timeout("chat_completion", self.config.vendor_timeout))??;

        let response = AgentResponse::parse(&completion.content);

        let user_recorded = self.memory.put(ConversationTurn::user(query)).await;
        let assistant_recorded = self
            .memory
            .put(ConversationTurn::assistant(response.as_text()))
            .await;
        let memory_recorded = user_recorded && assistant_recorded;
        if !memory_recorded {
            warn!(session_id = %self.session_id, "Turn kept in short-term memory only");
        }

        let reply = AgentReply {
            response_id: uuid::Uuid::new_v4().to_string(),
            response,
            memory_recorded,
        };
        info!(
            session_id = %self.session_id,
            response_id = %reply.response_id,
            model = %completion.model,
            "Agent generated answer"
        );
        Ok(reply)
    }

    /// Drop the last `n` turns once any in-flight turn has finished
    pub async fn trim_last(&self, n: usize) -> bool {
        let _turn = self.turn_lock.lock().await;
        self.memory.trim_last(n)
    }

    /// Clear short-term memory once any in-flight turn has finished
    pub async fn reset_memory(&self) {
        let _turn = self.turn_lock.lock().await;
        self.memory.reset();
    }

    /// System prompt with recalled snippets, then the short-term history, then the query
    async fn build_context(&self, query: &str) -> Vec<ChatMessage> {
        let history = self.memory.get_all();

        let mut system_prompt = self.config.system_prompt.clone();
        if self.config.recall_top_k > 0 {
            let in_history: HashSet<&str> = history.iter().map(|t| t.id.as_str()).collect();
            let recalled: Vec<_> = self
                .memory
                .recall(query, Some(self.config.recall_top_k))
                .await
                .into_iter()
                .filter(|hit| !in_history.contains(hit.item.id.as_str()))
                .collect();

            if !recalled.is_empty() {
                debug!(
                    session_id = %self.session_id,
                    recalled = recalled.len(),
                    "Adding recalled turns to context"
                );
                system_prompt.push_str("\n\nRelevant earlier conversation:");
                for hit in &recalled {
                    system_prompt.push_str(&format!(
                        "\n- {}: {}",
                        hit.item.role, hit.item.content
                    ));
                }
            }
        }

        let mut context = Vec::with_capacity(history.len() + 2);
        context.push(ChatMessage::system(system_prompt));
        context.extend(history.iter().map(ChatMessage::from));
        context.push(ChatMessage::user(query));
        context
    }
}

impl std::fmt::Debug for SessionAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionAgent")
            .field("session_id", &self.session_id)
            .field("model", &self.llm.model_name())
            .field("created_at", &self.created_at)
            .finish()
    }
}
