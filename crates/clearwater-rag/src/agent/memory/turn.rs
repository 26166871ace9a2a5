//! Conversation turns - the unit stored in and recalled from memory

use clearwater_llm::{ChatMessage, MessageRole};
use serde::{Deserialize, Serialize};

/// A role-tagged piece of conversation text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// Unique identifier
    pub id: String,

    /// Who produced the text
    pub role: MessageRole,

    /// The text itself
    pub content: String,

    /// When the turn was recorded
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl ConversationTurn {
    /// Create a new turn
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            created_at: chrono::Utc::now(),
        }
    }

    /// Create a user turn
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Create an assistant turn
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    /// Create a system turn
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }
}

impl From<&ConversationTurn> for ChatMessage {
    fn from(turn: &ConversationTurn) -> Self {
        ChatMessage::new(turn.role, turn.content.clone())
    }
}

impl From<ChatMessage> for ConversationTurn {
    fn from(message: ChatMessage) -> Self {
        Self::new(message.role, message.content)
    }
}
