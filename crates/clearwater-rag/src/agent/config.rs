//! Agent configuration

use std::time::Duration;

/// Default instructions for the data insights assistant
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a data insights assistant for post-trade \
and inventory data. Answer concisely. When a question needs a database query, reply with a \
JSON object with the keys sql_query, data and explanation.";

/// Configuration for a session agent
#[derive(Debug, Clone, PartialEq)]
pub struct AgentConfig {
    /// System prompt sent at the head of every conversation
    pub system_prompt: String,

    /// Deadline for one chat completion
    pub vendor_timeout: Duration,

    /// Long-term turns recalled into the prompt (0 disables recall)
    pub recall_top_k: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            vendor_timeout: Duration::from_secs(60),
            recall_top_k: 3,
        }
    }
}

impl AgentConfig {
    /// Set the system prompt
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Set the vendor timeout
    pub fn with_vendor_timeout(mut self, timeout: Duration) -> Self {
        self.vendor_timeout = timeout;
        self
    }

    /// Set how many long-term turns are recalled
    pub fn with_recall_top_k(mut self, top_k: usize) -> Self {
        self.recall_top_k = top_k;
        self
    }
}
