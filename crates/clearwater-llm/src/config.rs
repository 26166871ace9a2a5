//! Gateway client configuration

use crate::error::{LlmError, LlmResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Connection settings for an OpenAI-compatible model gateway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL including the API version segment, e.g. `http://localhost:8000/api/v1`
    pub base_url: String,

    /// Bearer token, if the gateway requires one
    pub api_key: Option<String>,

    /// Model id used for chat completions
    pub chat_model: String,

    /// Model id used for embeddings
    pub embedding_model: String,

    /// Sampling temperature
    pub temperature: Option<f32>,

    /// Upper bound on generated tokens
    pub max_tokens: Option<u32>,

    /// Per-request timeout enforced by the HTTP client
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/api/v1".to_string(),
            api_key: None,
            chat_model: "anthropic.claude-3-sonnet-20240229-v1:0".to_string(),
            embedding_model: "amazon.titan-embed-text-v2:0".to_string(),
            temperature: Some(0.1),
            max_tokens: Some(2048),
            timeout_secs: 60,
        }
    }
}

impl ClientConfig {
    /// Load from `CLEARWATER_LLM_*` environment variables (after reading `.env`)
    pub fn from_env() -> LlmResult<Self> {
        dotenv::dotenv().ok();
        Self::from_env_with_prefix("CLEARWATER_LLM")
    }

    /// Load from environment variables with a custom prefix
    pub fn from_env_with_prefix(prefix: &str) -> LlmResult<Self> {
        let config: Self = ::config::Config::builder()
            .add_source(::config::Environment::with_prefix(prefix).try_parsing(true))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Check that the settings are usable
    pub fn validate(&self) -> LlmResult<()> {
        if self.base_url.trim().is_empty() {
            return Err(LlmError::Config("base_url must not be empty".to_string()));
        }
        if self.chat_model.trim().is_empty() {
            return Err(LlmError::Config("chat_model must not be empty".to_string()));
        }
        if self.embedding_model.trim().is_empty() {
            return Err(LlmError::Config(
                "embedding_model must not be empty".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(LlmError::Config("timeout_secs must be positive".to_string()));
        }
        Ok(())
    }

    /// Request timeout as a [`Duration`]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Join an endpoint path onto the base URL
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Set the base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the chat model
    pub fn with_chat_model(mut self, model: impl Into<String>) -> Self {
        self.chat_model = model.into();
        self
    }

    /// Set the embedding model
    pub fn with_embedding_model(mut self, model: impl Into<String>) -> Self {
        self.embedding_model = model.into();
        self
    }
}
