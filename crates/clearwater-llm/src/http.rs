//! OpenAI-compatible HTTP client

use crate::client::{EmbeddingClient, LlmClient};
use crate::config::ClientConfig;
use crate::error::{LlmError, LlmResult};
use crate::message::{ChatMessage, ChatResponse, Usage};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// HTTP client for `/chat/completions` and `/embeddings`
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    config: ClientConfig,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    model: Option<String>,
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingList {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

impl Client {
    /// Build a client from explicit settings
    pub fn new(config: ClientConfig) -> LlmResult<Self> {
        config.validate()?;
        let http = reqwest::Client::builder().timeout(config.timeout()).build()?;
        Ok(Self { http, config })
    }

    /// Build a client from `CLEARWATER_LLM_*` environment variables
    pub fn from_env() -> LlmResult<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Active configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn post_json<B: Serialize, R: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        body: &B,
    ) -> LlmResult<R> {
        let url = self.config.endpoint(path);
        let mut request = self.http.post(&url).json(body);
        if let Some(ref key) = self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| status.canonical_reason().unwrap_or("").to_string());
            warn!(url = %url, status = status.as_u16(), "Model gateway returned error");
            return Err(LlmError::api(status.as_u16(), message));
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl LlmClient for Client {
    async fn chat_completion(&self, messages: Vec<ChatMessage>) -> LlmResult<ChatResponse> {
        debug!(
            model = %self.config.chat_model,
            message_count = messages.len(),
            "Sending chat completion"
        );

        let request = ChatRequest {
            model: &self.config.chat_model,
            messages: &messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };
        let completion: ChatCompletion = self.post_json("chat/completions", &request).await?;

        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::invalid_response("completion contained no choices"))?;

        Ok(ChatResponse {
            content: choice.message.content.unwrap_or_default(),
            model: completion
                .model
                .unwrap_or_else(|| self.config.chat_model.clone()),
            finish_reason: choice.finish_reason,
            usage: completion.usage,
        })
    }

    fn model_name(&self) -> &str {
        &self.config.chat_model
    }
}

#[async_trait]
impl EmbeddingClient for Client {
    async fn embed(&self, text: &str) -> LlmResult<Vec<f32>> {
        let request = EmbeddingRequest {
            model: &self.config.embedding_model,
            input: text,
        };
        let list: EmbeddingList = self.post_json("embeddings", &request).await?;

        let vector = list
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| LlmError::invalid_response("embedding response contained no data"))?;

        if vector.is_empty() {
            return Err(LlmError::invalid_response("embedding vector is empty"));
        }

        Ok(vector)
    }

    fn embedding_model(&self) -> &str {
        &self.config.embedding_model
    }
}
