//! Test doubles for the model and embedding boundaries

use crate::agent::memory::{EmbeddingBackend, EmbeddingProvider, HashEmbeddingProvider};
use crate::agent::memory::Embedding;
use crate::error::{RagError, RagResult};
use async_trait::async_trait;
use clearwater_llm::{ChatMessage, ChatResponse, LlmClient, LlmError, LlmResult};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Embedding provider whose every call fails
pub struct FailingEmbeddingProvider;

#[async_trait]
impl EmbeddingProvider for FailingEmbeddingProvider {
    async fn embed(&self, _text: &str) -> RagResult<Embedding> {
        Err(RagError::memory_backend("embed", "embedding service unavailable"))
    }

    fn model_name(&self) -> &str {
        "failing"
    }

    fn dimensions(&self) -> usize {
        0
    }
}

/// Hashing provider that sleeps before every embedding
pub struct SlowEmbeddingProvider {
    inner: HashEmbeddingProvider,
    delay: Duration,
}

impl SlowEmbeddingProvider {
    pub fn new(delay: Duration) -> Self {
        Self {
            inner: HashEmbeddingProvider::new(64),
            delay,
        }
    }
}

#[async_trait]
impl EmbeddingProvider for SlowEmbeddingProvider {
    async fn embed(&self, text: &str) -> RagResult<Embedding> {
        tokio::time::sleep(self.delay).await;
        self.inner.embed(text).await
    }

    fn model_name(&self) -> &str {
        "slow-hash"
    }

    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }
}

/// Backend that counts connection attempts and can fail the first few
pub struct CountingBackend {
    pub connects: AtomicUsize,
    fail_first: usize,
}

impl CountingBackend {
    pub fn new() -> Self {
        Self::failing_first(0)
    }

    pub fn failing_first(fail_first: usize) -> Self {
        Self {
            connects: AtomicUsize::new(0),
            fail_first,
        }
    }
}

#[async_trait]
impl EmbeddingBackend for CountingBackend {
    async fn connect(&self) -> RagResult<Arc<dyn EmbeddingProvider>> {
        let attempt = self.connects.fetch_add(1, Ordering::SeqCst);
        // widen the window for concurrent first callers
        tokio::time::sleep(Duration::from_millis(10)).await;
        if attempt < self.fail_first {
            return Err(RagError::memory_backend("connect", "backend not ready"));
        }
        Ok(Arc::new(HashEmbeddingProvider::new(64)))
    }
}

/// Chat model double that replays scripted replies and records every context it receives
pub struct ScriptedLlm {
    replies: Mutex<VecDeque<LlmResult<String>>>,
    fallback: String,
    delay: Option<Duration>,
    pub calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedLlm {
    /// Answer every call with the same text
    pub fn answering(text: impl Into<String>) -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            fallback: text.into(),
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue a reply ahead of the fallback
    pub fn then_reply(self, text: impl Into<String>) -> Self {
        self.replies.lock().push_back(Ok(text.into()));
        self
    }

    /// Queue a failure ahead of the fallback
    pub fn then_fail(self, status: u16, message: impl Into<String>) -> Self {
        self.replies
            .lock()
            .push_back(Err(LlmError::api(status, message)));
        self
    }

    /// Sleep before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Contexts received so far
    pub fn recorded_calls(&self) -> Vec<Vec<ChatMessage>> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl LlmClient for ScriptedLlm {
    async fn chat_completion(&self, messages: Vec<ChatMessage>) -> LlmResult<ChatResponse> {
        self.calls.lock().push(messages);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let next = self.replies.lock().pop_front();
        let text = match next {
            Some(reply) => reply?,
            None => self.fallback.clone(),
        };
        Ok(ChatResponse::text(text, "scripted"))
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}
