//! Agent memory - coordinates the short-term buffer and long-term recall
//!
//! Three sub-resources are built lazily and at most once per agent:
//!
//! - the embedding provider (connected on the first long-term write or query),
//! - the long-term [`VectorMemory`],
//! - the [`ComposableMemory`] view over the short-term buffer and the long-term store.
//!
//! The composed view is the only one that is ever replaced: `trim_last` publishes a
//! rebuilt view and `reset` drops it so the next access starts from an empty buffer.
//! The long-term store survives both.

use super::composable::ComposableMemory;
use super::config::MemoryConfig;
use super::conversation::ChatMemoryBuffer;
use super::recall::VectorMemory;
use super::turn::ConversationTurn;
use super::vector::{EmbeddingBackend, LazyEmbeddings, SearchResult};
use crate::error::RagResult;
use parking_lot::{RwLock, RwLockWriteGuard};
use serde::Serialize;
use std::sync::{Arc, OnceLock};
use tracing::{info, warn};

/// Lifecycle state of the short-term buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryState {
    /// No turns held
    Empty,
    /// At least one turn held
    Populated,
}

/// Conversational memory owned by one session agent
pub struct AgentMemory {
    session_id: String,
    config: MemoryConfig,
    embeddings: Arc<LazyEmbeddings>,
    long_term: OnceLock<Arc<VectorMemory>>,
    composed: RwLock<Option<Arc<ComposableMemory>>>,
}

impl AgentMemory {
    /// Create memory for a session; no vendor resources are touched yet
    pub fn new(
        session_id: impl Into<String>,
        config: MemoryConfig,
        backend: Arc<dyn EmbeddingBackend>,
    ) -> Self {
        let session_id = session_id.into();
        info!(session_id = %session_id, "Initializing agent memory");

        Self {
            embeddings: Arc::new(LazyEmbeddings::new(backend, config.embed_timeout)),
            session_id,
            config,
            long_term: OnceLock::new(),
            composed: RwLock::new(None),
        }
    }

    /// Session this memory belongs to
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Active configuration
    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    /// Long-term store, created on first access
    pub fn vector_memory(&self) -> Arc<VectorMemory> {
        self.long_term
            .get_or_init(|| {
                info!(session_id = %self.session_id, "Initializing vector memory");
                Arc::new(VectorMemory::new(
                    self.embeddings.clone(),
                    self.config.similarity_top_k,
                ))
            })
            .clone()
    }

    /// Composed view, created on first access
    pub fn composable_memory(&self) -> Arc<ComposableMemory> {
        self.with_view(|view| view.clone())
    }

    /// Record a turn
    ///
    /// The short-term append always happens. Returns `false` when indexing the turn in
    /// long-term memory failed; the failure is logged and not propagated.
    pub async fn put(&self, turn: ConversationTurn) -> bool {
        let view = self.with_view(|view| {
            view.put_short_term(turn.clone());
            view.clone()
        });

        match view.put_long_term(&turn).await {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    session_id = %self.session_id,
                    turn_id = %turn.id,
                    error = %e,
                    "Failed to record turn in long-term memory"
                );
                false
            }
        }
    }

    /// Short-term turns in insertion order
    pub fn get_all(&self) -> Vec<ConversationTurn> {
        self.with_view(|view| view.get_all())
    }

    /// Current lifecycle state
    pub fn state(&self) -> MemoryState {
        let populated = self
            .composed
            .read()
            .as_ref()
            .map_or(false, |view| !view.is_empty());
        if populated {
            MemoryState::Populated
        } else {
            MemoryState::Empty
        }
    }

    /// Remove the most recent `n` short-term turns
    ///
    /// Builds a new view from the remaining turns and publishes it in one step; the
    /// long-term store is reused untouched. Returns `false` when fewer than `n` turns
    /// exist or `n` is zero.
    pub fn trim_last(&self, n: usize) -> bool {
        if n == 0 {
            return false;
        }

        let mut guard = self.composed.write();
        let current = self.view_or_init(&mut guard);
        let turns = current.get_all();
        if turns.len() < n {
            return false;
        }

        info!(session_id = %self.session_id, n, "Removing last messages from memory");
        let kept = turns[..turns.len() - n].to_vec();
        let rebuilt = ComposableMemory::new(
            ChatMemoryBuffer::from_turns(kept, current.max_turns()),
            current.secondary_sources().to_vec(),
        );
        *guard = Some(Arc::new(rebuilt));
        true
    }

    /// Clear the short-term buffer; long-term memory is kept
    pub fn reset(&self) {
        info!(session_id = %self.session_id, "Clearing short-term memory");
        *self.composed.write() = None;
    }

    /// Clear both the short-term buffer and the long-term store
    pub fn purge(&self) {
        info!(session_id = %self.session_id, "Purging all memory");
        *self.composed.write() = None;
        if let Some(store) = self.long_term.get() {
            store.clear();
        }
    }

    /// Similarity query against long-term memory
    pub async fn try_recall(
        &self,
        query: &str,
        top_k: Option<usize>,
    ) -> RagResult<Vec<SearchResult<ConversationTurn>>> {
        self.vector_memory().query(query, top_k).await
    }

    /// Best-effort similarity query; failures are logged and yield no results
    pub async fn recall(
        &self,
        query: &str,
        top_k: Option<usize>,
    ) -> Vec<SearchResult<ConversationTurn>> {
        match self.try_recall(query, top_k).await {
            Ok(results) => results,
            Err(e) => {
                warn!(session_id = %self.session_id, error = %e, "Long-term recall failed");
                Vec::new()
            }
        }
    }

    /// Whether the embedding provider has been connected
    pub fn embeddings_initialized(&self) -> bool {
        self.embeddings.is_initialized()
    }

    fn build_view(&self) -> Arc<ComposableMemory> {
        info!(session_id = %self.session_id, "Initializing composable memory");
        Arc::new(ComposableMemory::new(
            ChatMemoryBuffer::with_capacity(self.config.max_turns),
            vec![self.vector_memory()],
        ))
    }

    fn view_or_init(
        &self,
        guard: &mut RwLockWriteGuard<'_, Option<Arc<ComposableMemory>>>,
    ) -> Arc<ComposableMemory> {
        guard.get_or_insert_with(|| self.build_view()).clone()
    }

    /// Run `f` against the current view while holding the view lock
    ///
    /// The view cannot be swapped by `trim_last` or `reset` while `f` runs.
    fn with_view<R>(&self, f: impl FnOnce(&Arc<ComposableMemory>) -> R) -> R {
        {
            let guard = self.composed.read();
            if let Some(view) = guard.as_ref() {
                return f(view);
            }
        }

        let mut guard = self.composed.write();
        let view = self.view_or_init(&mut guard);
        let guard = RwLockWriteGuard::downgrade(guard);
        let result = f(&view);
        drop(guard);
        result
    }
}
