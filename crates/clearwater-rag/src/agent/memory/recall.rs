//! Long-term recall store
//!
//! Append-only, similarity-searchable store of past turns. It is never enumerated in
//! full by the agent; callers reach it through [`VectorMemory::query`].

use super::turn::ConversationTurn;
use super::vector::{Embedding, LazyEmbeddings, SearchResult};
use crate::error::RagResult;
use parking_lot::RwLock;
use std::cmp::Ordering;
use std::sync::Arc;
use tracing::debug;

struct VectorEntry {
    turn: ConversationTurn,
    embedding: Embedding,
}

/// Similarity-searchable memory of past turns
pub struct VectorMemory {
    embeddings: Arc<LazyEmbeddings>,
    entries: RwLock<Vec<VectorEntry>>,
    similarity_top_k: usize,
}

impl VectorMemory {
    /// Create an empty store
    pub fn new(embeddings: Arc<LazyEmbeddings>, similarity_top_k: usize) -> Self {
        Self {
            embeddings,
            entries: RwLock::new(Vec::new()),
            similarity_top_k: similarity_top_k.max(1),
        }
    }

    /// Embed and index a turn
    pub async fn put(&self, turn: &ConversationTurn) -> RagResult<()> {
        let embedding = self.embeddings.embed(&turn.content).await?;
        self.entries.write().push(VectorEntry {
            turn: turn.clone(),
            embedding,
        });
        debug!(turn_id = %turn.id, "Indexed turn in vector memory");
        Ok(())
    }

    /// Embed `text` and return the closest turns
    pub async fn query(
        &self,
        text: &str,
        top_k: Option<usize>,
    ) -> RagResult<Vec<SearchResult<ConversationTurn>>> {
        if self.is_empty() {
            return Ok(Vec::new());
        }
        let embedding = self.embeddings.embed(text).await?;
        self.similarity_query(&embedding, top_k)
    }

    /// Rank stored turns by cosine similarity to `embedding`
    pub fn similarity_query(
        &self,
        embedding: &Embedding,
        top_k: Option<usize>,
    ) -> RagResult<Vec<SearchResult<ConversationTurn>>> {
        let top_k = top_k.unwrap_or(self.similarity_top_k);
        let entries = self.entries.read();

        let mut results = Vec::with_capacity(entries.len());
        for entry in entries.iter() {
            let score = embedding.cosine_similarity(&entry.embedding)?;
            results.push(SearchResult::new(entry.turn.clone(), score));
        }

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        results.truncate(top_k);
        Ok(results)
    }

    /// Number of indexed turns
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if nothing has been indexed
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Default number of results per query
    pub fn similarity_top_k(&self) -> usize {
        self.similarity_top_k
    }

    /// Drop every indexed turn
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::memory::vector::{HashEmbeddingProvider, StaticEmbeddingBackend};
    use std::time::Duration;

    fn store(top_k: usize) -> VectorMemory {
        let backend = Arc::new(StaticEmbeddingBackend::new(HashEmbeddingProvider::new(128)));
        VectorMemory::new(
            Arc::new(LazyEmbeddings::new(backend, Duration::from_secs(5))),
            top_k,
        )
    }

    #[tokio::test]
    async fn test_query_ranks_closest_first() {
        let memory = store(5);
        memory
            .put(&ConversationTurn::user("What is the total quantity in stock?"))
            .await
            .unwrap();
        memory
            .put(&ConversationTurn::assistant("The weather is sunny today"))
            .await
            .unwrap();
        memory
            .put(&ConversationTurn::user("List customers who placed orders"))
            .await
            .unwrap();

        let results = memory.query("quantity in stock", None).await.unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].item.content, "What is the total quantity in stock?");
        assert!(results[0].score >= results[1].score);
    }

    #[tokio::test]
    async fn test_query_respects_top_k() {
        let memory = store(2);
        for i in 0..4 {
            memory
                .put(&ConversationTurn::user(format!("message number {i}")))
                .await
                .unwrap();
        }

        assert_eq!(memory.query("message", None).await.unwrap().len(), 2);
        assert_eq!(memory.query("message", Some(3)).await.unwrap().len(), 3);
        assert_eq!(memory.len(), 4);
    }

    #[tokio::test]
    async fn test_empty_store_skips_embedding() {
        let memory = store(5);
        assert!(memory.query("anything", None).await.unwrap().is_empty());
        assert!(!memory.embeddings.is_initialized());
    }
}
