//! Composed memory view: one primary buffer plus secondary recall sources

use super::conversation::ChatMemoryBuffer;
use super::recall::VectorMemory;
use super::turn::ConversationTurn;
use crate::error::RagResult;
use parking_lot::RwLock;
use std::sync::Arc;

/// Short-term buffer composed with long-term recall sources
///
/// Listing reads the primary buffer only. Secondary sources are written alongside the
/// primary and are queried explicitly.
pub struct ComposableMemory {
    primary: RwLock<ChatMemoryBuffer>,
    secondary: Vec<Arc<VectorMemory>>,
}

impl ComposableMemory {
    /// Compose a primary buffer with secondary sources
    pub fn new(primary: ChatMemoryBuffer, secondary: Vec<Arc<VectorMemory>>) -> Self {
        Self {
            primary: RwLock::new(primary),
            secondary,
        }
    }

    /// Append to the primary buffer only
    pub fn put_short_term(&self, turn: ConversationTurn) {
        self.primary.write().put(turn);
    }

    /// Index a turn in every secondary source
    ///
    /// Every source is attempted; the first failure is returned.
    pub async fn put_long_term(&self, turn: &ConversationTurn) -> RagResult<()> {
        let mut first_error = None;
        for source in &self.secondary {
            if let Err(e) = source.put(turn).await {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Primary turns in insertion order
    pub fn get_all(&self) -> Vec<ConversationTurn> {
        self.primary.read().get_all()
    }

    /// Number of primary turns
    pub fn len(&self) -> usize {
        self.primary.read().len()
    }

    /// Check if the primary buffer is empty
    pub fn is_empty(&self) -> bool {
        self.primary.read().is_empty()
    }

    /// Capacity of the primary buffer
    pub fn max_turns(&self) -> Option<usize> {
        self.primary.read().max_turns()
    }

    /// Secondary recall sources
    pub fn secondary_sources(&self) -> &[Arc<VectorMemory>] {
        &self.secondary
    }
}
