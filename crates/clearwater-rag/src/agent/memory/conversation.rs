//! Short-term conversation buffer
//!
//! The rolling window of recent turns for one session. Ordered, append-only from the
//! caller's point of view; the only removal paths are the capacity policy (oldest first)
//! and rebuilding a fresh buffer from a prefix of the turns.

use super::turn::ConversationTurn;
use uuid::Uuid;

/// Ordered buffer of recent conversation turns
#[derive(Debug, Clone, Default)]
pub struct ChatMemoryBuffer {
    /// Turns in insertion order
    turns: Vec<ConversationTurn>,

    /// Maximum number of turns to keep (None = unbounded)
    max_turns: Option<usize>,
}

impl ChatMemoryBuffer {
    /// Create an unbounded buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a buffer with an optional capacity
    pub fn with_capacity(max_turns: Option<usize>) -> Self {
        Self {
            turns: Vec::new(),
            max_turns,
        }
    }

    /// Create a buffer pre-filled with turns, applying the capacity policy
    pub fn from_turns(turns: Vec<ConversationTurn>, max_turns: Option<usize>) -> Self {
        let mut buffer = Self { turns, max_turns };
        buffer.enforce_capacity();
        buffer
    }

    /// Append a turn
    pub fn put(&mut self, turn: ConversationTurn) {
        self.turns.push(turn);
        self.enforce_capacity();
    }

    /// All turns in insertion order
    pub fn get_all(&self) -> Vec<ConversationTurn> {
        self.turns.clone()
    }

    /// Borrow the turns
    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    /// Number of turns held
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Check if the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Configured capacity
    pub fn max_turns(&self) -> Option<usize> {
        self.max_turns
    }

    fn enforce_capacity(&mut self) {
        if let Some(max) = self.max_turns {
            if self.turns.len() > max {
                let overflow = self.turns.len() - max;
                self.turns.drain(..overflow);
            }
        }
    }
}

/// Generate a unique session ID
pub fn generate_session_id() -> String {
    Uuid::new_v4().to_string()
}
