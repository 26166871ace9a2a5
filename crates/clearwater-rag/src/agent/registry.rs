//! Session agent registry
//!
//! Maps a session id to the one [`SessionAgent`] serving it. The map is sharded, and
//! each key holds its own init cell, so concurrent first requests for one session
//! build a single agent while other sessions proceed untouched.
//!
//! The registry is a bounded cache: past `max_sessions` the least recently used session
//! is dropped, and sessions idle longer than `idle_ttl` are dropped by
//! [`SessionRegistry::evict_expired`], which the server runs on an interval. A dropped
//! session's memory is purged.

use super::agent::SessionAgent;
use super::config::AgentConfig;
use super::memory::{AgentMemory, EmbeddingBackend, MemoryConfig};
use crate::error::{RagError, RagResult};
use async_trait::async_trait;
use clearwater_llm::LlmClient;
use dashmap::DashMap;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

/// Eviction policy for the registry
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryConfig {
    /// Upper bound on live sessions (None = unbounded)
    pub max_sessions: Option<usize>,

    /// Idle time after which a session may be evicted (None = never)
    pub idle_ttl: Option<Duration>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            max_sessions: Some(1000),
            idle_ttl: Some(Duration::from_secs(2 * 60 * 60)),
        }
    }
}

impl RegistryConfig {
    /// Keep every session for the life of the process
    pub fn unbounded() -> Self {
        Self {
            max_sessions: None,
            idle_ttl: None,
        }
    }

    /// Set the capacity
    pub fn with_max_sessions(mut self, max_sessions: usize) -> Self {
        self.max_sessions = Some(max_sessions);
        self
    }

    /// Set the idle TTL
    pub fn with_idle_ttl(mut self, ttl: Duration) -> Self {
        self.idle_ttl = Some(ttl);
        self
    }

    pub fn validate(&self) -> RagResult<()> {
        if self.max_sessions == Some(0) {
            return Err(RagError::validation(
                "max_sessions",
                "must be greater than zero when set",
                "0",
            ));
        }
        if self.idle_ttl.is_some_and(|ttl| ttl.is_zero()) {
            return Err(RagError::validation("idle_ttl", "must be positive", "0s"));
        }
        Ok(())
    }
}

/// Builds the agent for a new session
#[async_trait]
pub trait AgentFactory: Send + Sync {
    async fn create(&self, session_id: &str) -> RagResult<SessionAgent>;
}

/// Factory wiring the shared chat model and embedding backend into fresh agents
pub struct DefaultAgentFactory {
    llm: Arc<dyn LlmClient>,
    embeddings: Arc<dyn EmbeddingBackend>,
    agent_config: AgentConfig,
    memory_config: MemoryConfig,
}

impl DefaultAgentFactory {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        embeddings: Arc<dyn EmbeddingBackend>,
        agent_config: AgentConfig,
        memory_config: MemoryConfig,
    ) -> Self {
        Self {
            llm,
            embeddings,
            agent_config,
            memory_config,
        }
    }
}

#[async_trait]
impl AgentFactory for DefaultAgentFactory {
    async fn create(&self, session_id: &str) -> RagResult<SessionAgent> {
        self.memory_config.validate()?;
        let memory = AgentMemory::new(
            session_id,
            self.memory_config.clone(),
            self.embeddings.clone(),
        );
        Ok(SessionAgent::new(
            self.llm.clone(),
            memory,
            self.agent_config.clone(),
        ))
    }
}

struct SessionSlot {
    cell: OnceCell<Arc<SessionAgent>>,
    last_access: Mutex<Instant>,
}

impl SessionSlot {
    fn new() -> Self {
        Self {
            cell: OnceCell::new(),
            last_access: Mutex::new(Instant::now()),
        }
    }

    fn touch(&self) {
        *self.last_access.lock() = Instant::now();
    }

    fn last_access(&self) -> Instant {
        *self.last_access.lock()
    }

    fn retire(&self, session_id: &str) {
        if let Some(agent) = self.cell.get() {
            agent.memory().purge();
        }
        debug!(session_id = %session_id, "Session slot retired");
    }
}

/// Registry of live session agents
pub struct SessionRegistry {
    slots: DashMap<String, Arc<SessionSlot>>,
    factory: Arc<dyn AgentFactory>,
    config: RegistryConfig,
}

impl SessionRegistry {
    pub fn new(factory: Arc<dyn AgentFactory>, config: RegistryConfig) -> Self {
        Self {
            slots: DashMap::new(),
            factory,
            config,
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Agent for `session_id`, created on first use
    ///
    /// Repeated calls return the same agent. A failed construction is reported to the
    /// caller and not cached, so the next call tries again.
    pub async fn get_or_create(&self, session_id: &str) -> RagResult<Arc<SessionAgent>> {
        if session_id.trim().is_empty() {
            return Err(RagError::validation("session_id", "must not be empty", ""));
        }

        let existing = self.slots.get(session_id).map(|slot| slot.value().clone());
        let slot = match existing {
            Some(slot) => slot,
            None => self
                .slots
                .entry(session_id.to_string())
                .or_insert_with(|| Arc::new(SessionSlot::new()))
                .value()
                .clone(),
        };
        slot.touch();

        let created = AtomicBool::new(false);
        let created_flag = &created;
        let factory = &self.factory;
        let result = slot
            .cell
            .get_or_try_init(|| async move {
                info!(session_id = %session_id, "Initializing agent for session");
                let agent = factory.create(session_id).await?;
                created_flag.store(true, Ordering::SeqCst);
                Ok::<_, RagError>(Arc::new(agent))
            })
            .await;

        match result {
            Ok(agent) => {
                let agent = agent.clone();
                if created.load(Ordering::SeqCst) {
                    self.enforce_capacity(session_id);
                }
                Ok(agent)
            }
            Err(e) => {
                warn!(session_id = %session_id, error = %e, "Agent construction failed");
                // drop the empty slot unless another caller is still waiting on it
                self.slots.remove_if(session_id, |_, current| {
                    Arc::ptr_eq(current, &slot)
                        && !current.cell.initialized()
                        && Arc::strong_count(current) == 2
                });
                Err(RagError::registry(session_id, e))
            }
        }
    }

    /// Agent for `session_id` if one is live; refreshes its recency
    pub fn get(&self, session_id: &str) -> Option<Arc<SessionAgent>> {
        let slot = self.slots.get(session_id).map(|slot| slot.value().clone())?;
        let agent = slot.cell.get()?.clone();
        slot.touch();
        Some(agent)
    }

    /// Drop a session; its memory goes with it
    pub fn remove(&self, session_id: &str) -> Option<Arc<SessionAgent>> {
        let (_, slot) = self.slots.remove(session_id)?;
        info!(session_id = %session_id, "Removed session");
        slot.retire(session_id);
        slot.cell.get().cloned()
    }

    /// Number of live sessions
    pub fn len(&self) -> usize {
        self.slots
            .iter()
            .filter(|entry| entry.value().cell.initialized())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids of live sessions
    pub fn session_ids(&self) -> Vec<String> {
        self.slots
            .iter()
            .filter(|entry| entry.value().cell.initialized())
            .map(|entry| entry.key().clone())
            .collect()
    }

    /// Drop slots idle longer than the TTL; returns how many were dropped
    ///
    /// Empty slots left behind by failed constructions are dropped too once stale,
    /// unless a caller is still initializing them.
    pub fn evict_expired(&self) -> usize {
        let Some(ttl) = self.config.idle_ttl else {
            return 0;
        };

        let now = Instant::now();
        let mut evicted = 0;
        self.slots.retain(|session_id, slot| {
            if now.duration_since(slot.last_access()) < ttl {
                return true;
            }
            let expired = slot.cell.initialized() || Arc::strong_count(slot) == 1;
            if expired {
                info!(session_id = %session_id, "Evicting idle session");
                slot.retire(session_id);
                evicted += 1;
            }
            !expired
        });
        if evicted > 0 {
            debug!(evicted, remaining = self.slots.len(), "Idle sessions evicted");
        }
        evicted
    }

    /// Evict least recently used sessions until within capacity, sparing `keep`
    fn enforce_capacity(&self, keep: &str) {
        let Some(max_sessions) = self.config.max_sessions else {
            return;
        };

        let mut live: Vec<(String, Instant)> = self
            .slots
            .iter()
            .filter(|entry| entry.value().cell.initialized() && entry.key() != keep)
            .map(|entry| (entry.key().clone(), entry.value().last_access()))
            .collect();

        // `keep` itself occupies one place
        let excess = (live.len() + 1).saturating_sub(max_sessions);
        if excess == 0 {
            return;
        }

        live.sort_by_key(|(_, last_access)| *last_access);
        for (session_id, _) in live.into_iter().take(excess) {
            info!(session_id = %session_id, max_sessions, "Evicting least recently used session");
            if let Some((_, slot)) = self.slots.remove(&session_id) {
                slot.retire(&session_id);
            }
        }
    }
}

impl std::fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("sessions", &self.slots.len())
            .field("config", &self.config)
            .finish()
    }
}
