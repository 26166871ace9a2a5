use crate::config::{EmbeddingBackendKind, ObjectStoreKind, ServerConfig};
use anyhow::Context;
use clearwater_llm::{Client, LlmClient};
use clearwater_rag::agent::memory::{
    EmbeddingBackend, HashEmbeddingProvider, RemoteEmbeddingBackend, StaticEmbeddingBackend,
};
use clearwater_rag::agent::{DefaultAgentFactory, SessionRegistry};
use clearwater_rag::data::{
    HttpObjectStore, InventoryStore, Knowledgebase, LocalObjectStore, ObjectStore,
};
use clearwater_rag::service::{FeedbackService, QueryService};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Shared handles for request handlers
#[derive(Clone)]
pub struct AppState {
    pub query: QueryService,
    pub feedback: Arc<FeedbackService>,
    pub inventory: InventoryStore,
    pub knowledgebase: Knowledgebase,
    pub objects: Arc<dyn ObjectStore>,
}

impl AppState {
    /// Wire everything against the configured model gateway
    pub fn from_config(config: &ServerConfig) -> anyhow::Result<Self> {
        let client = Arc::new(
            Client::new(config.llm.clone()).context("failed to build model gateway client")?,
        );
        info!(
            base_url = %config.llm.base_url,
            chat_model = %config.llm.chat_model,
            "Model gateway configured"
        );

        let embeddings: Arc<dyn EmbeddingBackend> = match config.memory.embedding_backend {
            EmbeddingBackendKind::Remote => Arc::new(RemoteEmbeddingBackend::new(
                client.clone(),
                config.memory.embedding_dimensions,
            )),
            EmbeddingBackendKind::Hash => Arc::new(StaticEmbeddingBackend::new(
                HashEmbeddingProvider::new(config.memory.embedding_dimensions.max(1)),
            )),
        };

        Self::new(client, embeddings, config)
    }

    /// Wire everything around an existing chat model and embedding backend
    pub fn new(
        llm: Arc<dyn LlmClient>,
        embeddings: Arc<dyn EmbeddingBackend>,
        config: &ServerConfig,
    ) -> anyhow::Result<Self> {
        config.validate()?;

        let factory = DefaultAgentFactory::new(
            llm,
            embeddings,
            config.agent.agent_config(),
            config.memory.memory_config(),
        );
        let registry = Arc::new(SessionRegistry::new(
            Arc::new(factory),
            config.registry.registry_config(),
        ));

        let objects: Arc<dyn ObjectStore> = match config.object_store.kind {
            ObjectStoreKind::Local => Arc::new(LocalObjectStore::new(&config.object_store.root)),
            ObjectStoreKind::Http => {
                let endpoint = config
                    .object_store
                    .endpoint
                    .clone()
                    .context("object_store.endpoint is not set")?;
                Arc::new(HttpObjectStore::new(
                    endpoint,
                    Duration::from_secs(config.object_store.timeout_secs),
                )?)
            }
        };

        Ok(Self {
            query: QueryService::new(registry),
            feedback: Arc::new(FeedbackService::new(config.feedback.capacity)),
            inventory: InventoryStore::new(&config.data.inventory_csv),
            knowledgebase: Knowledgebase::new(&config.data.knowledgebase),
            objects,
        })
    }

    pub fn registry(&self) -> &Arc<SessionRegistry> {
        self.query.registry()
    }
}
