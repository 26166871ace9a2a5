//! Embeddings for long-term recall
//!
//! The embedding model is reached through [`EmbeddingProvider`]. Because connecting to
//! a hosted model costs a vendor round-trip, providers are produced by an
//! [`EmbeddingBackend`] and held in [`LazyEmbeddings`], which connects on first use
//! and caches the provider for the lifetime of the owning memory.

use crate::error::{RagError, RagResult};
use async_trait::async_trait;
use clearwater_llm::EmbeddingClient;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::info;

/// A dense embedding vector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embedding {
    /// The vector components
    pub vector: Vec<f32>,

    /// Model used to generate the embedding
    pub model: String,
}

impl Embedding {
    /// Create a new embedding
    pub fn new(vector: Vec<f32>, model: impl Into<String>) -> Self {
        Self {
            vector,
            model: model.into(),
        }
    }

    /// Dimensionality of the embedding
    pub fn dimensions(&self) -> usize {
        self.vector.len()
    }

    /// Cosine similarity in `[-1, 1]`; zero vectors score 0
    pub fn cosine_similarity(&self, other: &Embedding) -> RagResult<f32> {
        if self.dimensions() != other.dimensions() {
            return Err(RagError::validation(
                "embedding_dimensions",
                "dimensions must match",
                format!("{} vs {}", self.dimensions(), other.dimensions()),
            ));
        }

        let mut dot = 0.0f32;
        let mut norm_a = 0.0f32;
        let mut norm_b = 0.0f32;
        for (a, b) in self.vector.iter().zip(&other.vector) {
            dot += a * b;
            norm_a += a * a;
            norm_b += b * b;
        }

        if norm_a == 0.0 || norm_b == 0.0 {
            return Ok(0.0);
        }

        Ok(dot / (norm_a.sqrt() * norm_b.sqrt()))
    }
}

/// Generates embeddings for text
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding for the given text
    async fn embed(&self, text: &str) -> RagResult<Embedding>;

    /// Get the model name
    fn model_name(&self) -> &str;

    /// Get the embedding dimensions (0 when unknown until the first call)
    fn dimensions(&self) -> usize;
}

/// Produces an [`EmbeddingProvider`] on demand
#[async_trait]
pub trait EmbeddingBackend: Send + Sync {
    /// Build or connect the provider
    async fn connect(&self) -> RagResult<Arc<dyn EmbeddingProvider>>;
}

/// Feature-hashing embedder that runs fully offline
///
/// Each lowercase alphanumeric token is hashed into one signed dimension and the result
/// is L2-normalized, so texts sharing vocabulary score higher. Suitable for demos and
/// tests, not for semantic quality.
pub struct HashEmbeddingProvider {
    dimensions: usize,
}

impl HashEmbeddingProvider {
    /// Create a new hash-based embedding provider
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    fn hash_embed(&self, text: &str) -> Vec<f32> {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut vector = vec![0.0f32; self.dimensions];
        let tokens = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(|t| t.to_lowercase());

        for token in tokens {
            let mut hasher = DefaultHasher::new();
            token.hash(&mut hasher);
            let hash = hasher.finish();
            let index = (hash % self.dimensions as u64) as usize;
            let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
            vector[index] += sign;
        }

        let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|x| *x /= norm);
        }
        vector
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbeddingProvider {
    async fn embed(&self, text: &str) -> RagResult<Embedding> {
        Ok(Embedding::new(self.hash_embed(text), self.model_name()))
    }

    fn model_name(&self) -> &str {
        "hash-embedding"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// Backend that hands out an already-built provider
pub struct StaticEmbeddingBackend {
    provider: Arc<dyn EmbeddingProvider>,
}

impl StaticEmbeddingBackend {
    /// Wrap a provider
    pub fn new(provider: impl EmbeddingProvider + 'static) -> Self {
        Self {
            provider: Arc::new(provider),
        }
    }
}

#[async_trait]
impl EmbeddingBackend for StaticEmbeddingBackend {
    async fn connect(&self) -> RagResult<Arc<dyn EmbeddingProvider>> {
        Ok(self.provider.clone())
    }
}

/// Provider backed by the hosted embedding model
pub struct RemoteEmbeddingProvider {
    client: Arc<dyn EmbeddingClient>,
    model: String,
    dimensions: usize,
}

#[async_trait]
impl EmbeddingProvider for RemoteEmbeddingProvider {
    async fn embed(&self, text: &str) -> RagResult<Embedding> {
        let vector = self.client.embed(text).await?;
        if self.dimensions != 0 && vector.len() != self.dimensions {
            return Err(RagError::memory_backend(
                "embed",
                format!(
                    "model {} returned {} dimensions, expected {}",
                    self.model,
                    vector.len(),
                    self.dimensions
                ),
            ));
        }
        Ok(Embedding::new(vector, self.model.clone()))
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// Backend connecting to the hosted embedding model
pub struct RemoteEmbeddingBackend {
    client: Arc<dyn EmbeddingClient>,
    dimensions: usize,
}

impl RemoteEmbeddingBackend {
    /// Create a backend; `dimensions == 0` skips the dimension check
    pub fn new(client: Arc<dyn EmbeddingClient>, dimensions: usize) -> Self {
        Self { client, dimensions }
    }
}

#[async_trait]
impl EmbeddingBackend for RemoteEmbeddingBackend {
    async fn connect(&self) -> RagResult<Arc<dyn EmbeddingProvider>> {
        let model = self.client.embedding_model().trim().to_string();
        if model.is_empty() {
            return Err(RagError::memory_backend(
                "connect",
                "embedding model name is empty",
            ));
        }
        Ok(Arc::new(RemoteEmbeddingProvider {
            client: self.client.clone(),
            model,
            dimensions: self.dimensions,
        }))
    }
}

/// Connect-once cell around an [`EmbeddingBackend`]
///
/// Concurrent first callers share a single connection attempt. A failed attempt is not
/// cached; the next call tries again.
pub struct LazyEmbeddings {
    backend: Arc<dyn EmbeddingBackend>,
    provider: OnceCell<Arc<dyn EmbeddingProvider>>,
    timeout: Duration,
}

impl LazyEmbeddings {
    /// Create an unconnected cell
    pub fn new(backend: Arc<dyn EmbeddingBackend>, timeout: Duration) -> Self {
        Self {
            backend,
            provider: OnceCell::new(),
            timeout,
        }
    }

    /// Whether the provider has been connected
    pub fn is_initialized(&self) -> bool {
        self.provider.initialized()
    }

    /// Get the provider, connecting on first use
    pub async fn provider(&self) -> RagResult<&Arc<dyn EmbeddingProvider>> {
        self.provider
            .get_or_try_init(|| async {
                info!("Initializing embedding model");
                self.backend.connect().await
            })
            .await
    }

    /// Embed text under the configured timeout
    pub async fn embed(&self, text: &str) -> RagResult<Embedding> {
        let provider = self.provider().await?;
        match tokio::time::timeout(self.timeout, provider.embed(text)).await {
            Ok(result) => result,
            Err(_) => Err(RagError::timeout("embed", self.timeout)),
        }
    }
}

/// Search result with similarity score
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult<T> {
    /// The item that was found
    pub item: T,

    /// Cosine similarity, higher is more similar
    pub score: f32,
}

impl<T> SearchResult<T> {
    /// Create a new search result
    pub fn new(item: T, score: f32) -> Self {
        Self { item, score }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CountingBackend, FailingEmbeddingProvider};
    use std::sync::atomic::Ordering;

    #[test]
    fn test_cosine_similarity() {
        let a = Embedding::new(vec![1.0, 0.0, 0.0], "test");
        let b = Embedding::new(vec![1.0, 0.0, 0.0], "test");
        let c = Embedding::new(vec![0.0, 1.0, 0.0], "test");
        let zero = Embedding::new(vec![0.0, 0.0, 0.0], "test");

        assert!((a.cosine_similarity(&b).unwrap() - 1.0).abs() < 1e-6);
        assert!(a.cosine_similarity(&c).unwrap().abs() < 1e-6);
        assert_eq!(a.cosine_similarity(&zero).unwrap(), 0.0);
    }

    #[test]
    fn test_cosine_similarity_dimension_mismatch() {
        let a = Embedding::new(vec![1.0, 0.0], "test");
        let b = Embedding::new(vec![1.0, 0.0, 0.0], "test");
        assert!(matches!(
            a.cosine_similarity(&b),
            Err(RagError::Validation { .. })
        ));
    }

    #[tokio::test]
    async fn test_hash_embedding_shares_vocabulary() {
        let provider = HashEmbeddingProvider::new(256);

        let stock = provider.embed("total quantity in stock").await.unwrap();
        let same = provider.embed("Total quantity in STOCK").await.unwrap();
        let related = provider.embed("quantity of widgets in stock").await.unwrap();
        let unrelated = provider.embed("weather forecast tomorrow").await.unwrap();

        assert_eq!(stock.dimensions(), 256);
        assert!((stock.cosine_similarity(&same).unwrap() - 1.0).abs() < 1e-6);
        assert!(
            stock.cosine_similarity(&related).unwrap()
                > stock.cosine_similarity(&unrelated).unwrap()
        );
    }

    #[tokio::test]
    async fn test_lazy_embeddings_connect_once() {
        let backend = Arc::new(CountingBackend::new());
        let lazy = LazyEmbeddings::new(backend.clone(), Duration::from_secs(5));
        assert!(!lazy.is_initialized());

        let (a, b) = tokio::join!(lazy.embed("one"), lazy.embed("two"));
        a.unwrap();
        b.unwrap();
        lazy.embed("three").await.unwrap();

        assert!(lazy.is_initialized());
        assert_eq!(backend.connects.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_lazy_embeddings_retry_after_failed_connect() {
        let backend = Arc::new(CountingBackend::failing_first(1));
        let lazy = LazyEmbeddings::new(backend.clone(), Duration::from_secs(5));

        assert!(lazy.embed("one").await.is_err());
        assert!(!lazy.is_initialized());
        assert!(lazy.embed("one").await.is_ok());
        assert_eq!(backend.connects.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_lazy_embeddings_surface_provider_errors() {
        let backend = Arc::new(StaticEmbeddingBackend::new(FailingEmbeddingProvider));
        let lazy = LazyEmbeddings::new(backend, Duration::from_secs(5));

        let err = lazy.embed("anything").await.unwrap_err();
        assert!(matches!(err, RagError::MemoryBackend { .. }));
    }
}
