//! Server configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional TOML file
//! (`clearwater.toml` unless a path is given), then `CLEARWATER__*` environment
//! variables using `__` between section and key, e.g. `CLEARWATER__HTTP__PORT=9000`.

use anyhow::Context;
use clearwater_llm::ClientConfig;
use clearwater_rag::agent::memory::MemoryConfig;
use clearwater_rag::agent::{AgentConfig, RegistryConfig};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_CONFIG_FILE: &str = "clearwater";
const ENV_PREFIX: &str = "CLEARWATER";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub http: HttpSettings,
    pub llm: ClientConfig,
    pub memory: MemorySettings,
    pub registry: RegistrySettings,
    pub agent: AgentSettings,
    pub data: DataSettings,
    pub object_store: ObjectStoreSettings,
    pub feedback: FeedbackSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins; empty or `*` allows any
    pub cors_origins: Vec<String>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: Vec::new(),
        }
    }
}

impl HttpSettings {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackendKind {
    /// Hosted embedding model behind the gateway
    Remote,
    /// Local feature hashing, for demos and offline runs
    Hash,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MemorySettings {
    pub similarity_top_k: usize,
    pub max_turns: Option<usize>,
    pub embed_timeout_secs: u64,
    pub embedding_backend: EmbeddingBackendKind,
    /// Expected vector size (0 skips the check for remote embeddings)
    pub embedding_dimensions: usize,
}

impl Default for MemorySettings {
    fn default() -> Self {
        Self {
            similarity_top_k: 5,
            max_turns: None,
            embed_timeout_secs: 30,
            embedding_backend: EmbeddingBackendKind::Remote,
            embedding_dimensions: 1024,
        }
    }
}

impl MemorySettings {
    pub fn memory_config(&self) -> MemoryConfig {
        let config = MemoryConfig::default()
            .with_similarity_top_k(self.similarity_top_k)
            .with_embed_timeout(Duration::from_secs(self.embed_timeout_secs));
        match self.max_turns {
            Some(max_turns) => config.with_max_turns(max_turns),
            None => config,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegistrySettings {
    pub max_sessions: Option<usize>,
    pub idle_ttl_secs: Option<u64>,
    /// How often idle sessions are swept
    pub sweep_interval_secs: u64,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        let defaults = RegistryConfig::default();
        Self {
            max_sessions: defaults.max_sessions,
            idle_ttl_secs: defaults.idle_ttl.map(|ttl| ttl.as_secs()),
            sweep_interval_secs: 300,
        }
    }
}

impl RegistrySettings {
    pub fn registry_config(&self) -> RegistryConfig {
        RegistryConfig {
            max_sessions: self.max_sessions,
            idle_ttl: self.idle_ttl_secs.map(Duration::from_secs),
        }
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    pub system_prompt: Option<String>,
    pub vendor_timeout_secs: u64,
    pub recall_top_k: usize,
}

impl Default for AgentSettings {
    fn default() -> Self {
        let defaults = AgentConfig::default();
        Self {
            system_prompt: None,
            vendor_timeout_secs: defaults.vendor_timeout.as_secs(),
            recall_top_k: defaults.recall_top_k,
        }
    }
}

impl AgentSettings {
    pub fn agent_config(&self) -> AgentConfig {
        let config = AgentConfig::default()
            .with_vendor_timeout(Duration::from_secs(self.vendor_timeout_secs))
            .with_recall_top_k(self.recall_top_k);
        match &self.system_prompt {
            Some(prompt) => config.with_system_prompt(prompt.clone()),
            None => config,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub inventory_csv: PathBuf,
    pub knowledgebase: PathBuf,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            inventory_csv: PathBuf::from("data/inventory_data.csv"),
            knowledgebase: PathBuf::from("data/knowledgebase.txt"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectStoreKind {
    /// `<root>/<bucket>/<key>` on the local filesystem
    Local,
    /// Path-style GET against an S3-compatible endpoint
    Http,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ObjectStoreSettings {
    pub kind: ObjectStoreKind,
    pub root: PathBuf,
    pub endpoint: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ObjectStoreSettings {
    fn default() -> Self {
        Self {
            kind: ObjectStoreKind::Local,
            root: PathBuf::from("data/objects"),
            endpoint: None,
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedbackSettings {
    pub capacity: usize,
}

impl Default for FeedbackSettings {
    fn default() -> Self {
        Self { capacity: 1000 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter when `RUST_LOG` is unset
    pub level: String,
    /// Emit newline-delimited JSON
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl ServerConfig {
    /// Load defaults, then the config file, then the environment
    ///
    /// An explicitly given file must exist; the default `clearwater.toml` is optional.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let file = match path {
            Some(path) => ::config::File::from(path).required(true),
            None => ::config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let config: Self = ::config::Config::builder()
            .add_source(file)
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("failed to read configuration")?
            .try_deserialize()
            .context("invalid configuration")?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.llm.validate()?;
        self.memory.memory_config().validate()?;
        self.registry.registry_config().validate()?;
        if self.object_store.kind == ObjectStoreKind::Http && self.object_store.endpoint.is_none()
        {
            anyhow::bail!("object_store.endpoint is required when object_store.kind = \"http\"");
        }
        Ok(())
    }
}
