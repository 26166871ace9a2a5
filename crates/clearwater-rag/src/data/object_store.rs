//! Object storage downloads
//!
//! Objects are addressed as `s3://bucket/key` (or bare `bucket/key`). Two stores are
//! provided: a local directory laid out as `<root>/<bucket>/<key>`, and an
//! S3-compatible HTTP endpoint read with path-style GET requests.

use crate::error::{RagError, RagResult};
use async_trait::async_trait;
use bytes::Bytes;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

const SCHEME: &str = "s3://";

/// Bucket and key of one object
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectPath {
    pub bucket: String,
    pub key: String,
}

impl ObjectPath {
    pub fn parse(raw: &str) -> RagResult<Self> {
        let trimmed = raw.trim();
        let rest = trimmed.strip_prefix(SCHEME).unwrap_or(trimmed);
        match rest.split_once('/') {
            Some((bucket, key)) if !bucket.is_empty() && !key.is_empty() => Ok(Self {
                bucket: bucket.to_string(),
                key: key.to_string(),
            }),
            _ => Err(RagError::validation(
                "s3_path",
                "expected s3://bucket/key or bucket/key",
                raw,
            )),
        }
    }
}

impl FromStr for ObjectPath {
    type Err = RagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SCHEME}{}/{}", self.bucket, self.key)
    }
}

/// Read-only object storage
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch the whole object
    async fn get(&self, path: &ObjectPath) -> RagResult<Bytes>;
}

/// Objects stored under a local directory
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &ObjectPath) -> RagResult<PathBuf> {
        let relative = Path::new(&path.bucket).join(&path.key);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(RagError::validation(
                "s3_path",
                "must not leave the storage root",
                path.to_string(),
            ));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn get(&self, path: &ObjectPath) -> RagResult<Bytes> {
        let file = self.resolve(path)?;
        debug!(path = %path, file = %file.display(), "Reading object");
        match tokio::fs::read(&file).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(RagError::not_found("object", path.to_string()))
            }
            Err(e) => Err(RagError::storage("read object", e)),
        }
    }
}

/// S3-compatible endpoint read with path-style URLs
#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct HttpObjectStore {
    client: reqwest::Client,
    endpoint: String,
}

#[cfg(feature = "http")]
impl HttpObjectStore {
    pub fn new(endpoint: impl Into<String>, timeout: std::time::Duration) -> RagResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RagError::Config(format!("object store client: {e}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &ObjectPath) -> String {
        format!("{}/{}/{}", self.endpoint, path.bucket, path.key)
    }
}

#[cfg(feature = "http")]
#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn get(&self, path: &ObjectPath) -> RagResult<Bytes> {
        let url = self.url(path);
        debug!(path = %path, url = %url, "Downloading object");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RagError::object_store(path.to_string(), e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(RagError::not_found("object", path.to_string()));
        }
        if !status.is_success() {
            return Err(RagError::object_store(
                path.to_string(),
                format!("endpoint returned {status}"),
            ));
        }

        response
            .bytes()
            .await
            .map_err(|e| RagError::object_store(path.to_string(), e.to_string()))
    }
}
