//! Flat-file knowledgebase search

use crate::error::{RagError, RagResult};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Line-oriented text file searched by substring
#[derive(Debug, Clone)]
pub struct Knowledgebase {
    path: PathBuf,
}

impl Knowledgebase {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Trimmed lines containing `query`, ignoring case, in file order
    pub async fn search(&self, query: &str) -> RagResult<Vec<String>> {
        if query.trim().is_empty() {
            return Err(RagError::validation("query", "must not be empty", query));
        }

        let text = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                RagError::not_found("knowledgebase", self.path.display().to_string())
            } else {
                RagError::storage("read knowledgebase", e)
            }
        })?;

        let needle = query.to_lowercase();
        let results: Vec<String> = text
            .lines()
            .filter(|line| line.to_lowercase().contains(&needle))
            .map(|line| line.trim().to_string())
            .collect();
        debug!(query = %query, matches = results.len(), "Knowledgebase searched");
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn knowledgebase() -> (NamedTempFile, Knowledgebase) {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "  Settlement happens T+2 for equities.  ").unwrap();
        writeln!(file, "Trade breaks are reconciled nightly.").unwrap();
        writeln!(file, "FX settlement follows CLS cycles.").unwrap();
        let kb = Knowledgebase::new(file.path());
        (file, kb)
    }

    #[tokio::test]
    async fn test_case_insensitive_search() {
        let (_file, kb) = knowledgebase();
        let results = kb.search("SETTLEMENT").await.unwrap();

        assert_eq!(
            results,
            vec![
                "Settlement happens T+2 for equities.",
                "FX settlement follows CLS cycles."
            ]
        );
        assert!(kb.search("options").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_query_rejected() {
        let (_file, kb) = knowledgebase();
        let err = kb.search("  ").await.unwrap_err();
        assert!(err.is_client_error());
    }

    #[tokio::test]
    async fn test_missing_file() {
        let kb = Knowledgebase::new("/nonexistent/knowledgebase.txt");
        let err = kb.search("trade").await.unwrap_err();
        assert!(matches!(err, RagError::NotFound { .. }));
    }
}
