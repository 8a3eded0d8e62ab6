//! In-memory source — useful for testing the batch without SQLite files.

use async_trait::async_trait;
use simscene_core::error::SourceError;
use simscene_core::model::SourceData;
use simscene_core::source::{SourceSummary, TrackSource};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// A source that serves pre-built results keyed by path.
///
/// Paths that were never registered fail like a missing file would.
pub struct InMemorySource {
    entries: Arc<RwLock<HashMap<PathBuf, Result<SourceData, SourceError>>>>,
    reads: Arc<RwLock<Vec<PathBuf>>>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            reads: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Register the data returned for `path`.
    pub async fn insert(&self, path: impl Into<PathBuf>, data: SourceData) {
        self.entries.write().await.insert(path.into(), Ok(data));
    }

    /// Register an error returned for `path`.
    pub async fn insert_failure(&self, path: impl Into<PathBuf>, error: SourceError) {
        self.entries.write().await.insert(path.into(), Err(error));
    }

    /// Paths read so far, in call order.
    pub async fn reads(&self) -> Vec<PathBuf> {
        self.reads.read().await.clone()
    }

    async fn lookup(&self, path: &Path) -> Result<SourceData, SourceError> {
        self.reads.write().await.push(path.to_path_buf());
        match self.entries.read().await.get(path) {
            Some(result) => result.clone(),
            None => Err(SourceError::Open {
                path: path.to_path_buf(),
                reason: "no such file".into(),
            }),
        }
    }
}

impl Default for InMemorySource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TrackSource for InMemorySource {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn read(&self, path: &Path) -> Result<SourceData, SourceError> {
        self.lookup(path).await
    }

    async fn inspect(&self, path: &Path) -> Result<SourceSummary, SourceError> {
        let data = self.lookup(path).await?;
        Ok(SourceSummary {
            tables: vec![],
            trajectory_table: None,
            accepted_tracks: data.tracks.len(),
            accepted_samples: data.sample_count(),
            issues: vec![],
        })
    }
}
