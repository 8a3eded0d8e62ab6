//! Source trait — where raw tracks and trajectories come from.
//!
//! One call reads one source file end to end. Implementations own any
//! connection they open and must release it before returning, on success
//! and on failure alike.

use crate::error::SourceError;
use crate::model::SourceData;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Schema overview of one source, as reported by `inspect`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceSummary {
    /// Every user table in the file
    pub tables: Vec<String>,

    /// The trajectory table that would be read, if exactly one resolves
    pub trajectory_table: Option<String>,

    /// Accepted-category track rows
    pub accepted_tracks: usize,

    /// Samples belonging to accepted tracks
    pub accepted_samples: usize,

    /// Problems that would make a conversion of this file fail
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<String>,
}

/// The core TrackSource trait.
///
/// Implementations: SQLite, in-memory (for testing).
#[async_trait]
pub trait TrackSource: Send + Sync {
    /// The source name (e.g., "sqlite", "in_memory").
    fn name(&self) -> &str;

    /// Read accepted tracks and their time-ordered samples.
    ///
    /// A file with no accepted tracks yields an empty [`SourceData`], not an error.
    async fn read(&self, path: &Path) -> std::result::Result<SourceData, SourceError>;

    /// Describe the layout of a source without assembling anything.
    async fn inspect(&self, path: &Path) -> std::result::Result<SourceSummary, SourceError>;
}
