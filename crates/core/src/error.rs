//! Error types for the SimScene domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use std::path::PathBuf;
use thiserror::Error;

/// The top-level error type for all SimScene operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Source errors ---
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    // --- Filename errors ---
    #[error("Filename error: {0}")]
    Filename(#[from] FilenameError),

    // --- Assembly errors ---
    #[error("Assembly error: {0}")]
    Assembly(#[from] AssemblyError),

    // --- Output errors ---
    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    // --- Discovery ---
    #[error("Cannot list source directory {path}: {reason}")]
    Discovery { path: PathBuf, reason: String },
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures while reading a single source database.
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    #[error("Cannot open source {path}: {reason}")]
    Open { path: PathBuf, reason: String },

    #[error("Schema error: table `{0}` not found")]
    MissingTable(String),

    #[error("Schema error: no trajectory table matches `{pattern}`")]
    NoTrajectoryTable { pattern: String },

    #[error("Schema error: trajectory pattern `{pattern}` is ambiguous, candidates: {}", candidates.join(", "))]
    AmbiguousTrajectoryTable {
        pattern: String,
        candidates: Vec<String>,
    },

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Malformed row in `{table}`: {reason}")]
    MalformedRow { table: String, reason: String },
}

impl SourceError {
    /// Whether this error means the file does not have the expected layout.
    pub fn is_schema(&self) -> bool {
        matches!(
            self,
            SourceError::MissingTable(_)
                | SourceError::NoTrajectoryTable { .. }
                | SourceError::AmbiguousTrajectoryTable { .. }
        )
    }
}

/// A source filename that does not carry a usable file identifier.
#[derive(Debug, Clone, Error)]
pub enum FilenameError {
    #[error("Invalid filename `{file_name}`: does not match `{pattern}`")]
    NoMatch { file_name: String, pattern: String },

    #[error("Invalid filename: {0} is not valid UTF-8")]
    NotUtf8(PathBuf),

    #[error("Invalid file id pattern `{pattern}`: {reason}")]
    BadPattern { pattern: String, reason: String },
}

#[derive(Debug, Clone, Error)]
pub enum AssemblyError {
    #[error("Track {track_id}: {samples} samples but {headings} headings")]
    HeadingMismatch {
        track_id: String,
        samples: usize,
        headings: usize,
    },
}

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write {path}: {reason}")]
    Write { path: PathBuf, reason: String },

    #[error("Failed to serialize scenario: {0}")]
    Serialize(#[from] serde_json::Error),
}
