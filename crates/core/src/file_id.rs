//! File identifiers parsed from source filenames.
//!
//! `intsc_data_769.db` carries the identifier `769`: the stem component after
//! the final underscore. The pattern is an explicit regex with a named `id`
//! group, so a filename that does not fit fails loudly instead of yielding
//! the whole stem.

use crate::error::FilenameError;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Default pattern, applied to the file stem.
pub const DEFAULT_FILE_ID_PATTERN: &str = r"^.+_(?P<id>[^_]+)$";

/// Identifier of one source file, prefixed to every agent id it produces.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(String);

impl FileId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compiled filename pattern.
#[derive(Debug, Clone)]
pub struct FileIdParser {
    regex: Regex,
}

impl FileIdParser {
    /// Compile a pattern; it must contain a named `id` group.
    pub fn new(pattern: &str) -> Result<Self, FilenameError> {
        let regex = Regex::new(pattern).map_err(|e| FilenameError::BadPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        if !regex.capture_names().any(|name| name == Some("id")) {
            return Err(FilenameError::BadPattern {
                pattern: pattern.to_string(),
                reason: "missing named group `id`".into(),
            });
        }
        Ok(Self { regex })
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    /// Extract the file id from `path`'s stem.
    pub fn parse(&self, path: &Path) -> Result<FileId, FilenameError> {
        let stem = path
            .file_stem()
            .ok_or_else(|| FilenameError::NotUtf8(path.to_path_buf()))?
            .to_str()
            .ok_or_else(|| FilenameError::NotUtf8(path.to_path_buf()))?;

        self.regex
            .captures(stem)
            .and_then(|caps| caps.name("id"))
            .map(|m| m.as_str())
            .filter(|id| !id.is_empty())
            .map(FileId::new)
            .ok_or_else(|| FilenameError::NoMatch {
                file_name: path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                pattern: self.pattern().to_string(),
            })
    }
}

/// Parse with the default pattern.
pub fn parse_file_id(path: &Path) -> Result<FileId, FilenameError> {
    FileIdParser::new(DEFAULT_FILE_ID_PATTERN)?.parse(path)
}
