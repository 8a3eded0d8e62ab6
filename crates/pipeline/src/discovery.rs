//! Source file discovery.

use simscene_config::InputConfig;
use simscene_core::error::Error;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Files directly inside `dir` whose extension matches, sorted by path.
///
/// Subdirectories are not descended into. Extension comparison ignores
/// ASCII case and a leading dot in `extension`.
pub fn discover_sources(dir: &Path, extension: &str) -> Result<Vec<PathBuf>, Error> {
    let extension = extension.trim_start_matches('.');
    let read_dir = std::fs::read_dir(dir).map_err(|e| Error::Discovery {
        path: dir.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut files = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|e| Error::Discovery {
            path: dir.to_path_buf(),
            reason: e.to_string(),
        })?;
        let path = entry.path();
        if path.is_file()
            && path
                .extension()
                .is_some_and(|e| e.to_string_lossy().eq_ignore_ascii_case(extension))
        {
            files.push(path);
        }
    }

    files.sort();
    debug!("Discovered {} .{extension} files in {}", files.len(), dir.display());
    Ok(files)
}

/// The files a batch should process: the explicit list when configured,
/// otherwise everything discovered in the input directory.
pub fn resolve_sources(input: &InputConfig) -> Result<Vec<PathBuf>, Error> {
    if input.files.is_empty() {
        return discover_sources(&input.dir, &input.extension);
    }

    Ok(input
        .files
        .iter()
        .map(|f| if f.is_absolute() { f.clone() } else { input.dir.join(f) })
        .collect())
}
