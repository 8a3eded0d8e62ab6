//! Scenario document output.

use simscene_core::error::OutputError;
use simscene_core::model::ScenarioDocument;
use std::path::Path;
use tracing::info;

/// Pretty-printed JSON (two-space indentation), keys in sorted order.
pub fn render_document(document: &ScenarioDocument) -> Result<String, OutputError> {
    Ok(serde_json::to_string_pretty(document)?)
}

/// Write the document to `path`, replacing any existing file.
///
/// Missing parent directories are created.
pub async fn write_document(path: &Path, document: &ScenarioDocument) -> Result<(), OutputError> {
    let json = render_document(document)?;
    let write_err = |e: std::io::Error| OutputError::Write {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }
    tokio::fs::write(path, json.as_bytes())
        .await
        .map_err(write_err)?;

    info!("Wrote {} agents to {}", document.len(), path.display());
    Ok(())
}
