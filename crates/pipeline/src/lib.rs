//! Batch pipeline — discover sources, convert each file, write one scenario.
//!
//! ```text
//! resolve_sources ──► Batch::run ──► write_document
//!                      │  per file: file id → TrackSource::read → assemble_source
//!                      └─ failures are recorded and skipped
//! ```

pub mod batch;
pub mod discovery;
pub mod output;

pub use batch::{Batch, BatchOutcome, BatchReport, FileFailure, FileReport};
pub use discovery::{discover_sources, resolve_sources};
pub use output::{render_document, write_document};

use simscene_config::AppConfig;
use simscene_core::error::Result;
use simscene_core::source::TrackSource;
use std::sync::Arc;
use tracing::info;

/// Run a full conversion as configured and write the output document.
///
/// Only discovery and output failures are returned as errors; per-file
/// failures end up in the report.
pub async fn convert(config: &AppConfig, source: Arc<dyn TrackSource>) -> Result<BatchOutcome> {
    info!(
        "Target sample rate {} Hz (waypoints keep the recorded rate)",
        config.batch.sample_rate_hz
    );
    let files = resolve_sources(&config.input)?;
    let batch = Batch::from_config(config, source)?;
    let outcome = batch.run(&files).await;

    info!(
        "Saving {} agents to {}",
        outcome.document.len(),
        config.output.path.display()
    );
    write_document(&config.output.path, &outcome.document).await?;
    Ok(outcome)
}
