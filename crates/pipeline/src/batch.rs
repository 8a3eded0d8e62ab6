//! Batch orchestration — every source file into one scenario document.
//!
//! Each file is converted on its own: filename → file id, source read,
//! agent assembly. A file that fails at any step is logged, recorded in the
//! [`BatchReport`] and contributes no agents; the batch always continues.
//!
//! The document is an explicit accumulator folded over per-file results in
//! input order. With `max_concurrent_files > 1` several files are read at
//! once, but results are still merged in input order, so the output does
//! not depend on which read finishes first.

use futures::stream::{self, StreamExt};
use serde::Serialize;
use simscene_config::AppConfig;
use simscene_core::assembler::{DimensionDefaults, assemble_source};
use simscene_core::error::{Error, FilenameError};
use simscene_core::file_id::{FileId, FileIdParser};
use simscene_core::model::{AgentRecord, ScenarioDocument};
use simscene_core::source::TrackSource;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Per-file conversion summary.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub file_id: FileId,
    /// Accepted tracks found in the file
    pub tracks: usize,
    /// Agents the file contributed
    pub agents: usize,
}

/// A file that was skipped.
#[derive(Debug, Serialize)]
pub struct FileFailure {
    pub path: PathBuf,
    /// `None` when the filename itself could not be parsed
    pub file_id: Option<FileId>,
    #[serde(serialize_with = "serialize_error")]
    pub error: Error,
}

fn serialize_error<S: serde::Serializer>(error: &Error, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(error)
}

/// What happened during one batch run.
#[derive(Debug, Default, Serialize)]
pub struct BatchReport {
    pub files_discovered: usize,
    /// Files converted successfully, including empty ones
    pub converted: Vec<FileReport>,
    /// Files with no accepted tracks
    pub empty_sources: Vec<FileId>,
    pub failures: Vec<FileFailure>,
    /// Agent ids replaced by a later file
    pub collisions: usize,
    pub elapsed_ms: u128,
}

impl BatchReport {
    pub fn files_failed(&self) -> usize {
        self.failures.len()
    }
}

/// The merged document plus its report.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub document: ScenarioDocument,
    pub report: BatchReport,
}

impl BatchOutcome {
    fn start(files_discovered: usize) -> Self {
        Self {
            document: ScenarioDocument::new(),
            report: BatchReport {
                files_discovered,
                ..BatchReport::default()
            },
        }
    }

    /// Fold one file's result into the accumulator.
    fn accumulate(mut self, result: FileResult) -> Self {
        match result.outcome {
            Ok(converted) => {
                let agents = converted.agents.len();
                if converted.tracks == 0 {
                    self.report.empty_sources.push(converted.file_id.clone());
                }
                let collisions = self.document.merge(converted.agents);
                if collisions > 0 {
                    debug!(
                        file_id = %converted.file_id,
                        collisions,
                        "Agent ids already present, later file wins"
                    );
                }
                self.report.collisions += collisions;
                self.report.converted.push(FileReport {
                    path: result.path,
                    file_id: converted.file_id,
                    tracks: converted.tracks,
                    agents,
                });
            }
            Err(error) => {
                warn!(
                    file_id = result.file_id.as_ref().map(FileId::as_str).unwrap_or("?"),
                    path = %result.path.display(),
                    "Skipping file: {error}"
                );
                self.report.failures.push(FileFailure {
                    path: result.path,
                    file_id: result.file_id,
                    error,
                });
            }
        }
        self
    }
}

/// Agents converted from one file.
struct ConvertedFile {
    file_id: FileId,
    tracks: usize,
    agents: Vec<AgentRecord>,
}

struct FileResult {
    path: PathBuf,
    file_id: Option<FileId>,
    outcome: Result<ConvertedFile, Error>,
}

/// Converts a list of source files into one scenario document.
pub struct Batch {
    source: Arc<dyn TrackSource>,
    parser: FileIdParser,
    defaults: DimensionDefaults,
    max_concurrent_files: usize,
}

impl Batch {
    pub fn new(source: Arc<dyn TrackSource>, parser: FileIdParser) -> Self {
        Self {
            source,
            parser,
            defaults: DimensionDefaults::default(),
            max_concurrent_files: 1,
        }
    }

    /// Build a batch from validated configuration.
    pub fn from_config(config: &AppConfig, source: Arc<dyn TrackSource>) -> Result<Self, FilenameError> {
        let parser = FileIdParser::new(&config.input.file_id_pattern)?;
        Ok(Self::new(source, parser)
            .with_defaults(config.defaults.dimensions())
            .with_concurrency(config.batch.max_concurrent_files))
    }

    pub fn with_defaults(mut self, defaults: DimensionDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Files read at the same time; values below 1 mean sequential.
    pub fn with_concurrency(mut self, max_concurrent_files: usize) -> Self {
        self.max_concurrent_files = max_concurrent_files.max(1);
        self
    }

    /// Convert every file in `files`. Per-file failures never abort the run.
    pub async fn run(&self, files: &[PathBuf]) -> BatchOutcome {
        let started = Instant::now();
        info!(
            "Found {} source files (source: {}, concurrency: {})",
            files.len(),
            self.source.name(),
            self.max_concurrent_files
        );

        let mut outcome = stream::iter(files)
            .map(|path| self.convert_file(path))
            .buffered(self.max_concurrent_files)
            .fold(BatchOutcome::start(files.len()), |acc, result| async move {
                acc.accumulate(result)
            })
            .await;

        outcome.report.elapsed_ms = started.elapsed().as_millis();
        info!(
            "Batch complete: {} agents from {} files ({} failed, {} empty) in {} ms",
            outcome.document.len(),
            outcome.report.converted.len(),
            outcome.report.files_failed(),
            outcome.report.empty_sources.len(),
            outcome.report.elapsed_ms
        );
        outcome
    }

    async fn convert_file(&self, path: &Path) -> FileResult {
        let file_id = match self.parser.parse(path) {
            Ok(id) => id,
            Err(e) => {
                return FileResult {
                    path: path.to_path_buf(),
                    file_id: None,
                    outcome: Err(e.into()),
                };
            }
        };

        info!("Processing file id {file_id} ({})", path.display());
        let outcome = self.convert_source(path, &file_id).await;
        FileResult {
            path: path.to_path_buf(),
            file_id: Some(file_id),
            outcome,
        }
    }

    async fn convert_source(&self, path: &Path, file_id: &FileId) -> Result<ConvertedFile, Error> {
        let data = self.source.read(path).await?;
        if data.is_empty() {
            info!("File id {file_id} has no accepted tracks");
        }
        let agents = assemble_source(file_id, &data, self.defaults)?;
        debug!("File id {file_id}: {} agents", agents.len());
        Ok(ConvertedFile {
            file_id: file_id.clone(),
            tracks: data.tracks.len(),
            agents,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simscene_core::error::SourceError;
    use simscene_core::file_id::DEFAULT_FILE_ID_PATTERN;
    use simscene_core::model::{SourceData, TrackMeta, TrajectorySample};
    use simscene_source::InMemorySource;

    fn track(id: &str, length: Option<f64>) -> TrackMeta {
        TrackMeta {
            track_id: id.into(),
            agent_type: "Car".into(),
            length,
            width: None,
        }
    }

    fn source_data(tracks: &[(&str, usize)]) -> SourceData {
        let mut data = SourceData::default();
        for (id, n) in tracks {
            data.tracks.push(track(id, Some(4.0)));
            let samples = (0..*n)
                .map(|i| TrajectorySample::new(i as f64 * 0.1, i as f64, i as f64))
                .collect();
            data.samples.insert(id.to_string(), samples);
        }
        data
    }

    fn batch(source: Arc<InMemorySource>) -> Batch {
        Batch::new(source, FileIdParser::new(DEFAULT_FILE_ID_PATTERN).unwrap())
    }

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[tokio::test]
    async fn single_file_single_track() {
        let source = Arc::new(InMemorySource::new());
        source.insert("intsc_data_769.db", source_data(&[("12", 3)])).await;

        let outcome = batch(source).run(&paths(&["intsc_data_769.db"])).await;

        let ids: Vec<&str> = outcome.document.agent_ids().collect();
        assert_eq!(ids, vec!["769_12"]);
        let agent = outcome.document.get("769_12").unwrap();
        let times: Vec<f64> = agent.waypoints.iter().map(|w| w.time).collect();
        assert_eq!(times.len(), 3);
        assert!(times.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(outcome.report.files_discovered, 1);
        assert_eq!(outcome.report.converted[0].agents, 1);
    }

    #[tokio::test]
    async fn empty_source_contributes_nothing() {
        let source = Arc::new(InMemorySource::new());
        source.insert("intsc_data_770.db", SourceData::default()).await;

        let outcome = batch(source).run(&paths(&["intsc_data_770.db"])).await;

        assert!(outcome.document.is_empty());
        assert!(outcome.report.failures.is_empty());
        assert_eq!(outcome.report.empty_sources, vec![FileId::new("770")]);
    }

    #[tokio::test]
    async fn schema_failure_skips_only_that_file() {
        let source = Arc::new(InMemorySource::new());
        source.insert("intsc_data_769.db", source_data(&[("1", 2)])).await;
        source
            .insert_failure(
                "intsc_data_770.db",
                SourceError::NoTrajectoryTable {
                    pattern: "TRAJECTORIES_%".into(),
                },
            )
            .await;
        source.insert("intsc_data_771.db", source_data(&[("1", 2), ("2", 1)])).await;

        let outcome = batch(source)
            .run(&paths(&["intsc_data_769.db", "intsc_data_770.db", "intsc_data_771.db"]))
            .await;

        let ids: Vec<&str> = outcome.document.agent_ids().collect();
        assert_eq!(ids, vec!["769_1", "771_1", "771_2"]);
        assert_eq!(outcome.report.failures.len(), 1);
        let failure = &outcome.report.failures[0];
        assert_eq!(failure.file_id, Some(FileId::new("770")));
        assert!(matches!(failure.error, Error::Source(ref e) if e.is_schema()));
    }

    #[tokio::test]
    async fn bad_filename_fails_without_reading() {
        let source = Arc::new(InMemorySource::new());
        source.insert("tracks.db", source_data(&[("1", 2)])).await;

        let outcome = batch(source.clone()).run(&paths(&["tracks.db"])).await;

        assert!(outcome.document.is_empty());
        assert_eq!(outcome.report.failures[0].file_id, None);
        assert!(matches!(outcome.report.failures[0].error, Error::Filename(_)));
        assert!(source.reads().await.is_empty());
    }

    #[tokio::test]
    async fn colliding_file_ids_last_wins() {
        let source = Arc::new(InMemorySource::new());
        let mut first = source_data(&[("1", 1)]);
        first.tracks[0].length = Some(3.0);
        let mut second = source_data(&[("1", 2)]);
        second.tracks[0].length = Some(5.0);
        source.insert("a/intsc_data_769.db", first).await;
        source.insert("b/intsc_data_769.db", second).await;

        let outcome = batch(source)
            .run(&paths(&["a/intsc_data_769.db", "b/intsc_data_769.db"]))
            .await;

        assert_eq!(outcome.document.len(), 1);
        assert_eq!(outcome.document.get("769_1").unwrap().length, 5.0);
        assert_eq!(outcome.report.collisions, 1);
    }

    #[tokio::test]
    async fn concurrent_run_matches_sequential() {
        let source = Arc::new(InMemorySource::new());
        let names: Vec<String> = (0..8).map(|i| format!("intsc_data_{}.db", 700 + i)).collect();
        for (i, name) in names.iter().enumerate() {
            source.insert(name.as_str(), source_data(&[("1", i + 1), ("2", 2)])).await;
        }
        let files: Vec<PathBuf> = names.iter().map(PathBuf::from).collect();

        let sequential = batch(source.clone()).run(&files).await;
        let concurrent = batch(source).with_concurrency(4).run(&files).await;

        assert_eq!(sequential.document, concurrent.document);
        let order = |o: &BatchOutcome| -> Vec<FileId> {
            o.report.converted.iter().map(|r| r.file_id.clone()).collect()
        };
        assert_eq!(order(&sequential), order(&concurrent));
    }

    #[tokio::test]
    async fn defaults_are_applied() {
        let source = Arc::new(InMemorySource::new());
        let mut data = source_data(&[("1", 1)]);
        data.tracks[0].length = Some(0.0);
        source.insert("x_9.db", data).await;

        let outcome = batch(source)
            .with_defaults(DimensionDefaults {
                length: 6.0,
                width: 2.5,
            })
            .run(&paths(&["x_9.db"]))
            .await;

        let agent = outcome.document.get("9_1").unwrap();
        assert_eq!((agent.length, agent.width), (6.0, 2.5));
    }

    #[tokio::test]
    async fn no_files_yields_empty_document() {
        let outcome = batch(Arc::new(InMemorySource::new())).run(&[]).await;
        assert!(outcome.document.is_empty());
        assert_eq!(outcome.report.files_discovered, 0);
    }

    #[test]
    fn concurrency_is_at_least_one() {
        let b = batch(Arc::new(InMemorySource::new())).with_concurrency(0);
        assert_eq!(b.max_concurrent_files, 1);
    }

    #[test]
    fn from_config_rejects_bad_pattern() {
        let mut config = AppConfig::default();
        config.input.file_id_pattern = "^(".into();
        assert!(Batch::from_config(&config, Arc::new(InMemorySource::new())).is_err());
    }
}
