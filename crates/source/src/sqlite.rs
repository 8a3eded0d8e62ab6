//! SQLite trajectory source.
//!
//! Each intersection recording is a single SQLite file with two tables:
//! - a tracks table (`TRACK_ID`, `TYPE`, `TRACK_LENGTH`, `TRACK_WIDTH`)
//! - one trajectory table (`TRACK_ID`, `TIME`, `X`, `Y`) whose name carries a
//!   recording suffix, found through a LIKE pattern
//!
//! Files are opened read-only, one connection per read. Numeric columns are
//! read together with their storage class: integers, reals and numeric text
//! decode to `f64`, while NULL (outside the dimension columns) and any other
//! value is a malformed row.

use async_trait::async_trait;
use simscene_core::error::SourceError;
use simscene_core::model::{SourceData, TrackMeta, TrajectorySample};
use simscene_core::source::{SourceSummary, TrackSource};
use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection, SqliteRow};
use sqlx::{ConnectOptions, Connection, Row};
use std::path::Path;
use tracing::{debug, info, warn};

/// Table names and the accepted category for one family of source files.
#[derive(Debug, Clone)]
pub struct SchemaLayout {
    pub tracks_table: String,
    /// Explicit trajectory table; pattern discovery is skipped when set
    pub trajectory_table: Option<String>,
    /// SQL LIKE pattern matched against table names
    pub trajectory_table_pattern: String,
    pub accepted_type: String,
}

impl Default for SchemaLayout {
    fn default() -> Self {
        Self {
            tracks_table: "TRACKS".into(),
            trajectory_table: None,
            trajectory_table_pattern: "TRAJECTORIES_%".into(),
            accepted_type: "Car".into(),
        }
    }
}

/// Reads recordings from SQLite files.
pub struct SqliteSource {
    layout: SchemaLayout,
}

impl SqliteSource {
    pub fn new(layout: SchemaLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &SchemaLayout {
        &self.layout
    }

    /// Open `path` read-only. The file must already exist.
    async fn connect(path: &Path) -> Result<SqliteConnection, SourceError> {
        if !path.is_file() {
            return Err(SourceError::Open {
                path: path.to_path_buf(),
                reason: "no such file".into(),
            });
        }

        SqliteConnectOptions::new()
            .filename(path)
            .read_only(true)
            .create_if_missing(false)
            .connect()
            .await
            .map_err(|e| SourceError::Open {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
    }

    /// Release a connection, logging (not failing) on close errors.
    async fn release(conn: SqliteConnection, path: &Path) {
        if let Err(e) = conn.close().await {
            warn!("Failed to close {}: {e}", path.display());
        }
    }

    /// All user tables, sorted by name.
    async fn list_tables(conn: &mut SqliteConnection) -> Result<Vec<String>, SourceError> {
        sqlx::query_scalar::<_, String>(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| SourceError::Query(format!("listing tables: {e}")))
    }

    /// The tracks table as it is spelled in the file.
    fn require_tracks_table(&self, tables: &[String]) -> Result<String, SourceError> {
        find_table(tables, &self.layout.tracks_table)
            .ok_or_else(|| SourceError::MissingTable(self.layout.tracks_table.clone()))
    }

    /// Resolve the trajectory table: the configured name, or the single
    /// table matching the pattern.
    async fn resolve_trajectory_table(
        &self,
        conn: &mut SqliteConnection,
        tables: &[String],
    ) -> Result<String, SourceError> {
        if let Some(name) = &self.layout.trajectory_table {
            return find_table(tables, name).ok_or_else(|| SourceError::MissingTable(name.clone()));
        }

        let pattern = &self.layout.trajectory_table_pattern;
        let mut candidates = sqlx::query_scalar::<_, String>(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name LIKE ?1 ORDER BY name",
        )
        .bind(pattern)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| SourceError::Query(format!("trajectory table lookup: {e}")))?;

        match candidates.len() {
            0 => Err(SourceError::NoTrajectoryTable {
                pattern: pattern.clone(),
            }),
            1 => Ok(candidates.remove(0)),
            _ => Err(SourceError::AmbiguousTrajectoryTable {
                pattern: pattern.clone(),
                candidates,
            }),
        }
    }

    async fn fetch_tracks(
        &self,
        conn: &mut SqliteConnection,
        tracks_table: &str,
    ) -> Result<Vec<TrackMeta>, SourceError> {
        let sql = format!(
            r#"
            SELECT typeof("TRACK_ID")       AS track_id_type,
                   CAST("TRACK_ID" AS TEXT) AS track_id,
                   CAST("TYPE" AS TEXT)     AS agent_type,
                   {length},
                   {width}
            FROM {table}
            WHERE "TYPE" = ?1
            "#,
            length = numeric_columns(r#""TRACK_LENGTH""#, "length"),
            width = numeric_columns(r#""TRACK_WIDTH""#, "width"),
            table = quote_ident(tracks_table)
        );

        let rows = sqlx::query(&sql)
            .bind(&self.layout.accepted_type)
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| SourceError::Query(format!("{tracks_table}: {e}")))?;

        rows.iter()
            .map(|row| row_to_track(row, tracks_table))
            .collect()
    }

    async fn fetch_samples(
        &self,
        conn: &mut SqliteConnection,
        tracks_table: &str,
        trajectory_table: &str,
    ) -> Result<Vec<(String, TrajectorySample)>, SourceError> {
        // Membership filter runs inside SQLite: rows of other categories
        // are never transferred.
        let sql = format!(
            r#"
            SELECT typeof(t."TRACK_ID")       AS track_id_type,
                   CAST(t."TRACK_ID" AS TEXT) AS track_id,
                   {time},
                   {x},
                   {y}
            FROM {traj} AS t
            WHERE t."TRACK_ID" IN (
                SELECT "TRACK_ID" FROM {tracks} WHERE "TYPE" = ?1
            )
            ORDER BY t."TRACK_ID", t."TIME"
            "#,
            time = numeric_columns(r#"t."TIME""#, "time"),
            x = numeric_columns(r#"t."X""#, "x"),
            y = numeric_columns(r#"t."Y""#, "y"),
            traj = quote_ident(trajectory_table),
            tracks = quote_ident(tracks_table),
        );

        let rows = sqlx::query(&sql)
            .bind(&self.layout.accepted_type)
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| SourceError::Query(format!("{trajectory_table}: {e}")))?;

        rows.iter()
            .map(|row| row_to_sample(row, trajectory_table))
            .collect()
    }

    async fn read_with(
        &self,
        conn: &mut SqliteConnection,
        path: &Path,
    ) -> Result<SourceData, SourceError> {
        let tables = Self::list_tables(conn).await?;
        let tracks_table = self.require_tracks_table(&tables)?;

        let tracks = self.fetch_tracks(conn, &tracks_table).await?;
        if tracks.is_empty() {
            info!(
                "No '{}' tracks in {}, nothing to convert",
                self.layout.accepted_type,
                path.display()
            );
            return Ok(SourceData::default());
        }

        let trajectory_table = self.resolve_trajectory_table(conn, &tables).await?;
        let rows = self
            .fetch_samples(conn, &tracks_table, &trajectory_table)
            .await?;

        let mut data = SourceData {
            tracks,
            ..SourceData::default()
        };
        for (track_id, sample) in rows {
            data.samples.entry(track_id).or_default().push(sample);
        }
        // SQLite orders mixed storage classes by class before value
        for samples in data.samples.values_mut() {
            samples.sort_by(|a, b| a.time.total_cmp(&b.time));
        }

        debug!(
            "Read {} tracks, {} samples from {} ({})",
            data.tracks.len(),
            data.sample_count(),
            path.display(),
            trajectory_table
        );
        Ok(data)
    }

    async fn inspect_with(
        &self,
        conn: &mut SqliteConnection,
    ) -> Result<SourceSummary, SourceError> {
        let tables = Self::list_tables(conn).await?;
        let mut summary = SourceSummary {
            tables: tables.clone(),
            ..SourceSummary::default()
        };

        let tracks_table = match self.require_tracks_table(&tables) {
            Ok(name) => Some(name),
            Err(e) => {
                summary.issues.push(e.to_string());
                None
            }
        };

        match self.resolve_trajectory_table(conn, &tables).await {
            Ok(name) => summary.trajectory_table = Some(name),
            Err(e) if e.is_schema() => summary.issues.push(e.to_string()),
            Err(e) => return Err(e),
        }

        let Some(tracks_table) = tracks_table else {
            return Ok(summary);
        };

        let count_tracks = format!(
            r#"SELECT COUNT(*) FROM {} WHERE "TYPE" = ?1"#,
            quote_ident(&tracks_table)
        );
        let accepted: i64 = sqlx::query_scalar(&count_tracks)
            .bind(&self.layout.accepted_type)
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| SourceError::Query(format!("{tracks_table}: {e}")))?;
        summary.accepted_tracks = accepted.max(0) as usize;

        if let Some(trajectory_table) = &summary.trajectory_table {
            let count_samples = format!(
                r#"SELECT COUNT(*) FROM {traj} WHERE "TRACK_ID" IN (SELECT "TRACK_ID" FROM {tracks} WHERE "TYPE" = ?1)"#,
                traj = quote_ident(trajectory_table),
                tracks = quote_ident(&tracks_table),
            );
            let samples: i64 = sqlx::query_scalar(&count_samples)
                .bind(&self.layout.accepted_type)
                .fetch_one(&mut *conn)
                .await
                .map_err(|e| SourceError::Query(format!("{trajectory_table}: {e}")))?;
            summary.accepted_samples = samples.max(0) as usize;
        }

        Ok(summary)
    }
}

impl Default for SqliteSource {
    fn default() -> Self {
        Self::new(SchemaLayout::default())
    }
}

#[async_trait]
impl TrackSource for SqliteSource {
    fn name(&self) -> &str {
        "sqlite"
    }

    async fn read(&self, path: &Path) -> Result<SourceData, SourceError> {
        let mut conn = Self::connect(path).await?;
        let result = self.read_with(&mut conn, path).await;
        Self::release(conn, path).await;
        result
    }

    async fn inspect(&self, path: &Path) -> Result<SourceSummary, SourceError> {
        let mut conn = Self::connect(path).await?;
        let result = self.inspect_with(&mut conn).await;
        Self::release(conn, path).await;
        result
    }
}

/// Table lookup is case-insensitive, as in SQLite itself.
fn find_table(tables: &[String], name: &str) -> Option<String> {
    tables.iter().find(|t| t.eq_ignore_ascii_case(name)).cloned()
}

/// Quote an identifier for interpolation into SQL.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Select a numeric column as its storage class, its REAL value and its text.
///
/// `CAST(... AS REAL)` alone maps NULL and non-numeric text to 0.0, so the
/// storage class decides which of the two values is meaningful.
fn numeric_columns(expr: &str, alias: &str) -> String {
    format!(
        "typeof({expr}) AS {alias}_type, CAST({expr} AS REAL) AS {alias}, CAST({expr} AS TEXT) AS {alias}_text"
    )
}

fn malformed(table: &str, column: &str, reason: impl std::fmt::Display) -> SourceError {
    SourceError::MalformedRow {
        table: table.to_string(),
        reason: format!("{column} column: {reason}"),
    }
}

/// Decode a column selected with [`numeric_columns`]. NULL is `None`.
fn numeric_value(
    row: &SqliteRow,
    alias: &str,
    column: &str,
    table: &str,
) -> Result<Option<f64>, SourceError> {
    let storage: String = row
        .try_get(format!("{alias}_type").as_str())
        .map_err(|e| malformed(table, column, e))?;

    match storage.as_str() {
        "null" => Ok(None),
        "integer" | "real" => row
            .try_get::<f64, _>(alias)
            .map(Some)
            .map_err(|e| malformed(table, column, e)),
        "text" => {
            let text: String = row
                .try_get(format!("{alias}_text").as_str())
                .map_err(|e| malformed(table, column, e))?;
            text.trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| malformed(table, column, format_args!("`{text}` is not a number")))
        }
        other => Err(malformed(table, column, format_args!("{other} value is not a number"))),
    }
}

fn required_value(row: &SqliteRow, alias: &str, column: &str, table: &str) -> Result<f64, SourceError> {
    numeric_value(row, alias, column, table)?.ok_or_else(|| malformed(table, column, "NULL"))
}

fn track_id(row: &SqliteRow, table: &str) -> Result<String, SourceError> {
    let storage: String = row
        .try_get("track_id_type")
        .map_err(|e| malformed(table, "TRACK_ID", e))?;
    if storage == "null" {
        return Err(malformed(table, "TRACK_ID", "NULL"));
    }
    row.try_get("track_id")
        .map_err(|e| malformed(table, "TRACK_ID", e))
}

fn row_to_track(row: &SqliteRow, table: &str) -> Result<TrackMeta, SourceError> {
    Ok(TrackMeta {
        track_id: track_id(row, table)?,
        agent_type: row
            .try_get("agent_type")
            .map_err(|e| malformed(table, "TYPE", e))?,
        length: numeric_value(row, "length", "TRACK_LENGTH", table)?,
        width: numeric_value(row, "width", "TRACK_WIDTH", table)?,
    })
}

fn row_to_sample(row: &SqliteRow, table: &str) -> Result<(String, TrajectorySample), SourceError> {
    let track_id = track_id(row, table)?;
    let time = required_value(row, "time", "TIME", table)?;
    let x = required_value(row, "x", "X", table)?;
    let y = required_value(row, "y", "Y", table)?;

    Ok((track_id, TrajectorySample::new(time, x, y)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    /// Create a SQLite file at `path` and run `script` against it.
    async fn make_db(path: &Path, script: &str) {
        let mut conn = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .connect()
            .await
            .unwrap();
        sqlx::raw_sql(script).execute(&mut conn).await.unwrap();
        conn.close().await.unwrap();
    }

    const INTERSECTION: &str = r#"
        CREATE TABLE TRACKS (TRACK_ID INTEGER, TYPE TEXT, TRACK_LENGTH REAL, TRACK_WIDTH REAL);
        CREATE TABLE TRAJECTORIES_0769 (TRACK_ID INTEGER, TIME REAL, X REAL, Y REAL);
        INSERT INTO TRACKS VALUES (12, 'Car', 4.1, 0), (13, 'Pedestrian', 0.5, 0.5), (14, 'Car', NULL, 2.0);
        INSERT INTO TRAJECTORIES_0769 VALUES
            (12, 0.066734, 2.0, 0.0),
            (12, 0.0, 0.0, 0.0),
            (12, 0.033367, 1, 0),
            (13, 0.0, 5.0, 5.0),
            (14, 0.0, 10.0, 10.0);
    "#;

    async fn fixture(script: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("intsc_data_769.db");
        make_db(&path, script).await;
        (dir, path)
    }

    #[tokio::test]
    async fn reads_accepted_tracks_only() {
        let (_dir, path) = fixture(INTERSECTION).await;
        let data = SqliteSource::default().read(&path).await.unwrap();

        let ids: Vec<&str> = data.tracks.iter().map(|t| t.track_id.as_str()).collect();
        assert_eq!(ids, vec!["12", "14"]);
        assert!(!data.samples.contains_key("13"));
        assert_eq!(data.sample_count(), 4);
    }

    #[tokio::test]
    async fn samples_are_time_ordered_and_coerced() {
        let (_dir, path) = fixture(INTERSECTION).await;
        let data = SqliteSource::default().read(&path).await.unwrap();

        let track = &data.samples["12"];
        let times: Vec<f64> = track.iter().map(|s| s.time).collect();
        assert_eq!(times, vec![0.0, 0.033367, 0.066734]);
        // integer-stored coordinates decode as reals
        assert_eq!(track[1].x, 1.0);
    }

    #[tokio::test]
    async fn null_and_zero_dimensions_survive_reading() {
        let (_dir, path) = fixture(INTERSECTION).await;
        let data = SqliteSource::default().read(&path).await.unwrap();

        assert_eq!(data.tracks[0].length, Some(4.1));
        assert_eq!(data.tracks[0].width, Some(0.0));
        assert_eq!(data.tracks[1].length, None);
    }

    #[tokio::test]
    async fn no_accepted_tracks_is_empty_not_error() {
        let (_dir, path) = fixture(
            r#"
            CREATE TABLE TRACKS (TRACK_ID INTEGER, TYPE TEXT, TRACK_LENGTH REAL, TRACK_WIDTH REAL);
            INSERT INTO TRACKS VALUES (1, 'Bicycle', 1.7, 0.6);
            "#,
        )
        .await;
        let data = SqliteSource::default().read(&path).await.unwrap();
        assert!(data.is_empty());
        assert_eq!(data.sample_count(), 0);
    }

    #[tokio::test]
    async fn missing_tracks_table_is_schema_error() {
        let (_dir, path) = fixture("CREATE TABLE TRAJECTORIES_1 (TRACK_ID INTEGER, TIME REAL, X REAL, Y REAL);").await;
        let err = SqliteSource::default().read(&path).await.unwrap_err();
        assert!(matches!(err, SourceError::MissingTable(ref t) if t == "TRACKS"));
        assert!(err.is_schema());
    }

    #[tokio::test]
    async fn missing_trajectory_table_is_schema_error() {
        let (_dir, path) = fixture(
            r#"
            CREATE TABLE TRACKS (TRACK_ID INTEGER, TYPE TEXT, TRACK_LENGTH REAL, TRACK_WIDTH REAL);
            INSERT INTO TRACKS VALUES (1, 'Car', 4.0, 1.9);
            "#,
        )
        .await;
        let err = SqliteSource::default().read(&path).await.unwrap_err();
        assert!(matches!(err, SourceError::NoTrajectoryTable { .. }));
    }

    #[tokio::test]
    async fn ambiguous_trajectory_tables_are_rejected() {
        let (_dir, path) = fixture(
            r#"
            CREATE TABLE TRACKS (TRACK_ID INTEGER, TYPE TEXT, TRACK_LENGTH REAL, TRACK_WIDTH REAL);
            CREATE TABLE TRAJECTORIES_A (TRACK_ID INTEGER, TIME REAL, X REAL, Y REAL);
            CREATE TABLE TRAJECTORIES_B (TRACK_ID INTEGER, TIME REAL, X REAL, Y REAL);
            INSERT INTO TRACKS VALUES (1, 'Car', 4.0, 1.9);
            "#,
        )
        .await;
        let err = SqliteSource::default().read(&path).await.unwrap_err();
        match err {
            SourceError::AmbiguousTrajectoryTable { candidates, .. } => {
                assert_eq!(candidates, vec!["TRAJECTORIES_A", "TRAJECTORIES_B"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn explicit_trajectory_table_skips_discovery() {
        let (_dir, path) = fixture(
            r#"
            CREATE TABLE TRACKS (TRACK_ID INTEGER, TYPE TEXT, TRACK_LENGTH REAL, TRACK_WIDTH REAL);
            CREATE TABLE TRAJECTORIES_A (TRACK_ID INTEGER, TIME REAL, X REAL, Y REAL);
            CREATE TABLE TRAJECTORIES_B (TRACK_ID INTEGER, TIME REAL, X REAL, Y REAL);
            INSERT INTO TRACKS VALUES (1, 'Car', 4.0, 1.9);
            INSERT INTO TRAJECTORIES_B VALUES (1, 0.0, 1.0, 1.0);
            "#,
        )
        .await;
        let source = SqliteSource::new(SchemaLayout {
            trajectory_table: Some("trajectories_b".into()),
            ..SchemaLayout::default()
        });
        let data = source.read(&path).await.unwrap();
        assert_eq!(data.samples["1"].len(), 1);
    }

    #[tokio::test]
    async fn null_coordinate_is_malformed_row() {
        let (_dir, path) = fixture(
            r#"
            CREATE TABLE TRACKS (TRACK_ID INTEGER, TYPE TEXT, TRACK_LENGTH REAL, TRACK_WIDTH REAL);
            CREATE TABLE TRAJECTORIES_1 (TRACK_ID INTEGER, TIME REAL, X REAL, Y REAL);
            INSERT INTO TRACKS VALUES (1, 'Car', 4.0, 1.9);
            INSERT INTO TRAJECTORIES_1 VALUES (1, 0.0, NULL, 1.0);
            "#,
        )
        .await;
        let err = SqliteSource::default().read(&path).await.unwrap_err();
        assert!(matches!(err, SourceError::MalformedRow { ref reason, .. } if reason.contains('X')));
    }

    #[tokio::test]
    async fn null_time_and_text_coordinate_are_malformed() {
        let schema = r#"
            CREATE TABLE TRACKS (TRACK_ID INTEGER, TYPE TEXT, TRACK_LENGTH REAL, TRACK_WIDTH REAL);
            CREATE TABLE TRAJECTORIES_1 (TRACK_ID INTEGER, TIME REAL, X REAL, Y REAL);
            INSERT INTO TRACKS VALUES (1, 'Car', 4.0, 1.9);
        "#;

        let (_dir, path) =
            fixture(&format!("{schema} INSERT INTO TRAJECTORIES_1 VALUES (1, NULL, 2.0, 2.0);")).await;
        let err = SqliteSource::default().read(&path).await.unwrap_err();
        assert!(matches!(err, SourceError::MalformedRow { ref reason, .. } if reason.starts_with("TIME")));

        let (_dir, path) = fixture(&format!(
            "{schema} INSERT INTO TRAJECTORIES_1 VALUES (1, 0.0, 0.0, 1.0), (1, 0.1, 'abc', 2.0);"
        ))
        .await;
        let err = SqliteSource::default().read(&path).await.unwrap_err();
        match err {
            SourceError::MalformedRow { table, reason } => {
                assert_eq!(table, "TRAJECTORIES_1");
                assert!(reason.contains("abc"), "{reason}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn numeric_text_is_accepted() {
        // untyped columns keep text as text
        let (_dir, path) = fixture(
            r#"
            CREATE TABLE TRACKS (TRACK_ID, TYPE, TRACK_LENGTH, TRACK_WIDTH);
            CREATE TABLE TRAJECTORIES_1 (TRACK_ID, TIME, X, Y);
            INSERT INTO TRACKS VALUES (1, 'Car', ' 4.25 ', NULL);
            INSERT INTO TRAJECTORIES_1 VALUES (1, '0.5', 3, '-1.5'), (1, 0.25, 2, 0);
            "#,
        )
        .await;
        let data = SqliteSource::default().read(&path).await.unwrap();

        assert_eq!(data.tracks[0].length, Some(4.25));
        assert_eq!(data.tracks[0].width, None);
        let samples = &data.samples["1"];
        assert_eq!(samples[0], TrajectorySample::new(0.25, 2.0, 0.0));
        assert_eq!(samples[1], TrajectorySample::new(0.5, 3.0, -1.5));
    }

    #[tokio::test]
    async fn bad_dimension_fails_instead_of_defaulting() {
        let (_dir, path) = fixture(
            r#"
            CREATE TABLE TRACKS (TRACK_ID INTEGER, TYPE TEXT, TRACK_LENGTH REAL, TRACK_WIDTH REAL);
            CREATE TABLE TRAJECTORIES_1 (TRACK_ID INTEGER, TIME REAL, X REAL, Y REAL);
            INSERT INTO TRACKS VALUES (1, 'Car', 'abc', 1.9);
            INSERT INTO TRAJECTORIES_1 VALUES (1, 0.0, 0.0, 0.0);
            "#,
        )
        .await;
        let err = SqliteSource::default().read(&path).await.unwrap_err();
        assert!(matches!(err, SourceError::MalformedRow { ref reason, .. } if reason.starts_with("TRACK_LENGTH")));
    }

    #[tokio::test]
    async fn null_track_id_is_malformed() {
        let (_dir, path) = fixture(
            r#"
            CREATE TABLE TRACKS (TRACK_ID INTEGER, TYPE TEXT, TRACK_LENGTH REAL, TRACK_WIDTH REAL);
            CREATE TABLE TRAJECTORIES_1 (TRACK_ID INTEGER, TIME REAL, X REAL, Y REAL);
            INSERT INTO TRACKS VALUES (NULL, 'Car', 4.0, 1.9);
            "#,
        )
        .await;
        let err = SqliteSource::default().read(&path).await.unwrap_err();
        assert!(matches!(err, SourceError::MalformedRow { ref reason, .. } if reason.starts_with("TRACK_ID")));
    }

    #[tokio::test]
    async fn missing_file_is_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("intsc_data_404.db");
        let err = SqliteSource::default().read(&path).await.unwrap_err();
        assert!(matches!(err, SourceError::Open { .. }));
        assert!(!path.exists(), "reader must not create files");
    }

    #[tokio::test]
    async fn custom_accepted_type() {
        let (_dir, path) = fixture(INTERSECTION).await;
        let source = SqliteSource::new(SchemaLayout {
            accepted_type: "Pedestrian".into(),
            ..SchemaLayout::default()
        });
        let data = source.read(&path).await.unwrap();
        assert_eq!(data.tracks.len(), 1);
        assert_eq!(data.samples["13"][0].x, 5.0);
    }

    #[tokio::test]
    async fn inspect_reports_layout() {
        let (_dir, path) = fixture(INTERSECTION).await;
        let summary = SqliteSource::default().inspect(&path).await.unwrap();
        assert_eq!(summary.tables, vec!["TRACKS", "TRAJECTORIES_0769"]);
        assert_eq!(summary.trajectory_table.as_deref(), Some("TRAJECTORIES_0769"));
        assert_eq!(summary.accepted_tracks, 2);
        assert_eq!(summary.accepted_samples, 4);
        assert!(summary.issues.is_empty());
    }

    #[tokio::test]
    async fn inspect_collects_schema_issues() {
        let (_dir, path) = fixture("CREATE TABLE OTHER (A INTEGER);").await;
        let summary = SqliteSource::default().inspect(&path).await.unwrap();
        assert_eq!(summary.tables, vec!["OTHER"]);
        assert_eq!(summary.trajectory_table, None);
        assert_eq!(summary.issues.len(), 2);
    }

    #[test]
    fn quote_ident_escapes_quotes() {
        assert_eq!(quote_ident("TRACKS"), "\"TRACKS\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }

    #[tokio::test]
    async fn source_name() {
        assert_eq!(SqliteSource::default().name(), "sqlite");
    }
}
