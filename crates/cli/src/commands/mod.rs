//! Subcommand implementations.

pub mod config_cmd;
pub mod convert;
pub mod inspect;

use simscene_config::AppConfig;
use simscene_source::{SchemaLayout, SqliteSource};

/// SQLite source for the configured schema.
pub(crate) fn sqlite_source(config: &AppConfig) -> SqliteSource {
    SqliteSource::new(SchemaLayout {
        tracks_table: config.schema.tracks_table.clone(),
        trajectory_table: config.schema.trajectory_table.clone(),
        trajectory_table_pattern: config.schema.trajectory_table_pattern.clone(),
        accepted_type: config.schema.accepted_type.clone(),
    })
}
