//! Configuration loading, validation, and management for SimScene.
//!
//! Loads configuration from `./simscene.toml` (or an explicit path) with
//! environment variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use simscene_core::assembler::{DEFAULT_LENGTH, DEFAULT_WIDTH};
use simscene_core::file_id::{DEFAULT_FILE_ID_PATTERN, FileIdParser};
use simscene_core::DimensionDefaults;
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when no path is given.
pub const CONFIG_FILE_NAME: &str = "simscene.toml";

/// The root configuration structure.
///
/// Maps directly to `simscene.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Where source databases come from
    #[serde(default)]
    pub input: InputConfig,

    /// Where the scenario document goes
    #[serde(default)]
    pub output: OutputConfig,

    /// Table and column layout of the source databases
    #[serde(default)]
    pub schema: SchemaConfig,

    /// Fallback vehicle dimensions
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Batch execution settings
    #[serde(default)]
    pub batch: BatchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Directory scanned for source files
    #[serde(default = "default_input_dir")]
    pub dir: PathBuf,

    /// Extension of source files, without the dot
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Explicit source files; when non-empty the directory is not scanned.
    /// Relative entries resolve against `dir`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<PathBuf>,

    /// Regex applied to each file stem; the `id` group is the file identifier
    #[serde(default = "default_file_id_pattern")]
    pub file_id_pattern: String,
}

fn default_input_dir() -> PathBuf {
    PathBuf::from("data")
}
fn default_extension() -> String {
    "db".into()
}
fn default_file_id_pattern() -> String {
    DEFAULT_FILE_ID_PATTERN.into()
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            dir: default_input_dir(),
            extension: default_extension(),
            files: vec![],
            file_id_pattern: default_file_id_pattern(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
}

fn default_output_path() -> PathBuf {
    PathBuf::from("simulation_scenario.json")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaConfig {
    #[serde(default = "default_tracks_table")]
    pub tracks_table: String,

    /// Explicit trajectory table; skips pattern discovery when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trajectory_table: Option<String>,

    /// SQL LIKE pattern matched against table names; exactly one must match
    #[serde(default = "default_trajectory_pattern")]
    pub trajectory_table_pattern: String,

    /// The only track category that is converted
    #[serde(default = "default_accepted_type")]
    pub accepted_type: String,
}

fn default_tracks_table() -> String {
    "TRACKS".into()
}
fn default_trajectory_pattern() -> String {
    "TRAJECTORIES_%".into()
}
fn default_accepted_type() -> String {
    "Car".into()
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            tracks_table: default_tracks_table(),
            trajectory_table: None,
            trajectory_table_pattern: default_trajectory_pattern(),
            accepted_type: default_accepted_type(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_length")]
    pub length: f64,

    #[serde(default = "default_width")]
    pub width: f64,
}

fn default_length() -> f64 {
    DEFAULT_LENGTH
}
fn default_width() -> f64 {
    DEFAULT_WIDTH
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            length: default_length(),
            width: default_width(),
        }
    }
}

impl DefaultsConfig {
    pub fn dimensions(&self) -> DimensionDefaults {
        DimensionDefaults {
            length: self.length,
            width: self.width,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Target sample rate of the simulator, in Hz. Reserved for downsampling;
    /// waypoints are currently emitted at the recorded rate.
    #[serde(default = "default_sample_rate")]
    pub sample_rate_hz: f64,

    /// Source files read at the same time (1 = sequential)
    #[serde(default = "default_max_concurrent_files")]
    pub max_concurrent_files: usize,
}

fn default_sample_rate() -> f64 {
    30.0
}
fn default_max_concurrent_files() -> usize {
    1
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: default_sample_rate(),
            max_concurrent_files: default_max_concurrent_files(),
        }
    }
}

impl AppConfig {
    /// Load configuration from `path`, or from `./simscene.toml` when `None`.
    ///
    /// Environment overrides are applied afterwards:
    /// - `SIMSCENE_INPUT_DIR`
    /// - `SIMSCENE_OUTPUT`
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map(Path::to_path_buf).unwrap_or_else(Self::default_path);
        let mut config = Self::load_from(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    pub fn default_path() -> PathBuf {
        PathBuf::from(CONFIG_FILE_NAME)
    }

    /// Apply overrides from a key lookup (the process environment in `load`).
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup("SIMSCENE_INPUT_DIR").filter(|v| !v.is_empty()) {
            self.input.dir = PathBuf::from(dir);
        }
        if let Some(output) = lookup("SIMSCENE_OUTPUT").filter(|v| !v.is_empty()) {
            self.output.path = PathBuf::from(output);
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input.extension.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "input.extension must not be empty".into(),
            ));
        }

        FileIdParser::new(&self.input.file_id_pattern)
            .map_err(|e| ConfigError::ValidationError(e.to_string()))?;

        if self.schema.accepted_type.is_empty() {
            return Err(ConfigError::ValidationError(
                "schema.accepted_type must not be empty".into(),
            ));
        }

        if self.schema.tracks_table.is_empty() {
            return Err(ConfigError::ValidationError(
                "schema.tracks_table must not be empty".into(),
            ));
        }

        if !(self.defaults.length > 0.0 && self.defaults.width > 0.0) {
            return Err(ConfigError::ValidationError(
                "defaults.length and defaults.width must be > 0".into(),
            ));
        }

        if !(self.batch.sample_rate_hz > 0.0) {
            return Err(ConfigError::ValidationError(
                "batch.sample_rate_hz must be > 0".into(),
            ));
        }

        if self.batch.max_concurrent_files == 0 {
            return Err(ConfigError::ValidationError(
                "batch.max_concurrent_files must be >= 1".into(),
            ));
        }

        Ok(())
    }

    /// Generate a default config TOML string (for `config init`).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
