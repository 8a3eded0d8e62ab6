//! # SimScene Core
//!
//! Domain types, traits, and error definitions for SimScene, the converter
//! from per-intersection trajectory databases to simulator scenarios.
//! This crate has **no I/O dependencies**. It defines the domain model and
//! the pure transformations that the other crates build on.
//!
//! ## Design Philosophy
//!
//! Reading sources is defined as a trait here ([`TrackSource`]); the SQLite
//! implementation lives in `simscene-source`. Heading estimation and agent
//! assembly are plain functions so they can be tested without a database.

pub mod error;
pub mod model;
pub mod heading;
pub mod assembler;
pub mod file_id;
pub mod source;

// Re-export key types at crate root for ergonomics
pub use error::{Error, Result};
pub use model::{AgentRecord, ScenarioDocument, SourceData, TrackMeta, TrajectorySample, Waypoint};
pub use heading::estimate_headings;
pub use assembler::{
    DimensionDefaults, assemble_agent, assemble_source, compose_agent_id, dimension_or_default,
};
pub use file_id::{FileId, FileIdParser, parse_file_id};
pub use source::{SourceSummary, TrackSource};
