//! Trajectory source implementations for SimScene.

pub mod in_memory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use in_memory::InMemorySource;

#[cfg(feature = "sqlite")]
pub use sqlite::{SchemaLayout, SqliteSource};
