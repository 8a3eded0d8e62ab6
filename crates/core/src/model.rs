//! Scenario data model — raw source rows in, simulator agents out.
//!
//! `TrackMeta` and `TrajectorySample` mirror the rows read from one source
//! database. `AgentRecord` and `Waypoint` are the shapes the simulator loads,
//! collected into a [`ScenarioDocument`] keyed by globally unique agent id.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-track metadata from the tracks table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackMeta {
    /// Identifier, unique within one source file only
    pub track_id: String,

    /// Category label (e.g. "Car")
    pub agent_type: String,

    /// Vehicle length in metres, if recorded
    #[serde(default)]
    pub length: Option<f64>,

    /// Vehicle width in metres, if recorded
    #[serde(default)]
    pub width: Option<f64>,
}

/// One recorded position of a track.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySample {
    /// Seconds since the start of the recording
    pub time: f64,
    pub x: f64,
    pub y: f64,
}

impl TrajectorySample {
    pub fn new(time: f64, x: f64, y: f64) -> Self {
        Self { time, x, y }
    }
}

/// One timestamped pose of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub time: f64,
    pub x: f64,
    pub y: f64,
    /// Always 0.0; recordings are planar
    pub z: f64,
    /// Heading in radians, in (-π, π]
    pub yaw: f64,
}

/// A fully assembled agent ready for the simulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRecord {
    /// `<file_id>_<track_id>`
    pub agent_id: String,

    #[serde(rename = "type")]
    pub agent_type: String,

    pub length: f64,
    pub width: f64,

    /// Time-ordered, never empty
    pub waypoints: Vec<Waypoint>,
}

/// Everything read from a single source database.
///
/// `tracks` holds the accepted-category metadata in table order. `samples`
/// holds each track's trajectory in retrieval order (already sorted by time).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceData {
    pub tracks: Vec<TrackMeta>,
    pub samples: BTreeMap<String, Vec<TrajectorySample>>,
}

impl SourceData {
    /// No accepted tracks at all.
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Total number of samples across every track.
    pub fn sample_count(&self) -> usize {
        self.samples.values().map(Vec::len).sum()
    }
}

/// The aggregated output: agent id → agent.
///
/// Backed by a `BTreeMap` so serialization order is stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScenarioDocument {
    agents: BTreeMap<String, AgentRecord>,
}

impl ScenarioDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an agent, returning the record it replaced on id collision.
    pub fn insert(&mut self, record: AgentRecord) -> Option<AgentRecord> {
        self.agents.insert(record.agent_id.clone(), record)
    }

    /// Merge a batch of records, last one wins. Returns how many ids collided.
    pub fn merge(&mut self, records: impl IntoIterator<Item = AgentRecord>) -> usize {
        records
            .into_iter()
            .filter_map(|r| self.insert(r))
            .count()
    }

    pub fn get(&self, agent_id: &str) -> Option<&AgentRecord> {
        self.agents.get(agent_id)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn agent_ids(&self) -> impl Iterator<Item = &str> {
        self.agents.keys().map(String::as_str)
    }

    pub fn agents(&self) -> impl Iterator<Item = &AgentRecord> {
        self.agents.values()
    }
}
