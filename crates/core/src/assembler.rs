//! Agent assembly — metadata + samples + headings into an `AgentRecord`.

use crate::error::AssemblyError;
use crate::file_id::FileId;
use crate::heading::estimate_headings;
use crate::model::{AgentRecord, SourceData, TrackMeta, TrajectorySample, Waypoint};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

pub const DEFAULT_LENGTH: f64 = 4.5;
pub const DEFAULT_WIDTH: f64 = 1.8;

/// Fallback vehicle dimensions, in metres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DimensionDefaults {
    pub length: f64,
    pub width: f64,
}

impl Default for DimensionDefaults {
    fn default() -> Self {
        Self {
            length: DEFAULT_LENGTH,
            width: DEFAULT_WIDTH,
        }
    }
}

/// Globally unique agent id: `<file_id>_<track_id>`.
pub fn compose_agent_id(file_id: &str, track_id: &str) -> String {
    format!("{file_id}_{track_id}")
}

/// A recorded dimension, or `default` when it is NULL, zero or not finite.
///
/// Zero counts as absent: the recordings use 0 for "unknown".
pub fn dimension_or_default(value: Option<f64>, default: f64) -> f64 {
    match value {
        Some(v) if v != 0.0 && v.is_finite() => v,
        _ => default,
    }
}

/// Build one agent from its metadata, time-sorted samples and headings.
///
/// Samples keep their order; `headings[i]` belongs to `samples[i]`.
pub fn assemble_agent(
    file_id: &str,
    meta: &TrackMeta,
    samples: &[TrajectorySample],
    headings: &[f64],
    defaults: DimensionDefaults,
) -> Result<AgentRecord, AssemblyError> {
    if samples.len() != headings.len() {
        return Err(AssemblyError::HeadingMismatch {
            track_id: meta.track_id.clone(),
            samples: samples.len(),
            headings: headings.len(),
        });
    }

    let waypoints = samples
        .iter()
        .zip(headings)
        .map(|(s, &yaw)| Waypoint {
            time: s.time,
            x: s.x,
            y: s.y,
            z: 0.0,
            yaw,
        })
        .collect();

    Ok(AgentRecord {
        agent_id: compose_agent_id(file_id, &meta.track_id),
        agent_type: meta.agent_type.clone(),
        length: dimension_or_default(meta.length, defaults.length),
        width: dimension_or_default(meta.width, defaults.width),
        waypoints,
    })
}

/// Assemble every agent found in one source file.
///
/// Tracks without samples and samples without metadata are skipped. When
/// metadata repeats a track id, the first row wins.
pub fn assemble_source(
    file_id: &FileId,
    data: &SourceData,
    defaults: DimensionDefaults,
) -> Result<Vec<AgentRecord>, AssemblyError> {
    let mut meta_by_id: HashMap<&str, &TrackMeta> = HashMap::with_capacity(data.tracks.len());
    for meta in &data.tracks {
        meta_by_id.entry(meta.track_id.as_str()).or_insert(meta);
    }

    let mut agents = Vec::with_capacity(data.samples.len());
    for (track_id, samples) in &data.samples {
        let Some(meta) = meta_by_id.get(track_id.as_str()) else {
            debug!(file_id = %file_id, track_id = %track_id, "Samples without metadata, skipping");
            continue;
        };
        if samples.is_empty() {
            continue;
        }

        let positions: Vec<(f64, f64)> = samples.iter().map(|s| (s.x, s.y)).collect();
        let headings = estimate_headings(&positions);
        agents.push(assemble_agent(
            file_id.as_str(),
            meta,
            samples,
            &headings,
            defaults,
        )?);
    }

    debug!(
        file_id = %file_id,
        tracks = data.tracks.len(),
        agents = agents.len(),
        "Assembled source"
    );
    Ok(agents)
}
