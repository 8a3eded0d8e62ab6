//! Heading (yaw) estimation from consecutive positions.
//!
//! Each sample faces the next one. The last sample keeps the heading of the
//! one before it, and a lone sample faces along +x.

use std::f64::consts::PI;

/// One heading per position, in radians within (-π, π].
///
/// `positions` must already be sorted by time. The output has the same
/// length and order as the input.
pub fn estimate_headings(positions: &[(f64, f64)]) -> Vec<f64> {
    let mut headings: Vec<f64> = positions
        .windows(2)
        .map(|w| {
            let (x0, y0) = w[0];
            let (x1, y1) = w[1];
            normalize(f64::atan2(y1 - y0, x1 - x0))
        })
        .collect();

    match headings.last().copied() {
        Some(last) => headings.push(last),
        None if positions.len() == 1 => headings.push(0.0),
        None => {}
    }
    headings
}

/// Map `atan2`'s closed range onto (-π, π].
fn normalize(angle: f64) -> f64 {
    if angle <= -PI { angle + 2.0 * PI } else { angle }
}
