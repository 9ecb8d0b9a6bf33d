//! Arc-length amplitude normalization.

use crate::data::model::CurveBatch;
use crate::error::Result;

/// Arc lengths below this are treated as zero.
pub const ARC_LENGTH_EPS: f64 = 1e-12;

/// Polyline length of the curve drawn against a unit-spaced time axis:
/// `Σ sqrt(1 + (x[i+1] - x[i])²)`. Curves shorter than two samples have
/// length zero.
pub fn arc_length(curve: &[f64]) -> f64 {
    if curve.len() < 2 {
        return 0.0;
    }
    curve
        .windows(2)
        .map(|pair| {
            let dy = pair[1] - pair[0];
            (1.0 + dy * dy).sqrt()
        })
        .sum()
}

/// Divide every sample by the curve's arc length. A degenerate length
/// (below [`ARC_LENGTH_EPS`]) yields an all-zero curve.
pub fn normalize(curve: &[f64]) -> Vec<f64> {
    let length = arc_length(curve);
    if length < ARC_LENGTH_EPS {
        return vec![0.0; curve.len()];
    }
    curve.iter().map(|v| v / length).collect()
}

/// Normalize every curve of a batch, or copy it unchanged when disabled.
pub fn normalize_batch(batch: &CurveBatch, enabled: bool) -> Result<CurveBatch> {
    if !enabled {
        log::debug!("arc normalization disabled, passing batch through");
        return Ok(batch.clone());
    }
    log::debug!("arc-normalizing {} curve(s)", batch.curve_count());
    batch.map_curves(|values| Ok(normalize(values)))
}
