use crate::config::PreprocessingConfig;
use crate::data::model::{CurveBatch, PeakAnnotation};

use super::peaks::find_peaks;

/// Detect peaks on every curve and flag the ones taller than the curve's
/// mean peak height.
///
/// Rows come out curve by curve in batch column order, index-ascending
/// within a curve. Curves without peaks contribute no rows.
pub fn annotate(batch: &CurveBatch, config: &PreprocessingConfig) -> Vec<PeakAnnotation> {
    let mut rows = Vec::new();

    for curve in batch.iter() {
        let peaks = find_peaks(
            &curve.values,
            config.min_peak_distance(),
            config.min_rel_height(),
        );
        log::debug!("curve '{}': {} peak(s)", curve.name, peaks.len());
        if peaks.is_empty() {
            continue;
        }

        let mean_height = peaks.values.iter().sum::<f64>() / peaks.len() as f64;
        rows.extend(peaks.iter().map(|(index, value)| PeakAnnotation {
            curve_id: curve.name.clone(),
            peak_index: index,
            peak_value: value,
            is_salient: value > mean_height,
        }));
    }

    rows
}
