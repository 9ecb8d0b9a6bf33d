use crate::config::PreprocessingConfig;
use crate::data::model::{CurveBatch, PeakAnnotation};
use crate::error::Result;

use super::annotate::annotate;
use super::normalization::normalize_batch;
use super::smoothing::smooth_batch;

/// The two result tables of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    /// Smoothed and, if enabled, arc-normalized curves.
    pub normalized: CurveBatch,
    /// Peak rows, curve-major and index-ascending.
    pub annotations: Vec<PeakAnnotation>,
}

/// Run smoothing → normalization → annotation over a whole batch.
///
/// Any stage error aborts the run and nothing is returned. The input batch
/// is not modified.
pub fn run(batch: &CurveBatch, config: &PreprocessingConfig) -> Result<PipelineOutput> {
    log::debug!(
        "pipeline start: {} curve(s) x {} sample(s)",
        batch.curve_count(),
        batch.len()
    );

    let smoothed = smooth_batch(
        batch,
        config.smoothing_window(),
        config.smoothing_center(),
    )?;
    let normalized = normalize_batch(&smoothed, config.arc_normalization())?;
    let annotations = annotate(&normalized, config);

    log::debug!("pipeline done: {} annotation row(s)", annotations.len());
    Ok(PipelineOutput {
        normalized,
        annotations,
    })
}
