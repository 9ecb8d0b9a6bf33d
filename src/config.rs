use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::{PreprocessError, Result};

// ---------------------------------------------------------------------------
// PreprocessingConfig – immutable parameter bundle
// ---------------------------------------------------------------------------

/// Parameters for one pipeline run.
///
/// Fields are private so a built config can only be read. Construct it with
/// [`PreprocessingConfig::builder`], [`Default`], or from JSON (which goes
/// through the same validation).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ConfigFile", into = "ConfigFile")]
pub struct PreprocessingConfig {
    smoothing_window: usize,
    smoothing_center: bool,
    arc_normalization: bool,
    min_peak_distance: usize,
    min_rel_height: f64,
    time_index_column: Option<String>,
}

impl Default for PreprocessingConfig {
    fn default() -> Self {
        Self {
            smoothing_window: 7,
            smoothing_center: true,
            arc_normalization: true,
            min_peak_distance: 1,
            min_rel_height: 0.0,
            time_index_column: None,
        }
    }
}

impl PreprocessingConfig {
    pub fn builder() -> PreprocessingConfigBuilder {
        PreprocessingConfigBuilder::default()
    }

    /// Moving-average window length (always >= 1).
    pub fn smoothing_window(&self) -> usize {
        self.smoothing_window
    }

    /// Centered window when `true`, trailing window otherwise.
    pub fn smoothing_center(&self) -> bool {
        self.smoothing_center
    }

    pub fn arc_normalization(&self) -> bool {
        self.arc_normalization
    }

    pub fn min_peak_distance(&self) -> usize {
        self.min_peak_distance
    }

    pub fn min_rel_height(&self) -> f64 {
        self.min_rel_height
    }

    /// Column dropped by the loader before the pipeline sees the batch.
    pub fn time_index_column(&self) -> Option<&str> {
        self.time_index_column.as_deref()
    }

    /// Load a JSON config file. Missing keys take their default values.
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        Ok(config)
    }

    /// Start a builder pre-filled with this config's values.
    pub fn to_builder(&self) -> PreprocessingConfigBuilder {
        PreprocessingConfigBuilder {
            inner: self.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct PreprocessingConfigBuilder {
    inner: PreprocessingConfig,
}

impl PreprocessingConfigBuilder {
    pub fn smoothing_window(mut self, window: usize) -> Self {
        self.inner.smoothing_window = window;
        self
    }

    pub fn smoothing_center(mut self, center: bool) -> Self {
        self.inner.smoothing_center = center;
        self
    }

    pub fn arc_normalization(mut self, enabled: bool) -> Self {
        self.inner.arc_normalization = enabled;
        self
    }

    pub fn min_peak_distance(mut self, distance: usize) -> Self {
        self.inner.min_peak_distance = distance;
        self
    }

    pub fn min_rel_height(mut self, height: f64) -> Self {
        self.inner.min_rel_height = height;
        self
    }

    pub fn time_index_column<S: Into<String>>(mut self, column: Option<S>) -> Self {
        self.inner.time_index_column = column.map(Into::into);
        self
    }

    /// Validate and freeze the configuration.
    ///
    /// The odd-window rule for centered smoothing is checked by the smoothing
    /// stage, not here.
    pub fn build(self) -> Result<PreprocessingConfig> {
        let cfg = self.inner;
        if cfg.smoothing_window == 0 {
            return Err(PreprocessError::invalid_configuration(
                "smoothing_window must be at least 1",
            ));
        }
        if !cfg.min_rel_height.is_finite() {
            return Err(PreprocessError::invalid_configuration(format!(
                "min_rel_height must be finite, got {}",
                cfg.min_rel_height
            )));
        }
        Ok(cfg)
    }
}

// ---------------------------------------------------------------------------
// On-disk representation
// ---------------------------------------------------------------------------

/// Serde shape of the config; every key is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    smoothing_window: usize,
    smoothing_center: bool,
    arc_normalization: bool,
    min_peak_distance: usize,
    min_rel_height: f64,
    time_index_column: Option<String>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        PreprocessingConfig::default().into()
    }
}

impl From<PreprocessingConfig> for ConfigFile {
    fn from(cfg: PreprocessingConfig) -> Self {
        ConfigFile {
            smoothing_window: cfg.smoothing_window,
            smoothing_center: cfg.smoothing_center,
            arc_normalization: cfg.arc_normalization,
            min_peak_distance: cfg.min_peak_distance,
            min_rel_height: cfg.min_rel_height,
            time_index_column: cfg.time_index_column,
        }
    }
}

impl TryFrom<ConfigFile> for PreprocessingConfig {
    type Error = PreprocessError;

    fn try_from(file: ConfigFile) -> Result<Self> {
        PreprocessingConfig::builder()
            .smoothing_window(file.smoothing_window)
            .smoothing_center(file.smoothing_center)
            .arc_normalization(file.arc_normalization)
            .min_peak_distance(file.min_peak_distance)
            .min_rel_height(file.min_rel_height)
            .time_index_column(file.time_index_column)
            .build()
    }
}
