//! Preprocessing for batches of univariate time series.
//!
//! A batch of curves sharing one index goes through moving-average
//! smoothing, optional arc-length normalization and peak detection, and
//! comes back as the normalized batch plus a table of peak annotations.
//!
//! ```no_run
//! use timeseries_preproc::{CurveBatch, PreprocessingConfig, run};
//!
//! let batch = CurveBatch::from_columns(vec![("a", vec![0.0, 2.0, 0.0, 4.0, 0.0])])?;
//! let config = PreprocessingConfig::builder().smoothing_window(3).build()?;
//! let out = run(&batch, &config)?;
//! println!("{} peaks", out.annotations.len());
//! # Ok::<(), timeseries_preproc::PreprocessError>(())
//! ```

pub mod config;
pub mod data;
pub mod error;
pub mod job;
pub mod pipeline;

pub use config::PreprocessingConfig;
pub use data::model::{Curve, CurveBatch, IndexLabel, PeakAnnotation};
pub use error::{PreprocessError, Result};
pub use job::{JobRecord, JobStatus, JobSummary};
pub use pipeline::{PipelineOutput, run};
