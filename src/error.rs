use thiserror::Error;

/// Errors raised by the numeric core and the `CurveBatch` constructors.
///
/// File and format problems live at the I/O edge and are reported through
/// `anyhow` instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PreprocessError {
    /// A configuration value the pipeline cannot work with
    /// (e.g. centered smoothing with an even window).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A curve batch that breaks the shared-index invariant.
    #[error("invalid curve batch: {0}")]
    InvalidBatch(String),
}

impl PreprocessError {
    pub fn invalid_configuration<S: Into<String>>(message: S) -> Self {
        PreprocessError::InvalidConfiguration(message.into())
    }

    pub fn invalid_batch<S: Into<String>>(message: S) -> Self {
        PreprocessError::InvalidBatch(message.into())
    }
}

pub type Result<T> = std::result::Result<T, PreprocessError>;
