use thiserror::Error;

/// Convenience result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Error type returned by the normalization pipeline and its I/O collaborators.
///
/// Cell-level validation failures are never errors: they are recorded in the
/// [`crate::report::Report`] instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read/write error outside of row iteration (headers, writer flush).
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// A JSON configuration profile could not be parsed, or a report could not be serialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid pipeline configuration, detected before any chunk is processed.
    #[error("invalid configuration: {message}")]
    Config { message: String },

    /// The row source failed to produce the next row. Fatal to the run.
    #[error("failed to read source at row {row}: {message}")]
    SourceRead { row: usize, message: String },
}

impl PipelineError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
