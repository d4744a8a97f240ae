use thiserror::Error;

/// Convenience result type for ingestion operations.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Convenience result type for loading pipeline specifications.
pub type SpecResult<T> = Result<T, SpecError>;

/// Error type returned by ingestion functions.
///
/// This is a single error enum shared across CSV and JSON ingestion. Individual malformed cells
/// never produce an error: they are kept as text and coerced downstream.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV ingestion error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON ingestion error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The input has no usable shape (no header row, JSON that is not made of objects, etc.).
    #[error("schema mismatch: {message}")]
    SchemaMismatch { message: String },
}

/// Error type returned when loading a [`crate::spec::PipelineSpec`] from JSON.
#[derive(Debug, Error)]
pub enum SpecError {
    /// The specification file could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The specification is not valid JSON or has the wrong shape (including malformed dates).
    #[error("invalid pipeline spec: {0}")]
    Json(#[from] serde_json::Error),
}
