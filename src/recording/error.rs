use std::path::PathBuf;

use crate::trace::TraceError;

/// Errors that can occur while locating or loading recordings
#[derive(Debug, thiserror::Error)]
pub enum RecordingError {
    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV/TSV parsing error
    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    /// Arrow error
    #[error("Arrow error: {0}")]
    ArrowError(#[from] arrow::error::ArrowError),

    /// Parquet error
    #[error("Parquet error: {0}")]
    ParquetError(#[from] parquet::errors::ParquetError),

    /// Required channel column is absent
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// File content does not match the expected layout
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// File extension is not a supported recording format
    #[error("Unsupported recording format: {0}")]
    UnsupportedFormat(String),

    /// Cell folder has no hold folder for the requested experiment
    #[error("Hold folder not found: {}", .0.display())]
    MissingHoldFolder(PathBuf),

    /// Sample rate is neither stored, supplied, nor inferable
    #[error("Sample rate unavailable: {0}")]
    MissingSampleRate(String),

    /// Channels loaded but violate the trace contract
    #[error("Invalid trace: {0}")]
    Trace(#[from] TraceError),
}
