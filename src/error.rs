//! Error types for the report boundary (reading input, writing output).
//!
//! The core pipeline never fails: rejected records are counted, not raised.

use thiserror::Error;

/// Result type alias for boundary operations
pub type Result<T> = std::result::Result<T, ReportError>;

/// Errors that can occur while loading records or writing the report.
#[derive(Error, Debug)]
pub enum ReportError {
    /// Failed to open, read, or write a file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input is not valid JSON, or the report could not be encoded
    #[error("Invalid JSON format: {0}")]
    Json(#[from] serde_json::Error),

    /// A record whose shape can never be classified (e.g. an object where a string belongs)
    #[error("Invalid transaction record at index {index}: {message}")]
    InvalidRecord { index: usize, message: String },
}

impl ReportError {
    pub(crate) fn invalid_record(index: usize, message: impl Into<String>) -> Self {
        ReportError::InvalidRecord {
            index,
            message: message.into(),
        }
    }
}
