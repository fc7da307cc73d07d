//! Error types for request building

use thiserror::Error;

/// Errors that can occur while building batch requests
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// A required input column is absent
    #[error("Missing required column '{0}' (expected case_number and judgment)")]
    MissingColumn(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Reading the case table failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
