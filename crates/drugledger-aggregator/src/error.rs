//! Error types for result aggregation

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while aggregating batch output
#[derive(Error, Debug)]
pub enum AggregatorError {
    /// No output file matched the naming convention
    #[error("No batch output files found in {0}; run the submit step first")]
    NoOutputFiles(PathBuf),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Writing a CSV table failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
