//! Error types for the CLI application.

use drugledger_aggregator::AggregatorError;
use drugledger_batch::BatchError;
use drugledger_extractor::ExtractorError;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Request building failed
    #[error(transparent)]
    Extractor(#[from] ExtractorError),

    /// Batch submission or retrieval failed
    #[error(transparent)]
    Batch(#[from] BatchError),

    /// Aggregation failed
    #[error(transparent)]
    Aggregator(#[from] AggregatorError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}
