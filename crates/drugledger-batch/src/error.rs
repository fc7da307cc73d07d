//! Error types for batch operations

use thiserror::Error;

/// Error text fragments the service uses when the account spend cap is hit
const BILLING_LIMIT_MARKERS: [&str; 2] = [
    "billing_hard_limit_reached",
    "Billing hard limit has been reached",
];

/// Errors that can occur while running a batch
#[derive(Error, Debug)]
pub enum BatchError {
    /// The API credential variable is unset or empty
    #[error("{0} is not set; export it with your API key before submitting")]
    MissingCredential(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network or transport failure
    #[error("Communication error: {0}")]
    Communication(String),

    /// Non-success HTTP status from the service
    #[error("API error (HTTP {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },

    /// Job creation refused because the account's billing hard limit is reached
    #[error("Billing hard limit reached; raise the quota or add credit for this account/organization, then retry ({0})")]
    BillingLimitReached(String),

    /// Response body did not have the expected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The job ended without an output file
    #[error("Batch {batch_id} ended with status '{status}' and produced no output file")]
    NoOutput {
        /// Batch identifier
        batch_id: String,
        /// Terminal status
        status: String,
    },

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for BatchError {
    fn from(e: reqwest::Error) -> Self {
        BatchError::Communication(e.to_string())
    }
}

/// Whether an error message reports the billing hard limit
pub fn is_billing_limit_message(message: &str) -> bool {
    BILLING_LIMIT_MARKERS.iter().any(|m| message.contains(m))
}
