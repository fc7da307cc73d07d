//! Batch module - snapshots of external batch jobs

use std::fmt;

/// File-name prefix of downloaded batch output
pub const OUTPUT_FILE_PREFIX: &str = "batch_output_";

/// File extension of downloaded batch output (without the dot)
pub const OUTPUT_FILE_EXTENSION: &str = "jsonl";

/// Inference endpoint family a batch targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `/v1/responses`
    Responses,

    /// `/v1/chat/completions`
    ChatCompletions,
}

impl Endpoint {
    /// Get the endpoint path
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Responses => "/v1/responses",
            Endpoint::ChatCompletions => "/v1/chat/completions",
        }
    }

    /// Parse an endpoint path
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "/v1/responses" => Some(Endpoint::Responses),
            "/v1/chat/completions" => Some(Endpoint::ChatCompletions),
            _ => None,
        }
    }
}

impl std::str::FromStr for Endpoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Unsupported endpoint: {}", s))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifier of a file held by the batch service
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileId(pub String);

impl FileId {
    /// Create a file id
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw id
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle status reported by the batch service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchStatus {
    /// Input file is being validated
    Validating,
    /// Requests are being processed
    InProgress,
    /// Results are being assembled
    Finalizing,
    /// Finished; output (and possibly error) file available
    Completed,
    /// Rejected or aborted by the service
    Failed,
    /// Cancellation requested but not yet effective
    Cancelling,
    /// Cancelled
    Cancelled,
    /// Did not finish inside the completion window
    Expired,
    /// Any status this crate does not know about
    Other(String),
}

impl BatchStatus {
    /// Get the status name as reported by the service
    pub fn as_str(&self) -> &str {
        match self {
            BatchStatus::Validating => "validating",
            BatchStatus::InProgress => "in_progress",
            BatchStatus::Finalizing => "finalizing",
            BatchStatus::Completed => "completed",
            BatchStatus::Failed => "failed",
            BatchStatus::Cancelling => "cancelling",
            BatchStatus::Cancelled => "cancelled",
            BatchStatus::Expired => "expired",
            BatchStatus::Other(s) => s,
        }
    }

    /// Parse a status string; unknown values are kept as `Other`
    pub fn parse(s: &str) -> Self {
        match s {
            "validating" => BatchStatus::Validating,
            "in_progress" => BatchStatus::InProgress,
            "finalizing" => BatchStatus::Finalizing,
            "completed" => BatchStatus::Completed,
            "failed" => BatchStatus::Failed,
            "cancelling" => BatchStatus::Cancelling,
            "cancelled" => BatchStatus::Cancelled,
            "expired" => BatchStatus::Expired,
            other => BatchStatus::Other(other.to_string()),
        }
    }

    /// Whether polling should stop at this status
    ///
    /// Only completed, failed, cancelled and expired are terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BatchStatus::Completed
                | BatchStatus::Failed
                | BatchStatus::Cancelled
                | BatchStatus::Expired
        )
    }
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of a batch job as last reported by the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchJob {
    /// Batch identifier
    pub id: String,

    /// Current status
    pub status: BatchStatus,

    /// Result file, once available
    pub output_file_id: Option<FileId>,

    /// Per-request error file, if the service produced one
    pub error_file_id: Option<FileId>,

    /// Inline job-level errors, serialized as JSON text
    pub inline_errors: Option<String>,
}

impl BatchJob {
    /// Create a snapshot with only an id and status
    pub fn new(id: impl Into<String>, status: BatchStatus) -> Self {
        Self {
            id: id.into(),
            status,
            output_file_id: None,
            error_file_id: None,
            inline_errors: None,
        }
    }
}
