//! Trait definitions for external interactions
//!
//! These traits define the boundary between the pipeline and the remote
//! batch-inference service. Implementations live in `drugledger-batch`.

use crate::{BatchJob, Endpoint, FileId};

/// Trait for the external batch-inference service
///
/// Implemented by the infrastructure layer (drugledger-batch)
#[allow(async_fn_in_trait)]
pub trait BatchService {
    /// Error type for service operations
    type Error;

    /// Upload a request file with the "batch" purpose
    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<FileId, Self::Error>;

    /// Create a batch job over an uploaded request file
    async fn create_job(
        &self,
        input_file: &FileId,
        endpoint: Endpoint,
        completion_window: &str,
    ) -> Result<BatchJob, Self::Error>;

    /// Retrieve the current snapshot of a job
    async fn get_status(&self, job_id: &str) -> Result<BatchJob, Self::Error>;

    /// Download a file's raw content
    async fn get_content(&self, file: &FileId) -> Result<Vec<u8>, Self::Error>;
}
