//! Scripted in-memory batch service

use crate::error::BatchError;
use drugledger_domain::{BatchJob, BatchService, BatchStatus, Endpoint, FileId};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// Mock batch service for deterministic testing
///
/// Status checks replay a scripted sequence of job snapshots; once one
/// snapshot is left it is returned forever. No network calls are made.
///
/// # Examples
///
/// ```
/// use drugledger_batch::MockBatchService;
/// use drugledger_domain::{BatchJob, BatchStatus};
///
/// let service = MockBatchService::new("batch_1").with_statuses(vec![
///     BatchJob::new("batch_1", BatchStatus::InProgress),
///     BatchJob::new("batch_1", BatchStatus::Completed),
/// ]);
/// assert_eq!(service.status_calls(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct MockBatchService {
    job_id: String,
    statuses: Arc<Mutex<VecDeque<BatchJob>>>,
    files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    uploads: Arc<Mutex<Vec<(String, Vec<u8>)>>>,
    created: Arc<Mutex<Vec<(FileId, Endpoint, String)>>>,
    create_error: Option<String>,
    status_calls: Arc<Mutex<usize>>,
}

impl MockBatchService {
    /// Create a mock whose jobs get the given id
    pub fn new(job_id: impl Into<String>) -> Self {
        let job_id = job_id.into();
        let completed = BatchJob::new(job_id.clone(), BatchStatus::Completed);
        Self {
            job_id,
            statuses: Arc::new(Mutex::new(VecDeque::from(vec![completed]))),
            files: Arc::new(Mutex::new(HashMap::new())),
            uploads: Arc::new(Mutex::new(Vec::new())),
            created: Arc::new(Mutex::new(Vec::new())),
            create_error: None,
            status_calls: Arc::new(Mutex::new(0)),
        }
    }

    /// Script the snapshots returned by successive status checks
    pub fn with_statuses(self, statuses: Vec<BatchJob>) -> Self {
        *self.statuses.lock().unwrap() = statuses.into();
        self
    }

    /// Make a file's content downloadable
    pub fn with_file(self, file_id: impl Into<String>, content: Vec<u8>) -> Self {
        self.files.lock().unwrap().insert(file_id.into(), content);
        self
    }

    /// Make job creation fail with the given service message
    pub fn fail_create_with(mut self, message: impl Into<String>) -> Self {
        self.create_error = Some(message.into());
        self
    }

    /// Number of status checks made so far
    pub fn status_calls(&self) -> usize {
        *self.status_calls.lock().unwrap()
    }

    /// Uploaded files as (name, bytes)
    pub fn uploads(&self) -> Vec<(String, Vec<u8>)> {
        self.uploads.lock().unwrap().clone()
    }

    /// Jobs created as (input file, endpoint, completion window)
    pub fn created_jobs(&self) -> Vec<(FileId, Endpoint, String)> {
        self.created.lock().unwrap().clone()
    }
}

impl BatchService for MockBatchService {
    type Error = BatchError;

    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<FileId, Self::Error> {
        let mut uploads = self.uploads.lock().unwrap();
        uploads.push((file_name.to_string(), bytes));
        Ok(FileId(format!("file-upload-{}", uploads.len())))
    }

    async fn create_job(
        &self,
        input_file: &FileId,
        endpoint: Endpoint,
        completion_window: &str,
    ) -> Result<BatchJob, Self::Error> {
        if let Some(message) = &self.create_error {
            return Err(BatchError::Api {
                status: 400,
                message: message.clone(),
            });
        }
        self.created.lock().unwrap().push((
            input_file.clone(),
            endpoint,
            completion_window.to_string(),
        ));
        Ok(BatchJob::new(self.job_id.clone(), BatchStatus::Validating))
    }

    async fn get_status(&self, job_id: &str) -> Result<BatchJob, Self::Error> {
        *self.status_calls.lock().unwrap() += 1;

        if job_id != self.job_id {
            return Err(BatchError::Api {
                status: 404,
                message: format!("No batch found with id '{}'", job_id),
            });
        }

        let mut statuses = self.statuses.lock().unwrap();
        let job = if statuses.len() > 1 {
            statuses.pop_front()
        } else {
            statuses.front().cloned()
        };
        job.ok_or_else(|| BatchError::InvalidResponse("No scripted status".to_string()))
    }

    async fn get_content(&self, file: &FileId) -> Result<Vec<u8>, Self::Error> {
        self.files
            .lock()
            .unwrap()
            .get(file.as_str())
            .cloned()
            .ok_or_else(|| BatchError::Api {
                status: 404,
                message: format!("No such File object: {}", file),
            })
    }
}
