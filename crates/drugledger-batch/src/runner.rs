//! Core BatchRunner implementation

use crate::artifacts::{error_json_path, error_log_path, output_path};
use crate::config::BatchConfig;
use crate::error::{is_billing_limit_message, BatchError};
use crate::poll::PollState;
use drugledger_domain::{BatchJob, BatchService, BatchStatus, Endpoint, FileId};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// What a finished run left on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// Batch identifier
    pub batch_id: String,

    /// Terminal status observed
    pub status: BatchStatus,

    /// Downloaded output file, if the job referenced one
    pub output_path: Option<PathBuf>,

    /// Salvaged error details, if any were written
    pub error_path: Option<PathBuf>,
}

impl RunOutcome {
    /// Whether the job completed normally
    pub fn is_completed(&self) -> bool {
        self.status == BatchStatus::Completed
    }

    /// Fail if the job neither completed nor left partial output
    ///
    /// A completed job without output is accepted; its error details, if
    /// any, have already been written.
    pub fn ensure_usable(&self) -> Result<(), BatchError> {
        if !self.is_completed() && self.output_path.is_none() {
            return Err(BatchError::NoOutput {
                batch_id: self.batch_id.clone(),
                status: self.status.to_string(),
            });
        }
        Ok(())
    }
}

/// Drives a `BatchService` from request file to local output file
pub struct BatchRunner<S> {
    service: S,
    config: BatchConfig,
    endpoint: Endpoint,
}

impl<S> BatchRunner<S>
where
    S: BatchService<Error = BatchError>,
{
    /// Create a new runner
    pub fn new(service: S, config: BatchConfig) -> Result<Self, BatchError> {
        config.validate().map_err(BatchError::Config)?;
        let endpoint = config.endpoint().map_err(BatchError::Config)?;
        Ok(Self {
            service,
            config,
            endpoint,
        })
    }

    /// The underlying service
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Upload a request file, create the job, wait for it and fetch results
    pub async fn submit(&self, requests_path: impl AsRef<Path>) -> Result<RunOutcome, BatchError> {
        let requests_path = requests_path.as_ref();
        let bytes = fs::read(requests_path)?;
        let file_name = requests_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "batch_requests.jsonl".to_string());

        let upload = self.service.upload(&file_name, bytes).await?;
        info!("Uploaded {} as {}", requests_path.display(), upload);

        let job = self.create_job(&upload).await?;
        info!("Created batch {}", job.id);

        self.resume(&job.id).await
    }

    /// Wait for an existing batch and fetch its results
    pub async fn resume(&self, batch_id: &str) -> Result<RunOutcome, BatchError> {
        let job = self.poll_until_terminal(batch_id).await?;
        self.collect(&job).await
    }

    async fn create_job(&self, upload: &FileId) -> Result<BatchJob, BatchError> {
        match self
            .service
            .create_job(upload, self.endpoint, &self.config.completion_window)
            .await
        {
            Ok(job) => Ok(job),
            Err(e) => {
                let message = e.to_string();
                if is_billing_limit_message(&message) {
                    error!(
                        "Billing hard limit reached (billing_hard_limit_reached). \
                         Raise the quota or add credit for this account/organization, then retry."
                    );
                    return Err(BatchError::BillingLimitReached(message));
                }
                Err(e)
            }
        }
    }

    /// Check status every poll interval until the job reaches a terminal state
    ///
    /// There is no retry cap or timeout; the loop ends only on a terminal
    /// status or a service error.
    pub async fn poll_until_terminal(&self, batch_id: &str) -> Result<BatchJob, BatchError> {
        let mut state = PollState::Submitted;
        loop {
            let job = self.service.get_status(batch_id).await?;
            state = state.advance(&job.status);
            info!(batch_id = %batch_id, status = %job.status, "Polled batch");

            if state.is_terminal() {
                return Ok(job);
            }
            tokio::time::sleep(self.config.poll_interval()).await;
        }
    }

    async fn collect(&self, job: &BatchJob) -> Result<RunOutcome, BatchError> {
        let mut outcome = RunOutcome {
            batch_id: job.id.clone(),
            status: job.status.clone(),
            output_path: None,
            error_path: None,
        };

        match (&job.status, &job.output_file_id) {
            (BatchStatus::Failed, _) => {
                outcome.error_path = self.salvage_errors(job).await;
                if job.error_file_id.is_none() && job.inline_errors.is_none() {
                    warn!("Batch {} failed without an error file or inline errors", job.id);
                }
            }
            (BatchStatus::Completed, None) => {
                warn!(
                    "Batch {} completed without an output file; every request may have failed",
                    job.id
                );
                outcome.error_path = self.salvage_errors(job).await;
                if job.error_file_id.is_none() && job.inline_errors.is_none() {
                    warn!("Batch {} has neither an error file nor inline errors", job.id);
                }
            }
            (_, Some(_)) if job.error_file_id.is_some() => {
                outcome.error_path = self.salvage_errors(job).await;
            }
            (status, None) => {
                warn!("Batch {} ended with status '{}'", job.id, status);
            }
            _ => {}
        }

        if let Some(file) = &job.output_file_id {
            info!("Output file: {}", file);
            let content = self.service.get_content(file).await?;
            let path = output_path(&self.config.output_dir, &job.id);
            write_artifact(&path, &content)?;
            info!("Downloaded output to {}", path.display());
            outcome.output_path = Some(path);
        }

        Ok(outcome)
    }

    /// Write whichever error detail the job offers; never fails the run
    async fn salvage_errors(&self, job: &BatchJob) -> Option<PathBuf> {
        if let Some(file) = &job.error_file_id {
            let path = error_log_path(&self.config.output_dir, &job.id);
            let result = match self.service.get_content(file).await {
                Ok(bytes) => {
                    let text = String::from_utf8_lossy(&bytes);
                    write_artifact(&path, text.as_bytes()).map_err(BatchError::from)
                }
                Err(e) => Err(e),
            };
            return match result {
                Ok(()) => {
                    info!("Wrote error details to {}", path.display());
                    Some(path)
                }
                Err(e) => {
                    warn!("Failed to retrieve error file {}: {}", file, e);
                    None
                }
            };
        }

        if let Some(errors) = &job.inline_errors {
            let path = error_json_path(&self.config.output_dir, &job.id);
            return match write_artifact(&path, errors.as_bytes()) {
                Ok(()) => {
                    info!("Wrote error details to {}", path.display());
                    Some(path)
                }
                Err(e) => {
                    warn!("Failed to write inline errors for {}: {}", job.id, e);
                    None
                }
            };
        }

        None
    }
}

fn write_artifact(path: &Path, content: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    debug!("Writing {} bytes to {}", content.len(), path.display());
    fs::write(path, content)
}
