//! Drugledger Batch Runner
//!
//! Bridges a local request file to an external batch-inference service and
//! materialises the job's output locally.
//!
//! # Architecture
//!
//! This crate provides implementations of the `BatchService` trait from
//! `drugledger-domain` and the polling loop that drives them.
//!
//! ```text
//! batch_requests.jsonl → upload → create job → poll … → download
//!                                                     └→ batch_outputs/batch_output_<id>.jsonl
//! ```
//!
//! # Services
//!
//! - `OpenAiBatchClient`: OpenAI-compatible Files + Batches HTTP API
//! - `MockBatchService`: Scripted, in-memory service for testing
//!
//! # Examples
//!
//! ```
//! use drugledger_batch::{BatchConfig, BatchRunner, MockBatchService};
//! use drugledger_domain::{BatchJob, BatchStatus, FileId};
//!
//! # async fn example() -> Result<(), drugledger_batch::BatchError> {
//! let mut done = BatchJob::new("batch_1", BatchStatus::Completed);
//! done.output_file_id = Some(FileId::new("file_out"));
//!
//! let service = MockBatchService::new("batch_1")
//!     .with_statuses(vec![done])
//!     .with_file("file_out", b"{}\n".to_vec());
//!
//! let runner = BatchRunner::new(service, BatchConfig::default())?;
//! let outcome = runner.resume("batch_1").await?;
//! assert!(outcome.output_path.is_some());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod artifacts;
mod config;
mod error;
mod mock;
mod openai;
mod poll;
mod runner;

pub use artifacts::{error_json_path, error_log_path, output_path, render_inline_errors};
pub use config::BatchConfig;
pub use error::{is_billing_limit_message, BatchError};
pub use mock::MockBatchService;
pub use openai::OpenAiBatchClient;
pub use poll::PollState;
pub use runner::{BatchRunner, RunOutcome};
