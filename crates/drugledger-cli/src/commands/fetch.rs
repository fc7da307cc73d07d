//! Fetch command implementation.

use crate::cli::FetchArgs;
use crate::commands::submit::batch_config;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::output::Formatter;
use drugledger_batch::{BatchConfig, BatchError, BatchRunner, OpenAiBatchClient, RunOutcome};
use drugledger_domain::BatchService;

/// Execute the fetch command.
pub async fn execute_fetch(
    args: FetchArgs,
    config: &PipelineConfig,
    formatter: &Formatter,
) -> Result<RunOutcome> {
    let batch = batch_config(config, args.output_dir);
    let client = OpenAiBatchClient::from_env(&batch)?;
    fetch_with(client, batch, &args.batch_id, formatter).await
}

/// Wait for an earlier batch through any batch service and report the outcome.
pub async fn fetch_with<S>(
    service: S,
    batch: BatchConfig,
    batch_id: &str,
    formatter: &Formatter,
) -> Result<RunOutcome>
where
    S: BatchService<Error = BatchError>,
{
    let runner = BatchRunner::new(service, batch)?;
    let outcome = runner.resume(batch_id).await?;
    println!("{}", formatter.format_outcome(&outcome)?);
    outcome.ensure_usable()?;
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use drugledger_batch::MockBatchService;
    use drugledger_domain::{BatchJob, BatchStatus, FileId};
    use tempfile::TempDir;

    #[tokio::test(start_paused = true)]
    async fn test_fetch_skips_upload() {
        let dir = TempDir::new().unwrap();
        let mut done = BatchJob::new("batch_old", BatchStatus::Completed);
        done.output_file_id = Some(FileId::new("file_out"));
        let service = MockBatchService::new("batch_old")
            .with_statuses(vec![done])
            .with_file("file_out", b"\n".to_vec());

        let batch = batch_config(&PipelineConfig::default(), Some(dir.path().to_path_buf()));
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let outcome = fetch_with(service, batch, "batch_old", &formatter).await.unwrap();

        assert_eq!(outcome.batch_id, "batch_old");
        assert!(outcome.output_path.is_some());
    }
}
