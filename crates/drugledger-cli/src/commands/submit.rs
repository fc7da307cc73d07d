//! Submit command implementation.

use crate::cli::SubmitArgs;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::output::Formatter;
use drugledger_batch::{BatchConfig, BatchError, BatchRunner, OpenAiBatchClient, RunOutcome};
use drugledger_domain::BatchService;
use std::path::{Path, PathBuf};

/// Execute the submit command.
pub async fn execute_submit(
    args: SubmitArgs,
    config: &PipelineConfig,
    formatter: &Formatter,
) -> Result<RunOutcome> {
    let batch = batch_config(config, args.output_dir);
    let requests = args.requests.unwrap_or_else(|| config.paths.requests.clone());

    let client = OpenAiBatchClient::from_env(&batch)?;
    submit_with(client, batch, &requests, formatter).await
}

/// Submit a request file through any batch service and report the outcome.
///
/// Fails if the job ended without completing and left no output.
pub async fn submit_with<S>(
    service: S,
    batch: BatchConfig,
    requests: &Path,
    formatter: &Formatter,
) -> Result<RunOutcome>
where
    S: BatchService<Error = BatchError>,
{
    let runner = BatchRunner::new(service, batch)?;
    let outcome = runner.submit(requests).await?;
    println!("{}", formatter.format_outcome(&outcome)?);
    outcome.ensure_usable()?;
    Ok(outcome)
}

/// Batch configuration with an optional output directory override.
pub(crate) fn batch_config(config: &PipelineConfig, output_dir: Option<PathBuf>) -> BatchConfig {
    let mut batch = config.batch.clone();
    if let Some(dir) = output_dir {
        batch.output_dir = dir;
    }
    batch
}
