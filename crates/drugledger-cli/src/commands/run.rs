//! Run command implementation: build, submit and aggregate in sequence.

use crate::cli::{BuildArgs, RunArgs};
use crate::commands::aggregate::aggregate_with;
use crate::commands::build::execute_build;
use crate::commands::submit::submit_with;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::output::Formatter;
use drugledger_aggregator::AggregateReport;
use drugledger_batch::{BatchError, OpenAiBatchClient};
use drugledger_domain::BatchService;
use tracing::info;

/// Execute the run command.
pub async fn execute_run(
    args: RunArgs,
    config: &PipelineConfig,
    formatter: &Formatter,
) -> Result<AggregateReport> {
    // Fail on a missing credential before anything is written
    let client = OpenAiBatchClient::from_env(&config.batch)?;
    run_with(client, args, config, formatter).await
}

/// Run every stage against any batch service.
///
/// Aggregation reads from the batch output directory, so every output file
/// already there is included.
pub async fn run_with<S>(
    service: S,
    args: RunArgs,
    config: &PipelineConfig,
    formatter: &Formatter,
) -> Result<AggregateReport>
where
    S: BatchService<Error = BatchError>,
{
    if args.skip_build {
        info!("Skipping build; using {}", config.paths.requests.display());
    } else {
        let build = BuildArgs {
            input: args.input,
            ..Default::default()
        };
        execute_build(build, config, formatter)?;
    }

    submit_with(service, config.batch.clone(), &config.paths.requests, formatter).await?;

    let mut aggregate = config.aggregate.clone();
    aggregate.output_dir = config.batch.output_dir.clone();
    aggregate_with(aggregate, formatter)
}
