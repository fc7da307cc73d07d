//! Aggregate command implementation.

use crate::cli::AggregateArgs;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::output::Formatter;
use drugledger_aggregator::{AggregateReport, AggregatorConfig, ResultAggregator};

/// Execute the aggregate command.
pub fn execute_aggregate(
    args: AggregateArgs,
    config: &PipelineConfig,
    formatter: &Formatter,
) -> Result<AggregateReport> {
    let mut aggregate = config.aggregate.clone();
    if let Some(dir) = args.output_dir {
        aggregate.output_dir = dir;
    }
    if let Some(dir) = args.data_dir {
        aggregate.data_dir = dir;
    }
    aggregate_with(aggregate, formatter)
}

/// Run the aggregator and print its report.
pub fn aggregate_with(config: AggregatorConfig, formatter: &Formatter) -> Result<AggregateReport> {
    let report = ResultAggregator::new(config)?.run()?;
    println!("{}", formatter.format_report(&report)?);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use crate::output::OutputFormat;
    use drugledger_aggregator::AggregatorError;
    use tempfile::TempDir;

    #[test]
    fn test_no_output_files() {
        let dir = TempDir::new().unwrap();
        let args = AggregateArgs {
            output_dir: Some(dir.path().join("batch_outputs")),
            data_dir: Some(dir.path().join("data")),
        };
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let result = execute_aggregate(args, &PipelineConfig::default(), &formatter);
        assert!(matches!(
            result,
            Err(CliError::Aggregator(AggregatorError::NoOutputFiles(_)))
        ));
    }
}
