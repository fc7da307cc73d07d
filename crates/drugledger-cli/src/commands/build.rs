//! Build command implementation.

use crate::cli::BuildArgs;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::output::Formatter;
use drugledger_extractor::{BuildSummary, ExtractionSchema, RequestBuilder, SystemPrompt};

/// Execute the build command.
pub fn execute_build(
    args: BuildArgs,
    config: &PipelineConfig,
    formatter: &Formatter,
) -> Result<BuildSummary> {
    let mut requests = config.requests.clone();
    if let Some(model) = args.model {
        requests.model = model;
    }

    let input = args.input.unwrap_or_else(|| config.paths.input.clone());
    let requests_path = args.requests.unwrap_or_else(|| config.paths.requests.clone());
    let schema_path = args.schema.unwrap_or_else(|| config.paths.schema.clone());

    let schema = ExtractionSchema::standard(&requests.schema_name);
    let builder = RequestBuilder::new(requests, schema, SystemPrompt::default())?;
    let summary = builder.run(&input, &requests_path, &schema_path)?;

    println!("{}", formatter.format_build(&summary)?);
    Ok(summary)
}
