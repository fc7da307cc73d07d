//! Config command implementation.

use crate::cli::ConfigArgs;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::output::Formatter;
use std::path::Path;

/// Execute the config command.
pub fn execute_config(
    args: ConfigArgs,
    config: &PipelineConfig,
    source: Option<&Path>,
    formatter: &Formatter,
) -> Result<()> {
    if args.path {
        match source {
            Some(path) => println!("{}", path.display()),
            None => println!("{}", formatter.info("No configuration file found; using defaults")),
        }
        return Ok(());
    }

    if let Some(path) = source {
        println!("# {}", path.display());
    }
    println!("{}", config.to_toml()?);
    Ok(())
}
