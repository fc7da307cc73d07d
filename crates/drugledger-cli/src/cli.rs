//! CLI command definitions and argument parsing.

use crate::output::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Drugledger - extract and total drug-possession amounts from court judgments.
#[derive(Debug, Parser)]
#[command(name = "drugledger")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true, default_value = "table")]
    pub format: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "DRUGLEDGER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build the batch request file and schema from the case table
    Build(BuildArgs),

    /// Upload a request file, wait for the batch and download its output
    Submit(SubmitArgs),

    /// Wait for an existing batch and download its output
    Fetch(FetchArgs),

    /// Total the downloaded output into the detail, summary and total files
    Aggregate(AggregateArgs),

    /// Build, submit and aggregate in one go
    Run(RunArgs),

    /// Show the effective configuration
    Config(ConfigArgs),
}

/// Arguments for the build command.
#[derive(Debug, Default, Parser)]
pub struct BuildArgs {
    /// Case table (CSV with case_number and judgment columns)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Request file to write
    #[arg(short, long)]
    pub requests: Option<PathBuf>,

    /// Schema file to write
    #[arg(short, long)]
    pub schema: Option<PathBuf>,

    /// Model identifier
    #[arg(short, long)]
    pub model: Option<String>,
}

/// Arguments for the submit command.
#[derive(Debug, Default, Parser)]
pub struct SubmitArgs {
    /// Request file to upload
    #[arg(short, long)]
    pub requests: Option<PathBuf>,

    /// Directory for downloaded output and error files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
}

/// Arguments for the fetch command.
#[derive(Debug, Parser)]
pub struct FetchArgs {
    /// Batch identifier returned by an earlier submit
    pub batch_id: String,

    /// Directory for downloaded output and error files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
}

/// Arguments for the aggregate command.
#[derive(Debug, Default, Parser)]
pub struct AggregateArgs {
    /// Directory holding downloaded output files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Directory receiving the result tables
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,
}

/// Arguments for the run command.
#[derive(Debug, Default, Parser)]
pub struct RunArgs {
    /// Case table (CSV with case_number and judgment columns)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Skip the build step and submit the existing request file
    #[arg(long)]
    pub skip_build: bool,
}

/// Arguments for the config command.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    /// Print only the path of the loaded configuration file
    #[arg(long)]
    pub path: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_command() {
        let cli = Cli::parse_from(["drugledger", "build", "--input", "cases.csv", "-m", "gpt-4o"]);
        match cli.command {
            Command::Build(args) => {
                assert_eq!(args.input, Some(PathBuf::from("cases.csv")));
                assert_eq!(args.model.as_deref(), Some("gpt-4o"));
            }
            _ => panic!("Expected Build command"),
        }
        assert!(matches!(cli.format, OutputFormat::Table));
    }

    #[test]
    fn test_fetch_requires_batch_id() {
        assert!(Cli::try_parse_from(["drugledger", "fetch"]).is_err());

        let cli = Cli::parse_from(["drugledger", "fetch", "batch_abc"]);
        match cli.command {
            Command::Fetch(args) => assert_eq!(args.batch_id, "batch_abc"),
            _ => panic!("Expected Fetch command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["drugledger", "aggregate", "--format", "json", "--no-color", "-v"]);
        assert!(matches!(cli.format, OutputFormat::Json));
        assert!(cli.no_color);
        assert!(cli.verbose);
    }
}
