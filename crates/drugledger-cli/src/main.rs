//! Drugledger CLI - command-line front end for the extraction pipeline.

use clap::Parser;
use drugledger_cli::commands;
use drugledger_cli::{Cli, Command, Formatter, PipelineConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> drugledger_cli::Result<()> {
    let (config, source) = PipelineConfig::load(cli.config.as_deref())?;
    config.validate()?;

    let formatter = Formatter::new(cli.format, !cli.no_color);

    match cli.command {
        Command::Build(args) => {
            commands::execute_build(args, &config, &formatter)?;
        }
        Command::Submit(args) => {
            commands::execute_submit(args, &config, &formatter).await?;
        }
        Command::Fetch(args) => {
            commands::execute_fetch(args, &config, &formatter).await?;
        }
        Command::Aggregate(args) => {
            commands::execute_aggregate(args, &config, &formatter)?;
        }
        Command::Run(args) => {
            commands::execute_run(args, &config, &formatter).await?;
        }
        Command::Config(args) => {
            commands::execute_config(args, &config, source.as_deref(), &formatter)?;
        }
    }

    Ok(())
}
