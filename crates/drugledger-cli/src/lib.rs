//! Drugledger CLI library.
//!
//! This library provides the command-line front end for the drugledger
//! pipeline: configuration loading, one command per stage, and console
//! formatting of each stage's result.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use config::PipelineConfig;
pub use error::{CliError, Result};
pub use output::{Formatter, OutputFormat};
