//! Pipeline configuration for the CLI.
//!
//! A single `drugledger.toml` carries one section per stage plus the file
//! locations shared between them:
//!
//! ```toml
//! [paths]
//! input = "cases.csv"
//!
//! [requests]
//! model = "gpt-4o-mini"
//!
//! [batch]
//! poll_interval_secs = 10
//!
//! [aggregate]
//! data_dir = "data"
//! ```

use crate::error::{CliError, Result};
use drugledger_aggregator::AggregatorConfig;
use drugledger_batch::BatchConfig;
use drugledger_domain::batch::{OUTPUT_FILE_EXTENSION, OUTPUT_FILE_PREFIX};
use drugledger_extractor::RequestConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration file name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "drugledger.toml";

/// File locations shared between stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Case table
    pub input: PathBuf,

    /// Request file written by build and uploaded by submit
    pub requests: PathBuf,

    /// Schema artifact
    pub schema: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("cases.csv"),
            requests: PathBuf::from("batch_requests.jsonl"),
            schema: PathBuf::from("schema.json"),
        }
    }
}

/// Whole-pipeline configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// File locations
    pub paths: PathsConfig,

    /// Request building
    pub requests: RequestConfig,

    /// Batch submission and polling
    pub batch: BatchConfig,

    /// Aggregation
    pub aggregate: AggregatorConfig,
}

impl PipelineConfig {
    /// User-level configuration file path.
    pub fn user_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".drugledger").join("config.toml"))
    }

    /// Load the effective configuration.
    ///
    /// An explicit path must exist. Otherwise `./drugledger.toml` and then the
    /// user-level file are tried, falling back to defaults. Returns the file
    /// that was read, if any.
    pub fn load(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(CliError::Config(format!(
                    "Configuration file not found: {}",
                    path.display()
                )));
            }
            return Ok((Self::load_from(path)?, Some(path.to_path_buf())));
        }

        let candidates = [Some(PathBuf::from(LOCAL_CONFIG_FILE)), Self::user_path()];
        for path in candidates.into_iter().flatten() {
            if path.is_file() {
                return Ok((Self::load_from(&path)?, Some(path)));
            }
        }

        Ok((Self::default(), None))
    }

    /// Read and validate a configuration file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: PipelineConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every section.
    ///
    /// The batch job must target the endpoint the requests are built for,
    /// and aggregation must look for files under the name they are
    /// downloaded to.
    pub fn validate(&self) -> Result<()> {
        self.requests
            .validate()
            .map_err(|e| CliError::Config(format!("[requests] {}", e)))?;
        self.batch
            .validate()
            .map_err(|e| CliError::Config(format!("[batch] {}", e)))?;
        self.aggregate
            .validate()
            .map_err(|e| CliError::Config(format!("[aggregate] {}", e)))?;

        if self.requests.endpoint != self.batch.endpoint {
            return Err(CliError::Config(format!(
                "[requests] endpoint '{}' differs from [batch] endpoint '{}'",
                self.requests.endpoint, self.batch.endpoint
            )));
        }

        if self.aggregate.output_prefix != OUTPUT_FILE_PREFIX
            || self.aggregate.output_extension != OUTPUT_FILE_EXTENSION
        {
            return Err(CliError::Config(format!(
                "[aggregate] output files must be named {}<id>.{} to match downloaded batch output",
                OUTPUT_FILE_PREFIX, OUTPUT_FILE_EXTENSION
            )));
        }
        Ok(())
    }

    /// Serialize to TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))
    }
}
