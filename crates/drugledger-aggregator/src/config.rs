//! Configuration for result aggregation

use drugledger_domain::batch::{OUTPUT_FILE_EXTENSION, OUTPUT_FILE_PREFIX};
use drugledger_domain::drug::UNSPECIFIED_DRUG;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the ResultAggregator
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatorConfig {
    /// Directory holding downloaded batch output
    pub output_dir: PathBuf,

    /// File-name prefix of output files
    pub output_prefix: String,

    /// File extension of output files (without the dot)
    pub output_extension: String,

    /// Directory receiving the deliverables
    pub data_dir: PathBuf,

    /// Detail table file name
    pub details_file: String,

    /// Summary table file name
    pub summary_file: String,

    /// Grand-total file name
    pub total_file: String,

    /// Label for entries with a blank standardised name
    pub unspecified_label: String,
}

impl AggregatorConfig {
    /// Detail table path
    pub fn details_path(&self) -> PathBuf {
        self.data_dir.join(&self.details_file)
    }

    /// Summary table path
    pub fn summary_path(&self) -> PathBuf {
        self.data_dir.join(&self.summary_file)
    }

    /// Grand-total file path
    pub fn total_path(&self) -> PathBuf {
        self.data_dir.join(&self.total_file)
    }

    /// Whether a file name follows the output naming convention
    pub fn matches_output(&self, file_name: &str) -> bool {
        file_name.starts_with(&self.output_prefix)
            && file_name
                .strip_suffix(&self.output_extension)
                .is_some_and(|stem| stem.ends_with('.'))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.output_prefix.is_empty() {
            return Err("output_prefix must not be empty".to_string());
        }
        if self.output_extension.is_empty() {
            return Err("output_extension must not be empty".to_string());
        }
        for (field, value) in [
            ("details_file", &self.details_file),
            ("summary_file", &self.summary_file),
            ("total_file", &self.total_file),
        ] {
            if value.trim().is_empty() {
                return Err(format!("{} must not be empty", field));
            }
        }
        if self.unspecified_label.trim().is_empty() {
            return Err("unspecified_label must not be empty".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str)
            .map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("batch_outputs"),
            output_prefix: OUTPUT_FILE_PREFIX.to_string(),
            output_extension: OUTPUT_FILE_EXTENSION.to_string(),
            data_dir: PathBuf::from("data"),
            details_file: "details_per_evidence.csv".to_string(),
            summary_file: "summary_by_drug.csv".to_string(),
            total_file: "TOTAL.txt".to_string(),
            unspecified_label: UNSPECIFIED_DRUG.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AggregatorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.details_path(), PathBuf::from("data/details_per_evidence.csv"));
        assert_eq!(config.unspecified_label, "未指明");
    }

    #[test]
    fn test_output_name_matching() {
        let config = AggregatorConfig::default();
        assert!(config.matches_output("batch_output_batch_abc.jsonl"));
        assert!(!config.matches_output("batch_error_batch_abc.json"));
        assert!(!config.matches_output("batch_output_batch_abc.jsonl.tmp"));
        assert!(!config.matches_output("batch_output_abcjsonl"));
    }

    #[test]
    fn test_blank_label_rejected() {
        let config = AggregatorConfig {
            unspecified_label: " ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = AggregatorConfig {
            unspecified_label: "unspecified".to_string(),
            ..Default::default()
        };
        let parsed = AggregatorConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed.unspecified_label, "unspecified");
        assert_eq!(parsed.data_dir, PathBuf::from("data"));
    }
}
