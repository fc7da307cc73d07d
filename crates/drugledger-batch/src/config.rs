//! Configuration for the batch runner

use drugledger_domain::Endpoint;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for the BatchRunner and HTTP client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Base URL of the OpenAI-compatible API
    pub api_base: String,

    /// Environment variable holding the API key
    pub api_key_env: String,

    /// Endpoint the batch job runs against
    pub endpoint: String,

    /// Completion window passed at job creation
    pub completion_window: String,

    /// Seconds between status checks
    pub poll_interval_secs: u64,

    /// Per-HTTP-request timeout (seconds)
    pub request_timeout_secs: u64,

    /// Directory receiving output and error artifacts
    pub output_dir: PathBuf,
}

impl BatchConfig {
    /// Poll interval as a Duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// HTTP timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Parsed endpoint
    pub fn endpoint(&self) -> Result<Endpoint, String> {
        self.endpoint.parse()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.api_base.trim().is_empty() {
            return Err("api_base must not be empty".to_string());
        }
        if self.api_key_env.trim().is_empty() {
            return Err("api_key_env must not be empty".to_string());
        }
        self.endpoint()?;
        if self.completion_window.trim().is_empty() {
            return Err("completion_window must not be empty".to_string());
        }
        if self.poll_interval_secs == 0 {
            return Err("poll_interval_secs must be greater than 0".to_string());
        }
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be greater than 0".to_string());
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

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            endpoint: Endpoint::Responses.as_str().to_string(),
            completion_window: "24h".to_string(),
            poll_interval_secs: 10,
            request_timeout_secs: 120,
            output_dir: PathBuf::from("batch_outputs"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = BatchConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.poll_interval(), Duration::from_secs(10));
        assert_eq!(config.completion_window, "24h");
    }

    #[test]
    fn test_unsupported_endpoint() {
        let config = BatchConfig {
            endpoint: "/v1/moderations".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let config = BatchConfig {
            poll_interval_secs: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.contains("poll_interval_secs"));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let config = BatchConfig {
            request_timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = BatchConfig {
            poll_interval_secs: 30,
            ..Default::default()
        };
        let parsed = BatchConfig::from_toml(&config.to_toml().unwrap()).unwrap();
        assert_eq!(parsed.poll_interval_secs, 30);
        assert_eq!(parsed.output_dir, PathBuf::from("batch_outputs"));
    }
}
