//! Configuration for request building

use crate::error::ExtractorError;
use drugledger_domain::Endpoint;
use serde::{Deserialize, Serialize};

/// Configuration for the RequestBuilder
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestConfig {
    /// Model identifier placed in every request body
    pub model: String,

    /// Endpoint path the requests target
    pub endpoint: String,

    /// Sampling temperature (0 for deterministic decoding)
    pub temperature: f64,

    /// Name given to the structured output schema
    pub schema_name: String,
}

impl RequestConfig {
    /// Parsed endpoint family
    pub fn endpoint(&self) -> Result<Endpoint, ExtractorError> {
        self.endpoint.parse().map_err(ExtractorError::Config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("model must not be empty".to_string());
        }
        if Endpoint::parse(&self.endpoint).is_none() {
            return Err(format!("unsupported endpoint '{}'", self.endpoint));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(format!("temperature {} out of range [0.0, 2.0]", self.temperature));
        }
        if self.schema_name.trim().is_empty() {
            return Err("schema_name must not be empty".to_string());
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

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            endpoint: Endpoint::Responses.as_str().to_string(),
            temperature: 0.0,
            schema_name: "CaseDrugExtraction".to_string(),
        }
    }
}
