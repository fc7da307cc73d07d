//! OpenAI-compatible Batch API client
//!
//! Talks to the Files and Batches endpoints:
//!
//! - `POST {api_base}/files` (multipart, `purpose=batch`)
//! - `POST {api_base}/batches`
//! - `GET  {api_base}/batches/{id}`
//! - `GET  {api_base}/files/{id}/content`
//!
//! # Examples
//!
//! ```no_run
//! use drugledger_batch::{BatchConfig, OpenAiBatchClient};
//!
//! // Fails with MissingCredential unless OPENAI_API_KEY is exported
//! let client = OpenAiBatchClient::from_env(&BatchConfig::default());
//! ```

use crate::artifacts::render_inline_errors;
use crate::config::BatchConfig;
use crate::error::BatchError;
use drugledger_domain::{BatchJob, BatchService, BatchStatus, Endpoint, FileId};
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// HTTP implementation of `BatchService`
pub struct OpenAiBatchClient {
    api_base: String,
    api_key: String,
    client: reqwest::Client,
}

/// Request body for batch creation
#[derive(Serialize)]
struct CreateBatchRequest<'a> {
    input_file_id: &'a str,
    endpoint: &'a str,
    completion_window: &'a str,
}

/// File object returned by the upload endpoint
#[derive(Deserialize)]
struct FileObject {
    id: String,
}

/// Batch object returned by create/retrieve
#[derive(Deserialize)]
struct BatchObject {
    id: String,
    status: String,
    #[serde(default)]
    output_file_id: Option<String>,
    #[serde(default)]
    error_file_id: Option<String>,
    #[serde(default)]
    errors: Option<Value>,
}

impl From<BatchObject> for BatchJob {
    fn from(obj: BatchObject) -> Self {
        BatchJob {
            id: obj.id,
            status: BatchStatus::parse(&obj.status),
            output_file_id: obj.output_file_id.filter(|s| !s.is_empty()).map(FileId),
            error_file_id: obj.error_file_id.filter(|s| !s.is_empty()).map(FileId),
            inline_errors: obj
                .errors
                .filter(|v| !v.is_null())
                .map(|v| render_inline_errors(&v)),
        }
    }
}

impl OpenAiBatchClient {
    /// Create a client with an explicit API key
    pub fn new(config: &BatchConfig, api_key: impl Into<String>) -> Result<Self, BatchError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| BatchError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        })
    }

    /// Create a client reading the key from `config.api_key_env`
    ///
    /// # Errors
    ///
    /// Returns `MissingCredential` when the variable is unset or blank. No
    /// network call is made.
    pub fn from_env(config: &BatchConfig) -> Result<Self, BatchError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| BatchError::MissingCredential(config.api_key_env.clone()))?;
        Self::new(config, api_key)
    }

    /// Base URL requests are sent to
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, BatchError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        Err(BatchError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn decode_batch(response: reqwest::Response) -> Result<BatchJob, BatchError> {
        let response = Self::check(response).await?;
        let batch = response
            .json::<BatchObject>()
            .await
            .map_err(|e| BatchError::InvalidResponse(format!("Failed to parse batch: {}", e)))?;
        Ok(batch.into())
    }
}

impl BatchService for OpenAiBatchClient {
    type Error = BatchError;

    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<FileId, Self::Error> {
        debug!("Uploading {} ({} bytes)", file_name, bytes.len());

        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("application/jsonl")?;
        let form = Form::new().text("purpose", "batch").part("file", part);

        let response = self
            .client
            .post(self.url("files"))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;
        let file = Self::check(response)
            .await?
            .json::<FileObject>()
            .await
            .map_err(|e| BatchError::InvalidResponse(format!("Failed to parse file: {}", e)))?;

        Ok(FileId(file.id))
    }

    async fn create_job(
        &self,
        input_file: &FileId,
        endpoint: Endpoint,
        completion_window: &str,
    ) -> Result<BatchJob, Self::Error> {
        let body = CreateBatchRequest {
            input_file_id: input_file.as_str(),
            endpoint: endpoint.as_str(),
            completion_window,
        };

        let response = self
            .client
            .post(self.url("batches"))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;
        Self::decode_batch(response).await
    }

    async fn get_status(&self, job_id: &str) -> Result<BatchJob, Self::Error> {
        let response = self
            .client
            .get(self.url(&format!("batches/{}", job_id)))
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        Self::decode_batch(response).await
    }

    async fn get_content(&self, file: &FileId) -> Result<Vec<u8>, Self::Error> {
        let response = self
            .client
            .get(self.url(&format!("files/{}/content", file)))
            .bearer_auth(&self.api_key)
            .send()
            .await?;
        let bytes = Self::check(response).await?.bytes().await?;
        Ok(bytes.to_vec())
    }
}
