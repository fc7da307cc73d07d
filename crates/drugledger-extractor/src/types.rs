//! Request record types written to the request file

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One conversation turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// `system` or `user`
    pub role: String,

    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// System-role message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    /// User-role message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// One line of the request file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchRequestRecord {
    /// `case-<case_id>`
    pub custom_id: String,

    /// HTTP method, always `POST`
    pub method: String,

    /// Endpoint path
    pub url: String,

    /// Endpoint-specific request body
    pub body: RequestBody,
}

/// Request body, shaped for the target endpoint
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RequestBody {
    /// Body for `/v1/responses`
    Responses {
        /// Model identifier
        model: String,
        /// Conversation
        input: Vec<ChatMessage>,
        /// Structured output settings
        text: TextOptions,
        /// Sampling temperature
        temperature: f64,
    },

    /// Body for `/v1/chat/completions`
    ChatCompletions {
        /// Model identifier
        model: String,
        /// Conversation
        messages: Vec<ChatMessage>,
        /// Structured output settings
        response_format: Value,
        /// Sampling temperature
        temperature: f64,
    },
}

impl RequestBody {
    /// Conversation carried by the body
    pub fn messages(&self) -> &[ChatMessage] {
        match self {
            RequestBody::Responses { input, .. } => input,
            RequestBody::ChatCompletions { messages, .. } => messages,
        }
    }
}

/// `text` block of a responses-endpoint body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextOptions {
    /// Output format (the extraction schema)
    pub format: Value,
}
