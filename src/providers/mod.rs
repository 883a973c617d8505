/*!
 * Provider implementations for LLM services.
 *
 * This module contains client implementations for the supported LLM backends:
 * - OpenAI-compatible chat completions (OpenRouter, OpenAI, LM Studio)
 * - Ollama: Local LLM server
 * - Mock: scriptable provider for tests
 */

use async_trait::async_trait;
use serde_json::{json, Value};
use std::fmt::Debug;

use crate::errors::ProviderError;

/// JSON schema a structured completion must conform to
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseSchema {
    /// Schema name sent to the provider
    pub name: String,
    /// The JSON schema document
    pub schema: Value,
}

impl ResponseSchema {
    /// Create a schema with the given name
    pub fn new(name: impl Into<String>, schema: Value) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }

    /// Array of `{source_text, target_text}` objects produced by term extraction
    pub fn term_extraction() -> Self {
        Self::new(
            "term_extraction",
            json!({
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "source_text": { "type": "string" },
                        "target_text": { "type": "string" }
                    },
                    "required": ["source_text", "target_text"],
                    "additionalProperties": false
                }
            }),
        )
    }
}

/// A single provider-agnostic completion request
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// System prompt
    pub system_prompt: String,
    /// User message (the text to work on)
    pub user_text: String,
    /// Optional structured output schema
    pub response_schema: Option<ResponseSchema>,
    /// Optional sampling temperature
    pub temperature: Option<f32>,
}

impl CompletionRequest {
    /// Create a new request
    pub fn new(system_prompt: impl Into<String>, user_text: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_text: user_text.into(),
            response_schema: None,
            temperature: None,
        }
    }

    /// Require structured output matching a schema
    pub fn with_schema(mut self, schema: ResponseSchema) -> Self {
        self.response_schema = Some(schema);
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Common trait for all LLM providers
///
/// This trait defines the interface that all provider implementations must follow,
/// allowing them to be used interchangeably by the extractor and the translation engine.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Complete a request and return the raw message text
    ///
    /// # Arguments
    /// * `request` - The request to complete
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The raw text from the provider or a transport error
    async fn complete(&self, request: CompletionRequest) -> Result<String, ProviderError>;

    /// Test the connection to the provider
    ///
    /// # Returns
    /// * `Result<(), ProviderError>` - Ok if the connection is successful, or an error
    async fn test_connection(&self) -> Result<(), ProviderError>;
}

/// Map an HTTP error status to the matching provider error
pub(crate) fn error_for_status(status: reqwest::StatusCode, body: String) -> ProviderError {
    match status.as_u16() {
        401 | 403 => ProviderError::AuthenticationError(body),
        429 => ProviderError::RateLimitExceeded(body),
        code => ProviderError::ApiError {
            status_code: code,
            message: body,
        },
    }
}

/// Map a reqwest failure to a provider error
pub(crate) fn error_for_request(error: reqwest::Error) -> ProviderError {
    if error.is_connect() || error.is_timeout() {
        ProviderError::ConnectionError(error.to_string())
    } else {
        ProviderError::RequestFailed(error.to_string())
    }
}

pub mod mock;
pub mod ollama;
pub mod openai;
