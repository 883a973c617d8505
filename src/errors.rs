/*!
 * Error types for the glossator application.
 *
 * This module contains custom error types for the different layers of the
 * translation pipeline, using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when talking to an LLM provider (transport layer)
#[derive(Error, Debug, Clone)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response envelope fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

/// Structured output that does not match the declared schema
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// The response was not valid JSON
    #[error("Response is not valid JSON: {0}")]
    InvalidJson(String),

    /// The JSON did not have the expected shape
    #[error("Response does not match schema: {0}")]
    ShapeMismatch(String),
}

/// Failure of a single LLM call, transport or schema; both are retried the same way
#[derive(Error, Debug, Clone)]
pub enum LlmCallError {
    #[error(transparent)]
    Transport(#[from] ProviderError),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Errors from the glossary persistence layer
#[derive(Error, Debug, Clone)]
pub enum StorageError {
    /// A query or statement failed
    #[error("Database error: {0}")]
    Database(String),

    /// An entry was rejected before reaching the database
    #[error("Invalid glossary entry: {0}")]
    InvalidEntry(String),
}

impl From<anyhow::Error> for StorageError {
    fn from(error: anyhow::Error) -> Self {
        // {:#} keeps the context chain on one line
        Self::Database(format!("{:#}", error))
    }
}

/// Configuration problems, surfaced immediately and never retried
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Unsupported language: '{0}'")]
    UnsupportedLanguage(String),

    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Errors that can escape a batch translation
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error in the request configuration (languages etc.)
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from the glossary store
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Error in the configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
