use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::ConfigError;
use crate::language_utils;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language name (lowercase, e.g. "english")
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language name (lowercase, e.g. "chinese")
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// LLM provider connection settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Translation engine settings
    #[serde(default)]
    pub translation: TranslationCommonConfig,

    /// Glossary store settings
    #[serde(default)]
    pub glossary: GlossaryConfig,

    /// Output rendering settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: OpenAI-compatible chat completions (OpenRouter, OpenAI, LM Studio)
    #[default]
    OpenAI,
    // @provider: Ollama
    Ollama,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::OpenAI => "OpenAI-compatible",
            Self::Ollama => "Ollama",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::OpenAI => "openai".to_string(),
            Self::Ollama => "ollama".to_string(),
        }
    }
}

impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "openai" | "openrouter" => Ok(Self::OpenAI),
            "ollama" => Ok(Self::Ollama),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Provider configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type", default)]
    pub provider_type: TranslationProvider,

    // @field: Model name
    #[serde(default = "String::new")]
    pub model: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl ProviderConfig {
    // @param provider_type: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_type: TranslationProvider) -> Self {
        Self {
            provider_type,
            model: String::new(),
            api_key: String::new(),
            endpoint: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Get the model, falling back to the provider default
    pub fn get_model(&self) -> String {
        if !self.model.is_empty() {
            return self.model.clone();
        }
        match self.provider_type {
            TranslationProvider::OpenAI => default_openai_model(),
            TranslationProvider::Ollama => default_ollama_model(),
        }
    }

    /// Get the endpoint, falling back to the provider default
    pub fn get_endpoint(&self) -> String {
        if !self.endpoint.is_empty() {
            return self.endpoint.clone();
        }
        match self.provider_type {
            TranslationProvider::OpenAI => default_openai_endpoint(),
            TranslationProvider::Ollama => default_ollama_endpoint(),
        }
    }

    /// Whether the endpoint points at a local server that needs no key
    pub fn is_local_endpoint(&self) -> bool {
        let endpoint = self.get_endpoint();
        match url::Url::parse(&endpoint) {
            Ok(url) => matches!(url.host_str(), Some("localhost") | Some("127.0.0.1") | Some("::1") | Some("[::1]")),
            Err(_) => false,
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self::new(TranslationProvider::default())
    }
}

/// Translation settings shared by the extractor and the engine
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationCommonConfig {
    /// Maximum number of in-flight LLM calls across all batches
    #[serde(default = "default_concurrent_requests")]
    pub max_concurrent_requests: usize,

    /// Total attempts per LLM call (first try included)
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Base backoff in milliseconds, doubled on each retry
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Temperature parameter for translation calls
    /// Lower values make output more deterministic
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Run term extraction into the glossary before translating
    #[serde(default = "default_true")]
    pub extract_terms: bool,
}

impl Default for TranslationCommonConfig {
    fn default() -> Self {
        Self {
            max_concurrent_requests: default_concurrent_requests(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            temperature: default_temperature(),
            extract_terms: true,
        }
    }
}

/// Glossary store settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GlossaryConfig {
    /// SQLite database file; the platform data directory is used when unset
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Minimum trigram similarity for fuzzy lookups
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,
}

impl Default for GlossaryConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            similarity_threshold: default_similarity_threshold(),
        }
    }
}

/// Output rendering settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OutputConfig {
    /// Marker written before a highlighted term
    #[serde(default = "default_highlight_marker")]
    pub highlight_open: String,

    /// Marker written after a highlighted term
    #[serde(default = "default_highlight_marker")]
    pub highlight_close: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            highlight_open: default_highlight_marker(),
            highlight_close: default_highlight_marker(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Convert to the `log` crate filter
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_source_language() -> String {
    "english".to_string()
}

fn default_target_language() -> String {
    "chinese".to_string()
}

fn default_concurrent_requests() -> usize {
    100
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    1000 // 1 second base backoff time, doubled on each retry
}

fn default_temperature() -> f32 {
    0.3
}

fn default_similarity_threshold() -> f32 {
    0.8
}

fn default_highlight_marker() -> String {
    "**".to_string()
}

fn default_true() -> bool {
    true
}

fn default_openai_endpoint() -> String {
    "https://openrouter.ai/api/v1".to_string()
}

fn default_ollama_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_openai_model() -> String {
    "google/gemini-2.0-flash-001".to_string()
}

fn default_ollama_model() -> String {
    "qwen2.5:7b".to_string()
}

impl Config {
    /// Load a configuration file, or write the defaults there if it does not exist
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            Ok(config)
        } else {
            log::warn!("Config file not found at {:?}, creating default config.", path);
            let config = Config::default();
            config.save(path)?;
            Ok(config)
        }
    }

    /// Write the configuration as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")?;
        std::fs::write(path, json).with_context(|| format!("Failed to write config file: {:?}", path))?;
        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), ConfigError> {
        language_utils::validate_pair(&self.source_language, &self.target_language)?;

        if self.provider.provider_type == TranslationProvider::OpenAI
            && self.provider.api_key.is_empty()
            && !self.provider.is_local_endpoint()
        {
            return Err(ConfigError::MissingCredentials(
                "an API key is required for the OpenAI-compatible provider".to_string(),
            ));
        }

        if self.translation.max_concurrent_requests == 0 {
            return Err(ConfigError::Invalid("max_concurrent_requests must be at least 1".to_string()));
        }
        if self.translation.retry_count == 0 {
            return Err(ConfigError::Invalid("retry_count must be at least 1".to_string()));
        }
        if !(0.0..=2.0).contains(&self.translation.temperature) {
            return Err(ConfigError::Invalid(format!(
                "temperature {} is outside [0, 2]",
                self.translation.temperature
            )));
        }
        if !(0.0..=1.0).contains(&self.glossary.similarity_threshold) {
            return Err(ConfigError::Invalid(format!(
                "similarity_threshold {} is outside [0, 1]",
                self.glossary.similarity_threshold
            )));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            target_language: default_target_language(),
            provider: ProviderConfig::default(),
            translation: TranslationCommonConfig::default(),
            glossary: GlossaryConfig::default(),
            output: OutputConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
