/*!
 * # Glossator - glossary-driven document translation with LLMs
 *
 * A Rust library that keeps a per-language-pair term glossary and uses it to
 * constrain LLM translations of documents.
 *
 * ## Features
 *
 * - Extract domain terms from text with a schema-validated LLM call
 * - Persist them in a SQLite glossary alongside user-supplied terms
 * - Translate batches concurrently under one shared bound, with retry,
 *   exponential backoff and per-unit fallback to the original text
 * - Embed every glossary term found in a text as a prompt reference
 * - Highlight user terms in translation-only and contrast outputs
 * - Providers:
 *   - OpenAI-compatible chat completions (OpenRouter, OpenAI, LM Studio)
 *   - Ollama (local LLM)
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `database`: SQLite connection, schema and glossary repository
 * - `glossary`: Glossary store trait, term extraction, population, matching,
 *   similarity search and JSON import/export
 * - `translation`: Translation engine and its support:
 *   - `translation::engine`: Batch translation with glossary references
 *   - `translation::concurrency`: Shared bound on in-flight LLM work
 *   - `translation::retry`: Retry with exponential backoff
 *   - `translation::highlight`: Longest-match-first term highlighting
 * - `document`: Plain-text documents, translation units and output writers
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: Supported language names
 * - `providers`: Client implementations for LLM providers
 * - `errors`: Custom error types for the application
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod database;
pub mod document;
pub mod errors;
pub mod file_utils;
pub mod glossary;
pub mod language_utils;
pub mod providers;
pub mod translation;

// Re-export main types for easier usage
pub use app_config::Config;
pub use database::GlossaryRepository;
pub use errors::{AppError, ConfigError, ProviderError, SchemaError, StorageError, TranslationError};
pub use glossary::store::GlossaryStore;
pub use translation::{TranslationEngine, TranslationOutcome, UnitStatus};
