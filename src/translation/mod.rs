/*!
 * Glossary-driven translation.
 *
 * This module contains the core translation functionality. It is split into
 * several submodules:
 *
 * - `engine`: batch translation with glossary references, retry and fallback
 * - `concurrency`: the process-wide gate bounding in-flight LLM work
 * - `retry`: bounded retry with exponential backoff
 * - `prompts`: system prompts for extraction and translation
 * - `highlight`: highlight span computation over translated text
 * - `resources`: keyed lazy cache for expensive shared resources
 */

// Re-export main types for easier usage
pub use self::concurrency::ConcurrencyGate;
pub use self::engine::{TranslationEngine, TranslationOutcome, UnitStatus};
pub use self::highlight::{HighlightSpan, Highlighter};
pub use self::retry::RetryPolicy;

// Submodules
pub mod concurrency;
pub mod engine;
pub mod highlight;
pub mod prompts;
pub mod resources;
pub mod retry;
