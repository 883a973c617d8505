/*!
 * Prompt engineering for glossary-driven translation.
 *
 * This module provides:
 * - The term extraction system prompt
 * - The translation system prompt with embedded glossary references
 */

pub mod templates;

// Re-export main types
pub use templates::{
    reference_lines, term_extraction_prompt, translation_prompt, PromptTemplate, EMPTY_REFERENCE_MARKER,
};
