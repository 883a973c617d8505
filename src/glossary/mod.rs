/*!
 * Glossary management.
 *
 * This module contains:
 * - `store`: the glossary store seam implemented by the SQLite repository
 * - `extractor`: LLM term extraction with schema validation and retry
 * - `populator`: extract-then-store over text blocks under the concurrency gate
 * - `matcher`: which glossary entries occur in a text
 * - `fuzzy`: trigram similarity used by `find_similar`
 * - `import`: JSON import/export of user glossaries
 */

pub mod extractor;
pub mod fuzzy;
pub mod import;
pub mod matcher;
pub mod populator;
pub mod store;

// Re-export main types
pub use extractor::{ExtractedTerm, TermExtractor};
pub use matcher::{TermMatches, TextMatcher};
pub use populator::{GlossaryPopulator, PopulationReport};
pub use store::GlossaryStore;
