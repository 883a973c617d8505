/*!
 * Document input and output.
 *
 * - `model`: translation units, their positions and the plain-text document
 * - `render`: translation-only and contrast writers with term highlighting
 */

pub mod model;
pub mod render;

use anyhow::Result;
use std::path::Path;

use crate::file_utils::FileManager;

// Re-export main types
pub use model::{Block, PlainDocument, TranslationUnit, UnitPosition};
pub use render::{DocumentRenderer, OutputMode};

/// Read and parse a plain-text document
pub fn read_document<P: AsRef<Path>>(path: P) -> Result<PlainDocument> {
    let content = FileManager::read_to_string(path)?;
    Ok(PlainDocument::parse(&content))
}
