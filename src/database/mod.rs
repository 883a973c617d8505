/*!
 * Database module for persistent storage of the glossary.
 *
 * This module provides SQLite-based persistence for:
 * - Glossary entries keyed by (source_text, source_lang, target_lang)
 * - Usage counts and provenance of each entry
 */

pub mod connection;
pub mod models;
pub mod repository;
pub mod schema;

// Re-export main types
pub use connection::DatabaseConnection;
pub use repository::GlossaryRepository;
