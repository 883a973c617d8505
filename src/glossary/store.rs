/*!
 * The glossary store seam.
 *
 * Everything above the database talks to the glossary through this trait, so
 * tests can wrap or replace the SQLite repository.
 */

use async_trait::async_trait;

use crate::database::models::{ContainedTerm, NewGlossaryEntry, SimilarTerm};
use crate::errors::StorageError;

/// Maximum number of results returned by `find_similar`
pub const MAX_SIMILAR_RESULTS: usize = 5;

/// Persistent mapping from (source_text, source_lang, target_lang) to a target term
#[async_trait]
pub trait GlossaryStore: Send + Sync {
    /// Exact lookup on the three-key tuple
    async fn exists(&self, source_text: &str, source_lang: &str, target_lang: &str) -> Result<bool, StorageError>;

    /// Insert an entry. Returns `false` when the key was already present,
    /// including when a concurrent writer won the race.
    async fn insert(&self, entry: NewGlossaryEntry) -> Result<bool, StorageError>;

    /// Every entry whose source text is a (case-sensitive) substring of `text`
    async fn find_contained(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<Vec<ContainedTerm>, StorageError>;

    /// Fuzzy search, best match first, at most `MAX_SIMILAR_RESULTS` entries
    async fn find_similar(
        &self,
        term: &str,
        source_lang: &str,
        target_lang: &str,
        threshold: f64,
    ) -> Result<Vec<SimilarTerm>, StorageError>;

    /// Bump the usage count of each listed term. Unknown terms are skipped.
    /// Returns the number of attempted updates.
    async fn increment_usage(
        &self,
        terms: &[String],
        source_lang: &str,
        target_lang: &str,
    ) -> Result<usize, StorageError>;
}
