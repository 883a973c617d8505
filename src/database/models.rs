/*!
 * Database entity models and DTOs.
 *
 * These structures map directly to the glossary table and provide
 * type-safe access to persisted terms.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a glossary entry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Extracted automatically by the LLM
    System,
    /// Supplied by the user through an import
    User,
}

impl Provenance {
    /// Tag stored in the `provenance` column
    pub fn as_tag(&self) -> &'static str {
        match self {
            Provenance::System => "sys",
            Provenance::User => "usr",
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provenance::System => write!(f, "system"),
            Provenance::User => write!(f, "user"),
        }
    }
}

impl std::str::FromStr for Provenance {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sys" | "system" => Ok(Provenance::System),
            "usr" | "user" => Ok(Provenance::User),
            _ => Err(anyhow::anyhow!("Invalid provenance: {}", s)),
        }
    }
}

/// A full row of the glossary table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlossaryRecord {
    /// Row id
    pub id: i64,
    /// Term in the source language
    pub source_text: String,
    /// Source language name
    pub source_lang: String,
    /// Term in the target language
    pub target_text: String,
    /// Target language name
    pub target_lang: String,
    /// Origin of the entry
    pub provenance: Provenance,
    /// How many translation prompts referenced this entry
    pub usage_count: i64,
    /// Creation timestamp
    pub created_at: String,
}

/// Data needed to insert a new entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGlossaryEntry {
    pub source_text: String,
    pub source_lang: String,
    pub target_text: String,
    pub target_lang: String,
    pub provenance: Provenance,
}

impl NewGlossaryEntry {
    /// Create a new entry
    pub fn new(
        source_text: impl Into<String>,
        source_lang: impl Into<String>,
        target_text: impl Into<String>,
        target_lang: impl Into<String>,
        provenance: Provenance,
    ) -> Self {
        Self {
            source_text: source_text.into(),
            source_lang: source_lang.into(),
            target_text: target_text.into(),
            target_lang: target_lang.into(),
            provenance,
        }
    }

    /// Whether both sides carry text after trimming
    pub fn is_complete(&self) -> bool {
        !self.source_text.trim().is_empty() && !self.target_text.trim().is_empty()
    }
}

/// A glossary entry whose source text occurs inside a searched text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainedTerm {
    pub source_text: String,
    pub target_text: String,
    pub provenance: Provenance,
}

/// A fuzzy search hit
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarTerm {
    pub source_text: String,
    pub target_text: String,
    pub provenance: Provenance,
    /// Similarity in [0, 1]
    pub score: f64,
}

/// Aggregate numbers about the glossary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlossaryStats {
    /// Entries created by extraction
    pub system_entries: i64,
    /// Entries imported by the user
    pub user_entries: i64,
    /// Sum of all usage counts
    pub total_usage: i64,
}

impl GlossaryStats {
    pub fn total_entries(&self) -> i64 {
        self.system_entries + self.user_entries
    }
}

impl fmt::Display for GlossaryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Entries: {} (system: {}, user: {}), Total usage: {}",
            self.total_entries(),
            self.system_entries,
            self.user_entries,
            self.total_usage
        )
    }
}
