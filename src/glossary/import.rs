/*!
 * JSON import and export of glossaries.
 *
 * The file format is an array of `{source_text, target_text}` objects.
 * Exports add `provenance` and `usage_count`; imports ignore both and store
 * every new pair as a user entry, so an export can be re-imported elsewhere.
 */

use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::database::models::{NewGlossaryEntry, Provenance};
use crate::database::GlossaryRepository;

/// One record of a glossary file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlossaryFileEntry {
    pub source_text: String,
    pub target_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provenance: Option<Provenance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_count: Option<i64>,
}

/// Outcome of an import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Records read from the file
    pub read: usize,
    /// Records stored as new user entries
    pub inserted: usize,
    /// Records skipped (already present or blank)
    pub skipped: usize,
}

/// Parse a glossary file's content
pub fn parse_glossary(content: &str) -> Result<Vec<GlossaryFileEntry>> {
    serde_json::from_str(content).context("Glossary file must be a JSON array of {source_text, target_text} objects")
}

/// Import a JSON glossary file as user entries for a language pair.
///
/// Existing keys are left untouched.
pub async fn import_file(
    repo: &GlossaryRepository,
    path: &Path,
    source_language: &str,
    target_language: &str,
) -> Result<ImportSummary> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read glossary file: {}", path.display()))?;
    let records = parse_glossary(&content)?;

    let entries: Vec<NewGlossaryEntry> = records
        .iter()
        .map(|r| {
            NewGlossaryEntry::new(
                r.source_text.trim(),
                source_language,
                r.target_text.trim(),
                target_language,
                Provenance::User,
            )
        })
        .collect();

    let read = entries.len();
    let inserted = repo.import_entries(entries).await?;
    let summary = ImportSummary {
        read,
        inserted,
        skipped: read - inserted,
    };

    info!(
        "Imported {} of {} glossary entries from {} ({} skipped)",
        summary.inserted,
        summary.read,
        path.display(),
        summary.skipped
    );
    Ok(summary)
}

/// Export every entry of a language pair to a JSON file; returns the entry count
pub async fn export_file(
    repo: &GlossaryRepository,
    path: &Path,
    source_language: &str,
    target_language: &str,
) -> Result<usize> {
    let records: Vec<GlossaryFileEntry> = repo
        .list_entries(source_language, target_language)
        .await?
        .into_iter()
        .map(|r| GlossaryFileEntry {
            source_text: r.source_text,
            target_text: r.target_text,
            provenance: Some(r.provenance),
            usage_count: Some(r.usage_count),
        })
        .collect();

    let json = serde_json::to_string_pretty(&records).context("Failed to serialize glossary")?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("Failed to write glossary file: {}", path.display()))?;

    info!("Exported {} glossary entries to {}", records.len(), path.display());
    Ok(records.len())
}
