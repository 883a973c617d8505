/*!
 * Repository layer for glossary persistence.
 *
 * This module provides the SQLite-backed implementation of the glossary store,
 * abstracting away the SQL details and providing type-safe access.
 */

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeSet;

use super::connection::DatabaseConnection;
use super::models::{ContainedTerm, GlossaryRecord, GlossaryStats, NewGlossaryEntry, Provenance, SimilarTerm};
use crate::errors::StorageError;
use crate::glossary::fuzzy;
use crate::glossary::store::{GlossaryStore, MAX_SIMILAR_RESULTS};

/// Repository for glossary operations
#[derive(Clone, Debug)]
pub struct GlossaryRepository {
    /// Database connection
    db: DatabaseConnection,
}

impl GlossaryRepository {
    /// Create a new repository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a repository with the default database location
    pub fn new_default() -> Result<Self> {
        let db = DatabaseConnection::new_default()?;
        Ok(Self::new(db))
    }

    /// Create a repository with an in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        let db = DatabaseConnection::new_in_memory()?;
        Ok(Self::new(db))
    }

    /// Underlying connection
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    fn exists_sync(conn: &Connection, source_text: &str, source_lang: &str, target_lang: &str) -> Result<bool> {
        let found = conn
            .query_row(
                "SELECT 1 FROM glossary WHERE source_text = ?1 AND source_lang = ?2 AND target_lang = ?3",
                params![source_text, source_lang, target_lang],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Insert one entry, ignoring key conflicts; returns whether a row was written
    fn insert_sync(conn: &Connection, entry: &NewGlossaryEntry) -> Result<bool> {
        let changed = conn
            .execute(
                r#"
                INSERT INTO glossary (source_text, source_lang, target_text, target_lang, provenance, usage_count, created_at)
                VALUES (?1, ?2, ?3, ?4, ?5, 0, datetime('now'))
                ON CONFLICT(source_text, source_lang, target_lang) DO NOTHING
                "#,
                params![
                    entry.source_text,
                    entry.source_lang,
                    entry.target_text,
                    entry.target_lang,
                    entry.provenance.as_tag(),
                ],
            )
            .with_context(|| format!("Failed to insert glossary term '{}'", entry.source_text))?;
        Ok(changed > 0)
    }

    fn parse_record(row: &rusqlite::Row) -> rusqlite::Result<GlossaryRecord> {
        Ok(GlossaryRecord {
            id: row.get(0)?,
            source_text: row.get(1)?,
            source_lang: row.get(2)?,
            target_text: row.get(3)?,
            target_lang: row.get(4)?,
            provenance: row.get::<_, String>(5)?.parse().unwrap_or(Provenance::System),
            usage_count: row.get(6)?,
            created_at: row.get(7)?,
        })
    }

    /// Look up a single entry
    pub async fn get_entry(
        &self,
        source_text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<Option<GlossaryRecord>> {
        let (source_text, source_lang, target_lang) =
            (source_text.to_string(), source_lang.to_string(), target_lang.to_string());

        self.db
            .execute_async(move |conn| {
                let record = conn
                    .query_row(
                        r#"
                        SELECT id, source_text, source_lang, target_text, target_lang, provenance, usage_count, created_at
                        FROM glossary WHERE source_text = ?1 AND source_lang = ?2 AND target_lang = ?3
                        "#,
                        params![source_text, source_lang, target_lang],
                        Self::parse_record,
                    )
                    .optional()?;
                Ok(record)
            })
            .await
    }

    /// All entries for a language pair, oldest first
    pub async fn list_entries(&self, source_lang: &str, target_lang: &str) -> Result<Vec<GlossaryRecord>> {
        let (source_lang, target_lang) = (source_lang.to_string(), target_lang.to_string());

        self.db
            .execute_async(move |conn| {
                let mut stmt = conn.prepare(
                    r#"
                    SELECT id, source_text, source_lang, target_text, target_lang, provenance, usage_count, created_at
                    FROM glossary WHERE source_lang = ?1 AND target_lang = ?2
                    ORDER BY id
                    "#,
                )?;

                let records = stmt
                    .query_map(params![source_lang, target_lang], Self::parse_record)?
                    .collect::<std::result::Result<Vec<_>, _>>()?;

                Ok(records)
            })
            .await
    }

    /// Insert many entries in one transaction; returns how many were new
    pub async fn import_entries(&self, entries: Vec<NewGlossaryEntry>) -> Result<usize> {
        self.db
            .transaction_async(move |tx| {
                let mut inserted = 0;
                for entry in entries.iter().filter(|e| e.is_complete()) {
                    if Self::insert_sync(tx, entry)? {
                        inserted += 1;
                    }
                }
                Ok(inserted)
            })
            .await
    }

    /// Entry counts per provenance and total usage
    pub async fn stats(&self) -> Result<GlossaryStats> {
        self.db
            .execute_async(|conn| {
                let mut stats = GlossaryStats::default();

                let mut stmt = conn.prepare(
                    "SELECT provenance, COUNT(*), COALESCE(SUM(usage_count), 0) FROM glossary GROUP BY provenance",
                )?;
                let rows = stmt.query_map([], |row| {
                    Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?, row.get::<_, i64>(2)?))
                })?;

                for row in rows {
                    let (tag, count, usage) = row?;
                    match tag.parse().unwrap_or(Provenance::System) {
                        Provenance::System => stats.system_entries += count,
                        Provenance::User => stats.user_entries += count,
                    }
                    stats.total_usage += usage;
                }

                Ok(stats)
            })
            .await
    }
}

#[async_trait]
impl GlossaryStore for GlossaryRepository {
    async fn exists(&self, source_text: &str, source_lang: &str, target_lang: &str) -> Result<bool, StorageError> {
        let (source_text, source_lang, target_lang) =
            (source_text.to_string(), source_lang.to_string(), target_lang.to_string());

        Ok(self
            .db
            .execute_async(move |conn| Self::exists_sync(conn, &source_text, &source_lang, &target_lang))
            .await?)
    }

    async fn insert(&self, entry: NewGlossaryEntry) -> Result<bool, StorageError> {
        if !entry.is_complete() {
            return Err(StorageError::InvalidEntry(format!(
                "empty source or target text ({:?} -> {:?})",
                entry.source_text, entry.target_text
            )));
        }

        let inserted = self
            .db
            .execute_async(move |conn| {
                let inserted = Self::insert_sync(conn, &entry)?;
                if inserted {
                    debug!(
                        "Glossary insert ({}): '{}' -> '{}'",
                        entry.provenance, entry.source_text, entry.target_text
                    );
                } else {
                    debug!("Glossary term '{}' already present, insert skipped", entry.source_text);
                }
                Ok(inserted)
            })
            .await?;

        Ok(inserted)
    }

    async fn find_contained(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<Vec<ContainedTerm>, StorageError> {
        let (text, source_lang, target_lang) = (text.to_string(), source_lang.to_string(), target_lang.to_string());

        Ok(self
            .db
            .execute_async(move |conn| {
                // instr() is a case-sensitive, byte-exact substring test
                let mut stmt = conn.prepare(
                    r#"
                    SELECT source_text, target_text, provenance
                    FROM glossary
                    WHERE source_lang = ?1 AND target_lang = ?2
                      AND length(source_text) > 0 AND instr(?3, source_text) > 0
                    ORDER BY length(source_text) DESC, source_text
                    "#,
                )?;

                let terms = stmt
                    .query_map(params![source_lang, target_lang, text], |row| {
                        Ok(ContainedTerm {
                            source_text: row.get(0)?,
                            target_text: row.get(1)?,
                            provenance: row.get::<_, String>(2)?.parse().unwrap_or(Provenance::System),
                        })
                    })?
                    .collect::<std::result::Result<Vec<_>, _>>()?;

                Ok(terms)
            })
            .await?)
    }

    async fn find_similar(
        &self,
        term: &str,
        source_lang: &str,
        target_lang: &str,
        threshold: f64,
    ) -> Result<Vec<SimilarTerm>, StorageError> {
        let candidates = self.list_entries(source_lang, target_lang).await?;

        let mut hits: Vec<SimilarTerm> = candidates
            .into_iter()
            .filter_map(|record| {
                fuzzy::is_similar(&record.source_text, term, threshold).map(|score| SimilarTerm {
                    source_text: record.source_text,
                    target_text: record.target_text,
                    provenance: record.provenance,
                    score,
                })
            })
            .collect();

        hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.source_text.cmp(&b.source_text))
        });
        hits.truncate(MAX_SIMILAR_RESULTS);

        Ok(hits)
    }

    async fn increment_usage(
        &self,
        terms: &[String],
        source_lang: &str,
        target_lang: &str,
    ) -> Result<usize, StorageError> {
        // Each distinct term counts once per call
        let unique: BTreeSet<String> = terms.iter().cloned().collect();
        if unique.is_empty() {
            return Ok(0);
        }
        let (source_lang, target_lang) = (source_lang.to_string(), target_lang.to_string());

        Ok(self
            .db
            .transaction_async(move |tx| {
                let mut stmt = tx.prepare(
                    "UPDATE glossary SET usage_count = usage_count + 1
                     WHERE source_text = ?1 AND source_lang = ?2 AND target_lang = ?3",
                )?;
                for term in &unique {
                    stmt.execute(params![term, source_lang, target_lang])?;
                }
                Ok(unique.len())
            })
            .await?)
    }
}
