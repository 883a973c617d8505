/*!
 * Glossary schema.
 *
 * The `glossary` table holds one row per (source_text, source_lang,
 * target_lang). A `schema_version` row records which layout a database file
 * was created with; files from a different layout are refused.
 */

use anyhow::{Context, Result, bail};
use log::{debug, info};
use rusqlite::{Connection, OptionalExtension};

/// Current schema version
pub const SCHEMA_VERSION: i32 = 1;

/// Create the tables on a fresh database, or check the version of an existing one
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    match get_schema_version(conn)? {
        0 => {
            info!("Initializing glossary schema v{}", SCHEMA_VERSION);
            create_all_tables(conn)?;
            set_schema_version(conn, SCHEMA_VERSION)?;
        }
        SCHEMA_VERSION => debug!("Glossary schema is up to date (v{})", SCHEMA_VERSION),
        other => bail!(
            "Unsupported glossary schema version {} (this build uses v{})",
            other,
            SCHEMA_VERSION
        ),
    }

    Ok(())
}

/// Schema version stored in the database, 0 when none is recorded
fn get_schema_version(conn: &Connection) -> Result<i32> {
    let table_exists: bool = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='schema_version'",
            [],
            |row| row.get(0),
        )
        .context("Failed to check schema_version table existence")?;

    if !table_exists {
        return Ok(0);
    }

    let version: Option<i32> = conn
        .query_row("SELECT version FROM schema_version WHERE id = 1", [], |row| row.get(0))
        .optional()
        .context("Failed to read schema version")?;

    Ok(version.unwrap_or(0))
}

/// Set the schema version in the database
fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO schema_version (id, version, updated_at) VALUES (1, ?1, datetime('now'))",
        [version],
    )?;
    Ok(())
}

/// Create all database tables
fn create_all_tables(conn: &Connection) -> Result<()> {
    // WAL keeps readers unblocked while a population pass writes
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            version INTEGER NOT NULL,
            updated_at TEXT NOT NULL
        );
        "#,
    )?;

    // One row per (source_text, source_lang, target_lang); the UNIQUE constraint
    // is the final arbiter for concurrent check-then-insert races.
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS glossary (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            source_text TEXT NOT NULL,
            source_lang TEXT NOT NULL,
            target_text TEXT NOT NULL,
            target_lang TEXT NOT NULL,
            provenance TEXT NOT NULL DEFAULT 'sys',
            usage_count INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            UNIQUE(source_text, source_lang, target_lang)
        );

        CREATE INDEX IF NOT EXISTS idx_glossary_languages ON glossary(source_lang, target_lang);
        CREATE INDEX IF NOT EXISTS idx_glossary_provenance ON glossary(provenance);
        "#,
    )?;

    info!("Glossary schema created successfully");
    Ok(())
}
