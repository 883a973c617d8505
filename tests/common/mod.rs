/*!
 * Common test utilities for the glossator test suite
 */

use anyhow::Result;
use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

use glossator::app_config::{Config, TranslationProvider};
use glossator::database::models::{ContainedTerm, NewGlossaryEntry, Provenance, SimilarTerm};
use glossator::errors::StorageError;
use glossator::glossary::store::GlossaryStore;
use glossator::providers::mock::MockProvider;
use glossator::translation::{ConcurrencyGate, RetryPolicy, TranslationEngine};
use glossator::GlossaryRepository;

pub const SOURCE: &str = "english";
pub const TARGET: &str = "chinese";

/// Route `log` output through the test harness; safe to call from every test
pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// In-memory repository holding the given english -> chinese entries
pub async fn seeded_repository(entries: &[(&str, &str, Provenance)]) -> GlossaryRepository {
    let repo = GlossaryRepository::new_in_memory().unwrap();
    for (source, target, provenance) in entries {
        repo.insert(NewGlossaryEntry::new(*source, SOURCE, *target, TARGET, *provenance))
            .await
            .unwrap();
    }
    repo
}

/// Retry policy with millisecond backoff so tests run on the real clock
pub fn fast_retry() -> RetryPolicy {
    RetryPolicy::new(3, Duration::from_millis(1))
}

/// Engine over a mock provider and any store, with term extraction off
pub fn engine_with(provider: &MockProvider, store: Arc<dyn GlossaryStore>, capacity: usize) -> TranslationEngine {
    TranslationEngine::new(
        Arc::new(provider.clone()),
        store,
        ConcurrencyGate::new(capacity),
        fast_retry(),
    )
    .with_term_extraction(false)
}

/// Config that passes validation without network access or credentials
pub fn test_config(database_path: Option<PathBuf>) -> Config {
    let mut config = Config::default();
    config.provider.provider_type = TranslationProvider::Ollama;
    config.translation.retry_backoff_ms = 1;
    config.translation.max_concurrent_requests = 4;
    config.glossary.database_path = database_path;
    config
}

/// Store whose usage-count updates always fail; everything else is delegated
#[derive(Clone)]
pub struct UsageFailingStore {
    inner: GlossaryRepository,
}

impl UsageFailingStore {
    pub fn new(inner: GlossaryRepository) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl GlossaryStore for UsageFailingStore {
    async fn exists(&self, source_text: &str, source_lang: &str, target_lang: &str) -> Result<bool, StorageError> {
        self.inner.exists(source_text, source_lang, target_lang).await
    }

    async fn insert(&self, entry: NewGlossaryEntry) -> Result<bool, StorageError> {
        self.inner.insert(entry).await
    }

    async fn find_contained(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<Vec<ContainedTerm>, StorageError> {
        self.inner.find_contained(text, source_lang, target_lang).await
    }

    async fn find_similar(
        &self,
        term: &str,
        source_lang: &str,
        target_lang: &str,
        threshold: f64,
    ) -> Result<Vec<SimilarTerm>, StorageError> {
        self.inner.find_similar(term, source_lang, target_lang, threshold).await
    }

    async fn increment_usage(
        &self,
        _terms: &[String],
        _source_lang: &str,
        _target_lang: &str,
    ) -> Result<usize, StorageError> {
        Err(StorageError::Database("database is locked".to_string()))
    }
}
