use anyhow::{anyhow, Context, Result};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::{Config, TranslationProvider};
use crate::database::models::{GlossaryStats, SimilarTerm};
use crate::database::{DatabaseConnection, GlossaryRepository};
use crate::document::{self, DocumentRenderer, OutputMode};
use crate::file_utils::FileManager;
use crate::glossary::import::{self, ImportSummary};
use crate::glossary::populator::PopulationReport;
use crate::glossary::store::GlossaryStore;
use crate::language_utils;
use crate::providers::ollama::Ollama;
use crate::providers::openai::OpenAI;
use crate::providers::Provider;
use crate::translation::{ConcurrencyGate, Highlighter, RetryPolicy, TranslationEngine, UnitStatus};

// @module: Application controller for document translation and glossary upkeep

/// Where a translated document went and how it fared
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub translation_path: PathBuf,
    pub contrast_path: PathBuf,
    pub units: usize,
    pub fallbacks: usize,
    pub elapsed: Duration,
}

// @struct: Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: LLM client shared by extraction and translation
    provider: Arc<dyn Provider>,

    // @field: Glossary persistence
    repository: GlossaryRepository,

    // @field: Process-wide bound on in-flight LLM work
    gate: ConcurrencyGate,

    // @field: Highlight pattern cache shared by all renders
    highlighter: Highlighter,
}

impl Controller {
    // @creates: Controller with validated config, provider and glossary database
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;

        let provider = Self::create_provider(&config);
        let db = match &config.glossary.database_path {
            Some(path) => DatabaseConnection::new(path)?,
            None => DatabaseConnection::new_default()?,
        };
        info!("Using glossary database at {}", db.path().display());

        Ok(Self::with_parts(config, provider, GlossaryRepository::new(db)))
    }

    // @creates: Controller from prebuilt parts, config not validated
    pub fn with_parts(config: Config, provider: Arc<dyn Provider>, repository: GlossaryRepository) -> Self {
        let gate = ConcurrencyGate::new(config.translation.max_concurrent_requests);
        Self {
            config,
            provider,
            repository,
            gate,
            highlighter: Highlighter::new(),
        }
    }

    // @creates: LLM client for the configured provider
    pub fn create_provider(config: &Config) -> Arc<dyn Provider> {
        let provider_config = &config.provider;
        match provider_config.provider_type {
            TranslationProvider::OpenAI => Arc::new(OpenAI::new(
                provider_config.api_key.clone(),
                provider_config.get_endpoint(),
                provider_config.get_model(),
                provider_config.timeout_secs,
            )),
            TranslationProvider::Ollama => Arc::new(Ollama::new(
                provider_config.get_endpoint(),
                provider_config.get_model(),
                provider_config.timeout_secs,
            )),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn repository(&self) -> &GlossaryRepository {
        &self.repository
    }

    // @returns: Normalized (source, target) codes from config
    fn language_pair(&self) -> Result<(String, String)> {
        Ok(language_utils::validate_pair(
            &self.config.source_language,
            &self.config.target_language,
        )?)
    }

    // @creates: Engine sharing this controller's gate and store
    pub fn engine(&self) -> TranslationEngine {
        let store: Arc<dyn GlossaryStore> = Arc::new(self.repository.clone());
        TranslationEngine::new(
            self.provider.clone(),
            store,
            self.gate.clone(),
            RetryPolicy::from_config(&self.config.translation),
        )
        .with_temperature(self.config.translation.temperature)
        .with_term_extraction(self.config.translation.extract_terms)
    }

    // @checks: Provider reachability
    pub async fn test_connection(&self) -> Result<()> {
        info!(
            "Testing connection to {} ({})",
            self.config.provider.provider_type.display_name(),
            self.config.provider.get_model()
        );
        self.provider
            .test_connection()
            .await
            .context("Provider connection test failed")?;
        info!("Connection OK");
        Ok(())
    }

    // @processes: One document into translation-only and contrast outputs
    // @params: input_file, output_dir, force_overwrite
    pub async fn run(&self, input_file: &Path, output_dir: &Path, force_overwrite: bool) -> Result<Option<RunReport>> {
        let start_time = Instant::now();

        if !FileManager::file_exists(input_file) {
            return Err(anyhow!("Input file not found: {:?}", input_file));
        }

        let translation_path = FileManager::generate_output_path(input_file, output_dir, "translation");
        let contrast_path = FileManager::generate_output_path(input_file, output_dir, "contrast");

        if !force_overwrite && (translation_path.exists() || contrast_path.exists()) {
            warn!(
                "Skipping {:?}, output already exists (use -f to force overwrite)",
                input_file
            );
            return Ok(None);
        }

        let (source_language, target_language) = self.language_pair()?;
        let document = document::read_document(input_file)?;
        let units = document.units();
        let texts: Vec<String> = units.iter().map(|u| u.text.clone()).collect();

        info!(
            "Translating {} units from {} to {}",
            texts.len(),
            language_utils::display_name(&source_language),
            language_utils::display_name(&target_language)
        );

        let multi_progress = MultiProgress::new();
        let progress_bar = multi_progress.add(ProgressBar::new(texts.len() as u64));
        progress_bar.set_style(Self::progress_style());
        progress_bar.set_message("translating");

        let pb = progress_bar.clone();
        let outcomes = self
            .engine()
            .translate_batch_with_progress(&texts, &source_language, &target_language, move |done, _total| {
                pb.set_position(done as u64);
            })
            .await?;
        progress_bar.finish_and_clear();

        let renderer = DocumentRenderer::new(
            self.highlighter.clone(),
            self.config.output.highlight_open.clone(),
            self.config.output.highlight_close.clone(),
        );

        FileManager::ensure_dir(output_dir)?;
        FileManager::write_to_file(
            &translation_path,
            &renderer.render(&document, &units, &outcomes, OutputMode::TranslationOnly),
        )?;
        FileManager::write_to_file(
            &contrast_path,
            &renderer.render(&document, &units, &outcomes, OutputMode::Contrast),
        )?;

        let fallbacks = outcomes.iter().filter(|o| o.status == UnitStatus::Fallback).count();
        if fallbacks > 0 {
            warn!("{} of {} units kept their original text", fallbacks, outcomes.len());
        }

        let elapsed = start_time.elapsed();
        info!(
            "Wrote {:?} and {:?} in {}",
            translation_path,
            contrast_path,
            Self::format_duration(elapsed)
        );

        Ok(Some(RunReport {
            translation_path,
            contrast_path,
            units: units.len(),
            fallbacks,
            elapsed,
        }))
    }

    // @processes: Term extraction only, no translation
    pub async fn extract_glossary(&self, input_file: &Path) -> Result<PopulationReport> {
        let (source_language, target_language) = self.language_pair()?;
        let document = document::read_document(input_file)?;
        let texts: Vec<String> = document.units().into_iter().map(|u| u.text).collect();

        let engine = self.engine();
        let mut report = PopulationReport::default();
        let mut failures = 0;

        for result in engine
            .populator()
            .populate_many(&texts, &source_language, &target_language)
            .await
        {
            match result {
                Ok(r) => report = report.merge(r),
                Err(e) => {
                    failures += 1;
                    warn!("Glossary population failed: {}", e);
                }
            }
        }

        if failures > 0 && failures == texts.len() {
            return Err(anyhow!("Glossary population failed for every block"));
        }

        info!(
            "Extracted {} terms, {} new, {} already known",
            report.extracted, report.inserted, report.skipped
        );
        Ok(report)
    }

    pub async fn import_glossary(&self, path: &Path) -> Result<ImportSummary> {
        let (source_language, target_language) = self.language_pair()?;
        import::import_file(&self.repository, path, &source_language, &target_language).await
    }

    pub async fn export_glossary(&self, path: &Path) -> Result<usize> {
        let (source_language, target_language) = self.language_pair()?;
        import::export_file(&self.repository, path, &source_language, &target_language).await
    }

    // @returns: Entries resembling `term`; threshold defaults to config
    pub async fn similar_terms(&self, term: &str, threshold: Option<f64>) -> Result<Vec<SimilarTerm>> {
        let (source_language, target_language) = self.language_pair()?;
        let threshold = threshold.unwrap_or(self.config.glossary.similarity_threshold as f64);

        Ok(self
            .repository
            .find_similar(term, &source_language, &target_language, threshold)
            .await?)
    }

    pub async fn glossary_stats(&self) -> Result<GlossaryStats> {
        self.repository.stats().await
    }

    fn progress_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} units ({percent}%) {msg} {eta}")
            .or_else(|_| {
                ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}")
            })
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    // @formats: Duration as "1h 2m 3s", "2m 3s" or "3.042s"
    pub fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatDuration_shouldPickLargestUnit() {
        assert_eq!(Controller::format_duration(Duration::from_millis(3042)), "3.042s");
        assert_eq!(Controller::format_duration(Duration::from_secs(123)), "2m 3s");
        assert_eq!(Controller::format_duration(Duration::from_secs(3723)), "1h 2m 3s");
    }
}
