/*!
 * Glossary-constrained batch translation.
 *
 * For every text of a batch the engine looks up the glossary terms it
 * contains, bumps their usage counts, builds a prompt that embeds them as
 * `source -> target` references and asks the LLM for a translation. All
 * units run concurrently under the shared gate and come back in input order.
 * A unit whose LLM call keeps failing is returned untranslated with status
 * `Fallback`; per-unit failures never fail the batch.
 */

use log::{debug, info, warn};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::{ProviderError, TranslationError};
use crate::glossary::extractor::TermExtractor;
use crate::glossary::matcher::{TermMatches, TextMatcher};
use crate::glossary::populator::GlossaryPopulator;
use crate::glossary::store::GlossaryStore;
use crate::language_utils;
use crate::providers::{CompletionRequest, Provider};
use crate::translation::concurrency::ConcurrencyGate;
use crate::translation::prompts::translation_prompt;
use crate::translation::retry::RetryPolicy;

/// Default sampling temperature for translations
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

/// How a unit's text was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitStatus {
    /// The LLM returned a translation
    Translated,
    /// Every attempt failed; the text is the original
    Fallback,
    /// The input was blank; nothing was sent
    Empty,
}

/// Result for one input text
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationOutcome {
    /// Translated text, or the original one for `Fallback` and `Empty`
    pub text: String,
    /// Glossary entries found in the source text
    pub matched_terms: TermMatches,
    pub status: UnitStatus,
}

/// Batch translator backed by an LLM provider and the glossary
#[derive(Clone)]
pub struct TranslationEngine {
    provider: Arc<dyn Provider>,
    store: Arc<dyn GlossaryStore>,
    matcher: TextMatcher,
    populator: GlossaryPopulator,
    gate: ConcurrencyGate,
    retry: RetryPolicy,
    temperature: f32,
    extract_terms: bool,
}

impl TranslationEngine {
    /// Create an engine. Term extraction is enabled by default.
    pub fn new(
        provider: Arc<dyn Provider>,
        store: Arc<dyn GlossaryStore>,
        gate: ConcurrencyGate,
        retry: RetryPolicy,
    ) -> Self {
        let extractor = TermExtractor::new(provider.clone(), retry);
        let populator = GlossaryPopulator::new(extractor, store.clone(), gate.clone());

        Self {
            matcher: TextMatcher::new(store.clone()),
            provider,
            store,
            populator,
            gate,
            retry,
            temperature: DEFAULT_TEMPERATURE,
            extract_terms: true,
        }
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Enable or disable glossary population before translating
    pub fn with_term_extraction(mut self, enabled: bool) -> Self {
        self.extract_terms = enabled;
        self
    }

    /// The populator sharing this engine's provider, store and gate
    pub fn populator(&self) -> &GlossaryPopulator {
        &self.populator
    }

    /// Translate a batch, preserving length and order
    pub async fn translate_batch(
        &self,
        texts: &[String],
        source_language: &str,
        target_language: &str,
    ) -> Result<Vec<TranslationOutcome>, TranslationError> {
        self.translate_batch_with_progress(texts, source_language, target_language, |_, _| {})
            .await
    }

    /// Translate a batch, calling `progress(done, total)` as units finish
    pub async fn translate_batch_with_progress<P>(
        &self,
        texts: &[String],
        source_language: &str,
        target_language: &str,
        progress: P,
    ) -> Result<Vec<TranslationOutcome>, TranslationError>
    where
        P: Fn(usize, usize) + Send + Sync,
    {
        let (source_language, target_language) = language_utils::validate_pair(source_language, target_language)?;
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        if self.extract_terms {
            self.populate(texts, &source_language, &target_language).await;
        }

        let total = texts.len();
        let done = AtomicUsize::new(0);
        let (src, tgt) = (source_language.as_str(), target_language.as_str());

        let outcomes = self
            .gate
            .map_ordered(texts, |index, text| {
                let done = &done;
                let progress = &progress;
                async move {
                    let outcome = self.translate_unit(index, text, src, tgt).await;
                    let finished = done.fetch_add(1, Ordering::SeqCst) + 1;
                    debug!("Unit {}/{} finished ({:?})", index + 1, total, outcome.status);
                    progress(finished, total);
                    outcome
                }
            })
            .await;

        let fallbacks = outcomes.iter().filter(|o| o.status == UnitStatus::Fallback).count();
        info!(
            "Translated {} units ({} fell back to the original text)",
            total - fallbacks,
            fallbacks
        );

        Ok(outcomes)
    }

    /// Run glossary population for every text; storage failures are logged only
    async fn populate(&self, texts: &[String], source_language: &str, target_language: &str) {
        let reports = self.populator.populate_many(texts, source_language, target_language).await;

        let mut inserted = 0;
        for (index, report) in reports.into_iter().enumerate() {
            match report {
                Ok(report) => inserted += report.inserted,
                Err(e) => warn!("Glossary population failed for unit {}: {}", index + 1, e),
            }
        }
        info!("Glossary population added {} new terms", inserted);
    }

    async fn translate_unit(
        &self,
        index: usize,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> TranslationOutcome {
        if text.trim().is_empty() {
            return TranslationOutcome {
                text: text.to_string(),
                matched_terms: TermMatches::default(),
                status: UnitStatus::Empty,
            };
        }

        let matched_terms = match self.matcher.match_text(text, source_language, target_language).await {
            Ok(matches) => matches,
            Err(e) => {
                warn!("Glossary lookup failed for unit {}, translating without references: {}", index + 1, e);
                TermMatches::default()
            }
        };

        if !matched_terms.is_empty() {
            if let Err(e) = self
                .store
                .increment_usage(&matched_terms.source_terms(), source_language, target_language)
                .await
            {
                warn!("Failed to increment term usage counts: {}", e);
            }
        }

        let prompt = translation_prompt(source_language, target_language, &matched_terms.translations);
        debug!("Prompt for unit {}: {}", index + 1, prompt);
        let request = CompletionRequest::new(prompt, text).temperature(self.temperature);

        let label = format!("Translation of unit {}", index + 1);
        let result = self
            .retry
            .run(&label, |_| {
                let request = request.clone();
                async move {
                    let raw = self.provider.complete(request).await?;
                    let translated = raw.trim();
                    if translated.is_empty() {
                        return Err(ProviderError::ParseError("empty translation".to_string()));
                    }
                    Ok(translated.to_string())
                }
            })
            .await;

        match result {
            Ok(translated) => TranslationOutcome {
                text: translated,
                matched_terms,
                status: UnitStatus::Translated,
            },
            Err(_) => {
                warn!("Returning original text for unit {}", index + 1);
                TranslationOutcome {
                    text: text.to_string(),
                    matched_terms,
                    status: UnitStatus::Fallback,
                }
            }
        }
    }
}
