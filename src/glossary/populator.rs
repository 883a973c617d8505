/*!
 * Glossary population.
 *
 * Runs the term extractor over text blocks and stores every pair whose
 * source text is not yet in the glossary for the language pair. Extraction
 * failures degrade to "nothing stored"; storage failures are returned to the
 * caller of that block.
 */

use log::{debug, info};
use std::sync::Arc;

use super::extractor::TermExtractor;
use super::store::GlossaryStore;
use crate::database::models::{NewGlossaryEntry, Provenance};
use crate::errors::StorageError;
use crate::translation::concurrency::ConcurrencyGate;

/// What a population pass did for one text block
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PopulationReport {
    /// Pairs returned by the extractor
    pub extracted: usize,
    /// New rows written
    pub inserted: usize,
    /// Pairs already present (including lost insert races)
    pub skipped: usize,
}

impl PopulationReport {
    /// Sum two reports
    pub fn merge(self, other: PopulationReport) -> PopulationReport {
        PopulationReport {
            extracted: self.extracted + other.extracted,
            inserted: self.inserted + other.inserted,
            skipped: self.skipped + other.skipped,
        }
    }
}

/// Extract-then-store orchestration
#[derive(Clone)]
pub struct GlossaryPopulator {
    extractor: TermExtractor,
    store: Arc<dyn GlossaryStore>,
    gate: ConcurrencyGate,
}

impl GlossaryPopulator {
    pub fn new(extractor: TermExtractor, store: Arc<dyn GlossaryStore>, gate: ConcurrencyGate) -> Self {
        Self { extractor, store, gate }
    }

    /// Populate the glossary from one text block
    pub async fn populate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<PopulationReport, StorageError> {
        let terms = self.extractor.extract(text, target_language).await;
        let mut report = PopulationReport {
            extracted: terms.len(),
            ..Default::default()
        };

        for term in terms {
            if self.store.exists(&term.source_text, source_language, target_language).await? {
                report.skipped += 1;
                continue;
            }

            let entry = NewGlossaryEntry::new(
                term.source_text,
                source_language,
                term.target_text,
                target_language,
                Provenance::System,
            );

            // A concurrent writer may have stored the same key since the check
            if self.store.insert(entry).await? {
                report.inserted += 1;
            } else {
                report.skipped += 1;
            }
        }

        debug!(
            "Population: {} extracted, {} inserted, {} already known",
            report.extracted, report.inserted, report.skipped
        );
        Ok(report)
    }

    /// Populate from many blocks concurrently under the shared gate.
    ///
    /// Results are returned per block, in input order.
    pub async fn populate_many(
        &self,
        texts: &[String],
        source_language: &str,
        target_language: &str,
    ) -> Vec<Result<PopulationReport, StorageError>> {
        let total = texts.len();

        self.gate
            .map_ordered(texts, |index, text| async move {
                info!("Extracting terms {}/{}", index + 1, total);
                self.populate(text, source_language, target_language).await
            })
            .await
    }
}
