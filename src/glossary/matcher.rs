/*!
 * Text-to-glossary matching.
 */

use std::collections::BTreeMap;
use std::sync::Arc;

use super::store::GlossaryStore;
use crate::database::models::Provenance;
use crate::errors::StorageError;

/// Glossary entries found in one text, as two maps keyed by source text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TermMatches {
    /// source_text -> target_text
    pub translations: BTreeMap<String, String>,
    /// source_text -> provenance
    pub provenance: BTreeMap<String, Provenance>,
}

impl TermMatches {
    pub fn is_empty(&self) -> bool {
        self.translations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.translations.len()
    }

    /// Matched source texts
    pub fn source_terms(&self) -> Vec<String> {
        self.translations.keys().cloned().collect()
    }

    /// Only the entries supplied by the user
    pub fn user_terms(&self) -> BTreeMap<String, String> {
        self.translations
            .iter()
            .filter(|(source, _)| self.provenance.get(*source) == Some(&Provenance::User))
            .map(|(source, target)| (source.clone(), target.clone()))
            .collect()
    }
}

/// Looks up which glossary entries occur in a text
#[derive(Clone)]
pub struct TextMatcher {
    store: Arc<dyn GlossaryStore>,
}

impl TextMatcher {
    pub fn new(store: Arc<dyn GlossaryStore>) -> Self {
        Self { store }
    }

    /// Every glossary entry whose source text occurs in `text`.
    ///
    /// No match yields two empty maps.
    pub async fn match_text(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<TermMatches, StorageError> {
        let mut matches = TermMatches::default();
        if text.is_empty() {
            return Ok(matches);
        }

        for term in self.store.find_contained(text, source_language, target_language).await? {
            matches.provenance.insert(term.source_text.clone(), term.provenance);
            matches.translations.insert(term.source_text, term.target_text);
        }

        Ok(matches)
    }
}
