/*!
 * Term extraction.
 *
 * Asks the LLM for the noun-level terms of a text block together with their
 * translations, using a strict JSON schema. Output that is not exactly an
 * array of `{source_text, target_text}` objects is a schema error and is
 * retried like a transport failure. When every attempt fails the extractor
 * returns an empty list: a block without glossary updates, never an abort.
 */

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

use crate::errors::{LlmCallError, SchemaError};
use crate::providers::{CompletionRequest, Provider, ResponseSchema};
use crate::translation::prompts::term_extraction_prompt;
use crate::translation::retry::RetryPolicy;

/// One candidate glossary pair returned by the LLM
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtractedTerm {
    pub source_text: String,
    pub target_text: String,
}

impl ExtractedTerm {
    pub fn new(source_text: impl Into<String>, target_text: impl Into<String>) -> Self {
        Self {
            source_text: source_text.into(),
            target_text: target_text.into(),
        }
    }
}

/// Validate raw structured output against the term schema
pub fn parse_terms(raw: &str) -> Result<Vec<ExtractedTerm>, SchemaError> {
    let value: serde_json::Value =
        serde_json::from_str(raw.trim()).map_err(|e| SchemaError::InvalidJson(e.to_string()))?;

    let terms: Vec<ExtractedTerm> =
        serde_json::from_value(value).map_err(|e| SchemaError::ShapeMismatch(e.to_string()))?;

    // Blank pairs are schema-valid but useless; repeated sources keep the first translation
    let mut seen = HashSet::new();
    Ok(terms
        .into_iter()
        .map(|t| ExtractedTerm::new(t.source_text.trim(), t.target_text.trim()))
        .filter(|t| !t.source_text.is_empty() && !t.target_text.is_empty())
        .filter(|t| seen.insert(t.source_text.clone()))
        .collect())
}

/// LLM-backed term extractor
#[derive(Debug, Clone)]
pub struct TermExtractor {
    provider: Arc<dyn Provider>,
    retry: RetryPolicy,
}

impl TermExtractor {
    /// Create an extractor using the given provider and retry policy
    pub fn new(provider: Arc<dyn Provider>, retry: RetryPolicy) -> Self {
        Self { provider, retry }
    }

    /// Extract candidate terms of `text`, translated into `target_language`.
    ///
    /// Returns an empty list for blank text and when all attempts fail.
    pub async fn extract(&self, text: &str, target_language: &str) -> Vec<ExtractedTerm> {
        if text.trim().is_empty() {
            return Vec::new();
        }

        let request = CompletionRequest::new(term_extraction_prompt(target_language), text)
            .with_schema(ResponseSchema::term_extraction());

        let result = self
            .retry
            .run("term extraction", |_| {
                let request = request.clone();
                async move {
                    let raw = self.provider.complete(request).await?;
                    let terms = parse_terms(&raw)?;
                    Ok::<_, LlmCallError>(terms)
                }
            })
            .await;

        match result {
            Ok(terms) => {
                debug!("Extracted {} terms from {} chars", terms.len(), text.chars().count());
                terms
            }
            // Already logged by the retry helper
            Err(_) => Vec::new(),
        }
    }
}
