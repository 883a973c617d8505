/*!
 * Highlight span computation.
 *
 * Splits a text into contiguous spans marking where glossary terms occur.
 * Matching is case-insensitive. Terms are tried longest first, so a term
 * that contains another one wins ("data platform" before "data").
 * Offsets are byte offsets into the original text.
 */

use log::warn;
use regex::Regex;
use std::sync::Arc;

use super::resources::ResourceCache;

/// One contiguous piece of a text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightSpan {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
    /// Whether the piece is a term occurrence
    pub highlighted: bool,
}

impl HighlightSpan {
    pub fn new(start: usize, end: usize, highlighted: bool) -> Self {
        Self { start, end, highlighted }
    }

    /// The slice of `text` this span covers
    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }
}

/// Compiled alternation patterns, keyed by pattern source
pub type PatternCache = ResourceCache<String, Regex>;

/// Computes highlight spans, caching compiled patterns
#[derive(Debug, Clone)]
pub struct Highlighter {
    patterns: Arc<PatternCache>,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter {
    /// Create a highlighter with its own pattern cache
    pub fn new() -> Self {
        Self::with_cache(Arc::new(PatternCache::new()))
    }

    /// Create a highlighter sharing an existing pattern cache
    pub fn with_cache(patterns: Arc<PatternCache>) -> Self {
        Self { patterns }
    }

    /// Pattern source for a term list, or `None` when no usable term remains
    ///
    /// Lowercase forms only order and deduplicate the terms; the alternation
    /// holds the trimmed originals and `(?i)` does the case folding.
    pub fn pattern_for<S: AsRef<str>>(terms: &[S]) -> Option<String> {
        let mut keyed: Vec<(String, &str)> = terms
            .iter()
            .map(|t| t.as_ref().trim())
            .filter(|t| !t.is_empty())
            .map(|t| (t.to_lowercase(), t))
            .collect();

        keyed.sort_by(|(a, a_orig), (b, b_orig)| {
            b.chars()
                .count()
                .cmp(&a.chars().count())
                .then_with(|| a.cmp(b))
                .then_with(|| a_orig.cmp(b_orig))
        });
        keyed.dedup_by(|(a, _), (b, _)| a == b);

        if keyed.is_empty() {
            return None;
        }

        let alternation = keyed
            .iter()
            .map(|(_, t)| regex::escape(t))
            .collect::<Vec<_>>()
            .join("|");
        Some(format!("(?i)(?:{})", alternation))
    }

    /// Split `text` into spans covering `[0, text.len())` exactly once
    pub fn highlight<S: AsRef<str>>(&self, text: &str, terms: &[S]) -> Vec<HighlightSpan> {
        if text.is_empty() {
            return Vec::new();
        }
        let whole = vec![HighlightSpan::new(0, text.len(), false)];

        let Some(pattern) = Self::pattern_for(terms) else {
            return whole;
        };

        let regex = match self.patterns.get_or_try_init(&pattern, || Regex::new(&pattern)) {
            Ok(regex) => regex,
            Err(e) => {
                warn!("Highlight pattern failed to compile, leaving text plain: {}", e);
                return whole;
            }
        };

        let mut spans = Vec::new();
        let mut cursor = 0;
        for found in regex.find_iter(text) {
            if found.start() == found.end() {
                continue;
            }
            if found.start() > cursor {
                spans.push(HighlightSpan::new(cursor, found.start(), false));
            }
            spans.push(HighlightSpan::new(found.start(), found.end(), true));
            cursor = found.end();
        }
        if cursor < text.len() {
            spans.push(HighlightSpan::new(cursor, text.len(), false));
        }

        spans
    }
}

/// Wrap every highlighted span of `text` in the given markers
pub fn apply_markers(text: &str, spans: &[HighlightSpan], open: &str, close: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for span in spans {
        if span.highlighted {
            out.push_str(open);
            out.push_str(span.slice(text));
            out.push_str(close);
        } else {
            out.push_str(span.slice(text));
        }
    }
    out
}
