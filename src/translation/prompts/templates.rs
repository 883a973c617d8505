/*!
 * Prompt templates for term extraction and glossary-constrained translation.
 */

use std::collections::BTreeMap;

/// Reference block used when no glossary term matched a text
pub const EMPTY_REFERENCE_MARKER: &str = "[]";

/// A system prompt with `{placeholder}` slots.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    /// The template string with placeholders
    template: String,
}

impl PromptTemplate {
    /// Instructions for the term extractor.
    pub const TERM_EXTRACTOR: &'static str = r#"You are a terminology extractor. Only extract and translate noun-level terms; never explain.
Segment the text I provide, identify terms, and translate each one into {target_language}.
If the text contains no usable terms, return an empty list.

## Rules
1. Return only term-level nouns: nouns, noun phrases, proper nouns, abbreviations and acronyms (such as "5G", "API", "NLP").
   Exclude verbs, adjectives, adverbs, whole sentences, empty abstractions (such as "issue", "aspect", "situation") and pure numbers.
2. Multi-word terms are allowed; keep the complete collocation (such as "dry-wet separation mechanism", "technical service contract", "data asset management platform").
3. Normalize and deduplicate: unify singular/plural, case and spelling variants into one canonical term.
4. Names of people, places, organizations and products keep their original form unless the industry has an established translation; then use that translation.
5. Domain terms take priority over general words. When a boundary is unclear, include rather than omit.
6. Output only JSON: no extra text, no Markdown, no code fences.

## Example

Input: "We tested the reliability of the toilet leak-proof dry-wet separation mechanism on the 5G network and updated the technical service contract."
Output (target language chinese):
[
  {"source_text": "5G network", "target_text": "5G网络"},
  {"source_text": "toilet leak-proof dry-wet separation mechanism", "target_text": "马桶防漏水干湿分离机构"},
  {"source_text": "technical service contract", "target_text": "技术服务合同"},
  {"source_text": "reliability", "target_text": "可靠性"}
]"#;

    /// Instructions for the translator.
    pub const TRANSLATOR: &'static str = r#"Translate the user's {source_language} text into {target_language}.

Requirements:
- Output exactly one translation, the most accurate and natural one;
- Do not list alternative meanings;
- Do not explain or analyze;
- Keep the output concise, clear and unambiguous;
- Where a reference term below occurs in the text, translate it exactly as given.

Reference terms (source -> target):
{references}

Output only the translation."#;

    /// Create a new prompt template.
    pub fn new(template: &str) -> Self {
        Self {
            template: template.to_string(),
        }
    }

    /// Template for term extraction.
    pub fn term_extractor() -> Self {
        Self::new(Self::TERM_EXTRACTOR)
    }

    /// Template for translation.
    pub fn translator() -> Self {
        Self::new(Self::TRANSLATOR)
    }

    /// Render the template with the given variables.
    pub fn render(&self, source_language: &str, target_language: &str, references: &str) -> String {
        self.template
            .replace("{source_language}", source_language)
            .replace("{target_language}", target_language)
            .replace("{references}", references)
    }
}

/// One `source -> target` line per reference, or the empty-reference marker
pub fn reference_lines(references: &BTreeMap<String, String>) -> String {
    if references.is_empty() {
        return EMPTY_REFERENCE_MARKER.to_string();
    }

    references
        .iter()
        .map(|(source, target)| format!("{} -> {}", source, target))
        .collect::<Vec<_>>()
        .join("\n")
}

/// System prompt for extracting terms into `target_language`
pub fn term_extraction_prompt(target_language: &str) -> String {
    PromptTemplate::term_extractor().render("", target_language, "")
}

/// System prompt for translating a text with the given glossary references
pub fn translation_prompt(
    source_language: &str,
    target_language: &str,
    references: &BTreeMap<String, String>,
) -> String {
    PromptTemplate::translator().render(source_language, target_language, &reference_lines(references))
}
