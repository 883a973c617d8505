/*!
 * Writers for translated plain-text documents.
 *
 * Two renderings are produced from one translation pass:
 * - translation only: every unit replaced by its translation
 * - contrast: each original paragraph followed by its translation; table
 *   cells hold "original / translation". Only user-supplied glossary terms
 *   are marked, source terms in the original and their target terms in the
 *   translation.
 */

use std::collections::HashMap;

use super::model::{Block, PlainDocument, TranslationUnit, UnitPosition};
use crate::translation::engine::TranslationOutcome;
use crate::translation::highlight::{apply_markers, Highlighter};

/// Which rendering to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    TranslationOnly,
    Contrast,
}

/// Renders documents with highlight markers
#[derive(Debug, Clone)]
pub struct DocumentRenderer {
    highlighter: Highlighter,
    open: String,
    close: String,
}

impl DocumentRenderer {
    pub fn new(highlighter: Highlighter, open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            highlighter,
            open: open.into(),
            close: close.into(),
        }
    }

    fn mark(&self, text: &str, terms: &[String]) -> String {
        if terms.is_empty() {
            return text.to_string();
        }
        let spans = self.highlighter.highlight(text, terms);
        apply_markers(text, &spans, &self.open, &self.close)
    }

    /// Original and translated text of one unit, with user terms marked
    fn contrast_pair(&self, unit: &TranslationUnit, outcome: &TranslationOutcome) -> (String, String) {
        let user_terms = outcome.matched_terms.user_terms();
        let sources: Vec<String> = user_terms.keys().cloned().collect();
        let targets: Vec<String> = user_terms.values().cloned().collect();

        (self.mark(&unit.text, &sources), self.mark(&outcome.text, &targets))
    }

    fn render_unit(&self, unit: &TranslationUnit, outcome: &TranslationOutcome, mode: OutputMode, cell: bool) -> String {
        match mode {
            OutputMode::TranslationOnly => outcome.text.clone(),
            OutputMode::Contrast => {
                let (original, translated) = self.contrast_pair(unit, outcome);
                if cell {
                    format!("{} / {}", original, translated)
                } else {
                    format!("{}\n{}", original, translated)
                }
            }
        }
    }

    /// Render `document` using outcomes parallel to `units`
    pub fn render(
        &self,
        document: &PlainDocument,
        units: &[TranslationUnit],
        outcomes: &[TranslationOutcome],
        mode: OutputMode,
    ) -> String {
        let by_position: HashMap<UnitPosition, (&TranslationUnit, &TranslationOutcome)> = units
            .iter()
            .zip(outcomes.iter())
            .map(|(unit, outcome)| (unit.position, (unit, outcome)))
            .collect();

        let mut lines = Vec::with_capacity(document.blocks.len());

        for (index, block) in document.blocks.iter().enumerate() {
            match block {
                Block::Verbatim(line) => lines.push(line.clone()),
                Block::Paragraph(line) => match by_position.get(&UnitPosition::Paragraph { index }) {
                    Some((unit, outcome)) => {
                        let indent = &line[..line.len() - line.trim_start().len()];
                        let rendered = self.render_unit(unit, outcome, mode, false);
                        let indented: Vec<String> = rendered.lines().map(|l| format!("{}{}", indent, l)).collect();
                        lines.push(indented.join("\n"));
                    }
                    None => lines.push(line.clone()),
                },
                Block::TableRow { table, row, cells } => {
                    let rendered: Vec<String> = cells
                        .iter()
                        .enumerate()
                        .map(|(col, cell)| {
                            let position = UnitPosition::TableCell {
                                table: *table,
                                row: *row,
                                col,
                                paragraph: 0,
                            };
                            match by_position.get(&position) {
                                Some((unit, outcome)) => {
                                    // A row must stay on one line
                                    let rendered = self.render_unit(unit, outcome, mode, true);
                                    format!(" {} ", rendered.lines().collect::<Vec<_>>().join(" "))
                                }
                                None => cell.clone(),
                            }
                        })
                        .collect();
                    lines.push(format!("|{}|", rendered.join("|")));
                }
            }
        }

        let mut out = lines.join("\n");
        out.push('\n');
        out
    }
}
