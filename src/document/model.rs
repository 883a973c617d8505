/*!
 * Plain-text document model.
 *
 * A document is a sequence of lines. Each non-blank line is a paragraph.
 * Lines written as pipe tables (`| a | b |`) are table rows whose non-blank
 * cells are translated separately; their `|---|` separator rows and blank
 * lines are carried through verbatim.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

// @const: `|---|:--:|` style rows between a table header and its body
static SEPARATOR_ROW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*\|(\s*:?-+:?\s*\|)+\s*$").unwrap()
});

/// Where a translation unit sits in its document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UnitPosition {
    /// A paragraph, by line index
    Paragraph { index: usize },
    /// A paragraph inside a table cell
    TableCell {
        table: usize,
        row: usize,
        col: usize,
        paragraph: usize,
    },
}

/// One piece of text to translate, tagged with its position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationUnit {
    pub position: UnitPosition,
    /// Trimmed text of the paragraph or cell
    pub text: String,
}

/// One line of a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Blank line or table separator, kept as is
    Verbatim(String),
    /// A paragraph line
    Paragraph(String),
    /// A table row and its raw cells
    TableRow {
        table: usize,
        row: usize,
        cells: Vec<String>,
    },
}

/// A parsed plain-text document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlainDocument {
    pub blocks: Vec<Block>,
}

fn is_table_line(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= 2 && trimmed.starts_with('|') && trimmed.ends_with('|')
}

fn is_separator_row(line: &str) -> bool {
    SEPARATOR_ROW.is_match(line)
}

fn split_cells(line: &str) -> Vec<String> {
    let trimmed = line.trim();
    trimmed[1..trimmed.len() - 1]
        .split('|')
        .map(|cell| cell.to_string())
        .collect()
}

impl PlainDocument {
    /// Parse document text
    pub fn parse(content: &str) -> Self {
        let mut blocks = Vec::new();
        let mut table = 0;
        let mut row = 0;
        let mut in_table = false;

        for line in content.lines() {
            if is_table_line(line) {
                if !in_table {
                    in_table = true;
                    row = 0;
                }
                if is_separator_row(line) {
                    blocks.push(Block::Verbatim(line.to_string()));
                } else {
                    blocks.push(Block::TableRow {
                        table,
                        row,
                        cells: split_cells(line),
                    });
                    row += 1;
                }
                continue;
            }

            if in_table {
                in_table = false;
                table += 1;
            }

            if line.trim().is_empty() {
                blocks.push(Block::Verbatim(line.to_string()));
            } else {
                blocks.push(Block::Paragraph(line.to_string()));
            }
        }

        Self { blocks }
    }

    /// Every non-blank paragraph and table cell, in document order
    pub fn units(&self) -> Vec<TranslationUnit> {
        let mut units = Vec::new();

        for (index, block) in self.blocks.iter().enumerate() {
            match block {
                Block::Verbatim(_) => {}
                Block::Paragraph(line) => units.push(TranslationUnit {
                    position: UnitPosition::Paragraph { index },
                    text: line.trim().to_string(),
                }),
                Block::TableRow { table, row, cells } => {
                    for (col, cell) in cells.iter().enumerate() {
                        let text = cell.trim();
                        if !text.is_empty() {
                            units.push(TranslationUnit {
                                position: UnitPosition::TableCell {
                                    table: *table,
                                    row: *row,
                                    col,
                                    paragraph: 0,
                                },
                                text: text.to_string(),
                            });
                        }
                    }
                }
            }
        }

        units
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Title line\n\n  Indented paragraph\n| Term | Meaning |\n|---|---|\n| 5G | network |\n| | empty |\nAfter table\n";

    #[test]
    fn test_parse_shouldClassifyLines() {
        let doc = PlainDocument::parse(SAMPLE);

        assert_eq!(doc.blocks.len(), 8);
        assert_eq!(doc.blocks[1], Block::Verbatim(String::new()));
        assert_eq!(doc.blocks[4], Block::Verbatim("|---|---|".to_string()));
        assert!(matches!(doc.blocks[5], Block::TableRow { table: 0, row: 1, .. }));
        assert_eq!(doc.blocks[7], Block::Paragraph("After table".to_string()));
    }

    #[test]
    fn test_units_shouldSkipBlankTextAndTagPositions() {
        let units = PlainDocument::parse(SAMPLE).units();
        let texts: Vec<&str> = units.iter().map(|u| u.text.as_str()).collect();

        assert_eq!(
            texts,
            vec!["Title line", "Indented paragraph", "Term", "Meaning", "5G", "network", "empty", "After table"]
        );
        assert_eq!(units[1].position, UnitPosition::Paragraph { index: 2 });
        assert_eq!(
            units[6].position,
            UnitPosition::TableCell { table: 0, row: 2, col: 1, paragraph: 0 }
        );
    }

    #[test]
    fn test_parse_withBlankCells_shouldNotTreatRowAsSeparator() {
        let doc = PlainDocument::parse("| a | b |\n| :--- | ---: |\n| | |\n");
        assert!(matches!(doc.blocks[0], Block::TableRow { row: 0, .. }));
        assert!(matches!(doc.blocks[1], Block::Verbatim(_)));
        assert!(matches!(doc.blocks[2], Block::TableRow { row: 1, .. }));
    }

    #[test]
    fn test_parse_withTwoTables_shouldNumberThemSeparately() {
        let doc = PlainDocument::parse("| a |\ntext\n| b |\n");
        let units = doc.units();
        assert_eq!(units[0].position, UnitPosition::TableCell { table: 0, row: 0, col: 0, paragraph: 0 });
        assert_eq!(units[2].position, UnitPosition::TableCell { table: 1, row: 0, col: 0, paragraph: 0 });
    }
}
