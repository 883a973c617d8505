/*!
 * Tests for document reading and rendering
 */

use glossator::database::models::Provenance;
use glossator::document::{self, DocumentRenderer, OutputMode, UnitPosition};
use glossator::glossary::matcher::TermMatches;
use glossator::translation::{Highlighter, TranslationOutcome, UnitStatus};

use crate::common;

fn outcome(text: &str, status: UnitStatus) -> TranslationOutcome {
    TranslationOutcome {
        text: text.to_string(),
        matched_terms: TermMatches::default(),
        status,
    }
}

#[test]
fn test_readDocument_shouldYieldUnitsInDocumentOrder() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(
        dir.path(),
        "spec.txt",
        "Overview\n\n| Item | Owner |\n|---|---|\n| Data Platform | Ops |\nClosing note\n",
    )
    .unwrap();

    let doc = document::read_document(&path).unwrap();
    let units = doc.units();

    let texts: Vec<&str> = units.iter().map(|u| u.text.as_str()).collect();
    assert_eq!(texts, vec!["Overview", "Item", "Owner", "Data Platform", "Ops", "Closing note"]);
    assert_eq!(units[0].position, UnitPosition::Paragraph { index: 0 });
    assert_eq!(
        units[3].position,
        UnitPosition::TableCell { table: 0, row: 1, col: 0, paragraph: 0 }
    );
}

#[test]
fn test_readDocument_withMissingFile_shouldFail() {
    assert!(document::read_document("/nonexistent/input.txt").is_err());
}

#[test]
fn test_render_contrast_withCustomMarkers_shouldWrapUserTermsOnly() {
    let doc = document::model::PlainDocument::parse("Sign the contract on the Data Platform");
    let units = doc.units();

    let mut matched = TermMatches::default();
    matched.translations.insert("contract".to_string(), "合同".to_string());
    matched.provenance.insert("contract".to_string(), Provenance::System);
    matched.translations.insert("Data Platform".to_string(), "数据平台".to_string());
    matched.provenance.insert("Data Platform".to_string(), Provenance::User);

    let outcomes = vec![TranslationOutcome {
        text: "在数据平台上签署合同".to_string(),
        matched_terms: matched,
        status: UnitStatus::Translated,
    }];

    let renderer = DocumentRenderer::new(Highlighter::new(), "[[", "]]");
    let text = renderer.render(&doc, &units, &outcomes, OutputMode::Contrast);

    assert_eq!(
        text,
        "Sign the contract on the [[Data Platform]]\n在[[数据平台]]上签署合同\n"
    );
}

#[test]
fn test_render_translationOnly_withFallback_shouldKeepOriginalLine() {
    let doc = document::model::PlainDocument::parse("first\nsecond\n");
    let units = doc.units();
    let outcomes = vec![
        outcome("第一", UnitStatus::Translated),
        outcome("second", UnitStatus::Fallback),
    ];

    let text = DocumentRenderer::new(Highlighter::new(), "**", "**").render(
        &doc,
        &units,
        &outcomes,
        OutputMode::TranslationOnly,
    );
    assert_eq!(text, "第一\nsecond\n");
}
