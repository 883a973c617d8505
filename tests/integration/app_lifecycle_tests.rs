/*!
 * End-to-end tests of the application controller: document in, two
 * rendered documents out, plus the glossary maintenance commands.
 */

use std::sync::Arc;

use glossator::app_controller::Controller;
use glossator::database::models::Provenance;
use glossator::providers::mock::MockProvider;
use glossator::GlossaryRepository;

use crate::common::{self, SOURCE, TARGET};

const DOCUMENT: &str = "Our Data Platform is live\n\n| Term | Note |\n|---|---|\n| 5G network | pilot |\n";

fn controller(provider: &MockProvider, repo: GlossaryRepository) -> Controller {
    let mut config = common::test_config(None);
    config.translation.extract_terms = false;
    Controller::with_parts(config, Arc::new(provider.clone()), repo)
}

#[tokio::test]
async fn test_run_shouldWriteTranslationAndContrastOutputs() {
    let dir = common::create_temp_dir().unwrap();
    let input = common::create_test_file(dir.path(), "report.txt", DOCUMENT).unwrap();
    let out_dir = dir.path().join("out");

    let repo = common::seeded_repository(&[("Data Platform", "数据平台", Provenance::User)]).await;
    let provider = MockProvider::working().with_responder(|request| {
        Ok(match request.user_text.as_str() {
            "Our Data Platform is live" => "我们的数据平台已上线",
            "Term" => "术语",
            "Note" => "备注",
            "5G network" => "5G网络",
            _ => "试点",
        }
        .to_string())
    });

    let report = controller(&provider, repo).run(&input, &out_dir, false).await.unwrap().unwrap();

    assert_eq!(report.units, 5);
    assert_eq!(report.fallbacks, 0);
    assert_eq!(report.translation_path, out_dir.join("report_translation.txt"));

    let translated = std::fs::read_to_string(&report.translation_path).unwrap();
    assert_eq!(
        translated,
        "我们的数据平台已上线\n\n| 术语 | 备注 |\n|---|---|\n| 5G网络 | 试点 |\n"
    );

    let contrast = std::fs::read_to_string(&report.contrast_path).unwrap();
    assert!(contrast.starts_with("Our **Data Platform** is live\n我们的**数据平台**已上线\n"));
    assert!(contrast.contains("| 5G network / 5G网络 |"));
}

#[tokio::test]
async fn test_run_withExistingOutput_shouldSkipUnlessForced() {
    let dir = common::create_temp_dir().unwrap();
    let input = common::create_test_file(dir.path(), "notes.txt", "contract update\n").unwrap();
    common::create_test_file(dir.path(), "notes_translation.txt", "old").unwrap();

    let provider = MockProvider::working();
    let controller = controller(&provider, common::seeded_repository(&[]).await);

    assert!(controller.run(&input, dir.path(), false).await.unwrap().is_none());
    assert_eq!(provider.request_count(), 0);

    let report = controller.run(&input, dir.path(), true).await.unwrap().unwrap();
    assert_eq!(report.units, 1);
    assert_eq!(
        std::fs::read_to_string(dir.path().join("notes_translation.txt")).unwrap(),
        "[TRANSLATED] contract update\n"
    );
}

#[tokio::test]
async fn test_run_withFailingProvider_shouldKeepOriginalText() {
    let dir = common::create_temp_dir().unwrap();
    let input = common::create_test_file(dir.path(), "memo.txt", "contract update\n").unwrap();

    let provider = MockProvider::failing();
    let report = controller(&provider, common::seeded_repository(&[]).await)
        .run(&input, dir.path(), false)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(report.fallbacks, 1);
    assert_eq!(std::fs::read_to_string(report.translation_path).unwrap(), "contract update\n");
}

#[tokio::test]
async fn test_run_withMissingInput_shouldFail() {
    let dir = common::create_temp_dir().unwrap();
    let provider = MockProvider::working();
    let controller = controller(&provider, common::seeded_repository(&[]).await);

    let result = controller.run(&dir.path().join("missing.txt"), dir.path(), false).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_extractGlossary_shouldPopulateWithoutTranslating() {
    let dir = common::create_temp_dir().unwrap();
    let input = common::create_test_file(dir.path(), "doc.txt", "The Data Platform\nThe Data Platform again\n").unwrap();

    let provider = MockProvider::working().with_responder(|_| {
        Ok(r#"[{"source_text": "Data Platform", "target_text": "数据平台"}]"#.to_string())
    });
    let repo = common::seeded_repository(&[]).await;
    let report = controller(&provider, repo.clone()).extract_glossary(&input).await.unwrap();

    assert_eq!(report.extracted, 2);
    assert_eq!(report.inserted + report.skipped, 2);
    assert_eq!(report.inserted, 1);
    assert!(provider.requests().iter().all(|r| r.response_schema.is_some()));
    assert_eq!(repo.stats().await.unwrap().system_entries, 1);
}

#[tokio::test]
async fn test_importThenSimilar_shouldFindUserTerms() {
    let dir = common::create_temp_dir().unwrap();
    let file = common::create_test_file(
        dir.path(),
        "terms.json",
        r#"[{"source_text": "data platform", "target_text": "数据平台"},
            {"source_text": "data platforms", "target_text": "数据平台"},
            {"source_text": "contract", "target_text": "合同"}]"#,
    )
    .unwrap();

    let provider = MockProvider::working();
    let repo = common::seeded_repository(&[]).await;
    let controller = controller(&provider, repo.clone());

    let summary = controller.import_glossary(&file).await.unwrap();
    assert_eq!(summary.inserted, 3);

    let similar = controller.similar_terms("data platform", Some(0.5)).await.unwrap();
    assert_eq!(similar[0].source_text, "data platform");
    assert_eq!(similar.len(), 2);
    assert!(similar.iter().all(|s| s.provenance == Provenance::User));

    let stats = controller.glossary_stats().await.unwrap();
    assert_eq!(stats.user_entries, 3);
    assert_eq!(stats.total_entries(), 3);

    let exported = dir.path().join("export.json");
    assert_eq!(controller.export_glossary(&exported).await.unwrap(), 3);
    let records = glossator::glossary::import::parse_glossary(&std::fs::read_to_string(exported).unwrap()).unwrap();
    assert!(records.iter().any(|r| r.source_text == "contract"));

    assert!(repo.get_entry("contract", SOURCE, TARGET).await.unwrap().is_some());
}

#[test]
fn test_withConfig_shouldOpenFileBackedGlossary() {
    let dir = common::create_temp_dir().unwrap();
    let db_path = dir.path().join("nested").join("glossary.db");
    let config = common::test_config(Some(db_path.clone()));

    let stats = tokio_test::block_on(async {
        let controller = Controller::with_config(config).unwrap();
        controller.glossary_stats().await.unwrap()
    });

    assert_eq!(stats.total_entries(), 0);
    assert!(db_path.exists());
}

#[tokio::test]
async fn test_testConnection_withFailingProvider_shouldFail() {
    let controller = controller(&MockProvider::failing(), common::seeded_repository(&[]).await);
    assert!(controller.test_connection().await.is_err());

    let repo = common::seeded_repository(&[]).await;
    let working = Controller::with_parts(common::test_config(None), Arc::new(MockProvider::working()), repo);
    assert!(working.test_connection().await.is_ok());
}
