/*!
 * Integration tests for the glossary-driven translation pipeline.
 *
 * Population, matching, prompting, retry and ordering are exercised together
 * against an in-memory glossary and the scripted mock provider.
 */

use std::sync::Arc;
use std::time::Duration;

use glossator::database::models::Provenance;
use glossator::glossary::store::GlossaryStore;
use glossator::providers::mock::MockProvider;
use glossator::translation::prompts::EMPTY_REFERENCE_MARKER;
use glossator::translation::{ConcurrencyGate, Highlighter, TranslationEngine, UnitStatus};

use crate::common::{self, SOURCE, TARGET};

fn texts(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_translateBatch_withMatchedTerm_shouldEmbedReferenceAndCountUsage() {
    let repo = common::seeded_repository(&[("5G network", "5G网络", Provenance::User)]).await;
    let provider = MockProvider::working();
    let engine = common::engine_with(&provider, Arc::new(repo.clone()), 10);

    let outcomes = engine
        .translate_batch(&texts(&["5G network testing", "contract update"]), SOURCE, TARGET)
        .await
        .unwrap();

    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0].text, "[TRANSLATED] 5G network testing");
    assert_eq!(outcomes[0].matched_terms.translations.get("5G network").map(String::as_str), Some("5G网络"));
    assert!(outcomes[1].matched_terms.is_empty());

    let requests = provider.requests();
    let first = requests.iter().find(|r| r.user_text == "5G network testing").unwrap();
    let second = requests.iter().find(|r| r.user_text == "contract update").unwrap();
    assert!(first.system_prompt.contains("5G network -> 5G网络"));
    assert!(second.system_prompt.contains(EMPTY_REFERENCE_MARKER));
    assert!(!second.system_prompt.contains("5G网络"));

    let entry = repo.get_entry("5G network", SOURCE, TARGET).await.unwrap().unwrap();
    assert_eq!(entry.usage_count, 1);
}

#[tokio::test]
async fn test_translateBatch_withStaggeredLatency_shouldPreserveInputOrder() {
    let repo = common::seeded_repository(&[]).await;
    // Earlier units answer later
    let provider = MockProvider::working().with_delay(|request| {
        let index: u64 = request.user_text.trim_start_matches("unit ").parse().unwrap_or(0);
        Duration::from_millis((8 - index.min(8)) * 5)
    });
    let engine = common::engine_with(&provider, Arc::new(repo), 8);

    let inputs: Vec<String> = (0..8).map(|i| format!("unit {}", i)).collect();
    let outcomes = engine.translate_batch(&inputs, SOURCE, TARGET).await.unwrap();

    let expected: Vec<String> = inputs.iter().map(|t| format!("[TRANSLATED] {}", t)).collect();
    let actual: Vec<String> = outcomes.into_iter().map(|o| o.text).collect();
    assert_eq!(actual, expected);
}

#[tokio::test]
async fn test_translateBatch_shouldNeverExceedGateCapacity() {
    let repo = common::seeded_repository(&[]).await;
    let provider = MockProvider::working().with_delay(|_| Duration::from_millis(20));
    let engine = common::engine_with(&provider, Arc::new(repo), 3);

    let inputs: Vec<String> = (0..12).map(|i| format!("paragraph {}", i)).collect();
    let outcomes = engine.translate_batch(&inputs, SOURCE, TARGET).await.unwrap();

    assert_eq!(outcomes.len(), 12);
    assert_eq!(provider.request_count(), 12);
    assert!(provider.peak_in_flight() <= 3, "peak was {}", provider.peak_in_flight());
    assert!(provider.peak_in_flight() >= 2, "units did not overlap");
}

#[tokio::test]
async fn test_translateBatch_withTwoTransientFailures_shouldStillTranslate() {
    common::init_test_logging();
    let repo = common::seeded_repository(&[]).await;
    let provider = MockProvider::fail_first(2);
    let engine = common::engine_with(&provider, Arc::new(repo), 1);

    let outcomes = engine.translate_batch(&texts(&["contract update"]), SOURCE, TARGET).await.unwrap();

    assert_eq!(outcomes[0].status, UnitStatus::Translated);
    assert_eq!(outcomes[0].text, "[TRANSLATED] contract update");
    assert_eq!(provider.request_count(), 3);
}

#[tokio::test]
async fn test_translateBatch_withPersistentFailure_shouldReturnOriginalText() {
    common::init_test_logging();
    let repo = common::seeded_repository(&[("contract", "合同", Provenance::User)]).await;
    let provider = MockProvider::failing();
    let engine = common::engine_with(&provider, Arc::new(repo.clone()), 4);

    let outcomes = engine
        .translate_batch(&texts(&["contract update", "5G rollout"]), SOURCE, TARGET)
        .await
        .unwrap();

    assert_eq!(outcomes[0].text, "contract update");
    assert_eq!(outcomes[1].text, "5G rollout");
    assert!(outcomes.iter().all(|o| o.status == UnitStatus::Fallback));
    assert_eq!(outcomes[0].matched_terms.len(), 1);
    assert_eq!(provider.request_count(), 6);

    // Retries reuse the references without counting them again
    let entry = repo.get_entry("contract", SOURCE, TARGET).await.unwrap().unwrap();
    assert_eq!(entry.usage_count, 1);
}

#[tokio::test]
async fn test_translateBatch_withFailingUsageUpdate_shouldStillTranslate() {
    common::init_test_logging();
    let repo = common::seeded_repository(&[("5G network", "5G网络", Provenance::System)]).await;
    let store = common::UsageFailingStore::new(repo);
    let provider = MockProvider::working();
    let engine = common::engine_with(&provider, Arc::new(store), 2);

    let outcomes = engine
        .translate_batch(&texts(&["5G network testing"]), SOURCE, TARGET)
        .await
        .unwrap();

    assert_eq!(outcomes[0].status, UnitStatus::Translated);
    assert!(provider.requests()[0].system_prompt.contains("5G network -> 5G网络"));
}

#[tokio::test]
async fn test_translateBatch_withExtraction_shouldUseTermsExtractedFromSameBatch() {
    let repo = common::seeded_repository(&[]).await;
    let provider = MockProvider::working().with_responder(|request| {
        if request.response_schema.is_some() {
            Ok(r#"[{"source_text": "Data Platform", "target_text": "数据平台"}]"#.to_string())
        } else {
            Ok("数据平台已上线".to_string())
        }
    });
    let engine = TranslationEngine::new(
        Arc::new(provider.clone()),
        Arc::new(repo.clone()),
        ConcurrencyGate::new(4),
        common::fast_retry(),
    );

    let outcomes = engine
        .translate_batch(&texts(&["The Data Platform is live"]), SOURCE, TARGET)
        .await
        .unwrap();

    assert!(repo.exists("Data Platform", SOURCE, TARGET).await.unwrap());
    assert_eq!(
        outcomes[0].matched_terms.provenance.get("Data Platform"),
        Some(&Provenance::System)
    );

    let translation = provider
        .requests()
        .into_iter()
        .find(|r| r.response_schema.is_none())
        .unwrap();
    assert!(translation.system_prompt.contains("Data Platform -> 数据平台"));

    // Second pass finds the term already stored
    let report = engine
        .populator()
        .populate("The Data Platform is live", SOURCE, TARGET)
        .await
        .unwrap();
    assert_eq!(report.inserted, 0);
    assert_eq!(report.skipped, 1);
}

#[tokio::test]
async fn test_highlight_afterTranslation_shouldMarkUserTargetTerms() {
    let repo = common::seeded_repository(&[("Data Platform", "数据平台", Provenance::User)]).await;
    let provider = MockProvider::working().with_responder(|_| Ok("我们的数据平台".to_string()));
    let engine = common::engine_with(&provider, Arc::new(repo), 2);

    let outcomes = engine
        .translate_batch(&texts(&["Our Data Platform"]), SOURCE, TARGET)
        .await
        .unwrap();

    let targets: Vec<String> = outcomes[0].matched_terms.user_terms().into_values().collect();
    let spans = Highlighter::new().highlight(&outcomes[0].text, &targets);

    let marked: Vec<&str> = spans
        .iter()
        .filter(|s| s.highlighted)
        .map(|s| s.slice(&outcomes[0].text))
        .collect();
    assert_eq!(marked, vec!["数据平台"]);
}
