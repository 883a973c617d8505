/*!
 * Tests for the SQLite-backed glossary store through the `GlossaryStore` seam
 */

use std::sync::Arc;

use glossator::database::models::{NewGlossaryEntry, Provenance};
use glossator::database::DatabaseConnection;
use glossator::glossary::matcher::TextMatcher;
use glossator::glossary::store::{GlossaryStore, MAX_SIMILAR_RESULTS};
use glossator::GlossaryRepository;

use crate::common::{self, SOURCE, TARGET};

fn entry(source: &str, target: &str) -> NewGlossaryEntry {
    NewGlossaryEntry::new(source, SOURCE, target, TARGET, Provenance::System)
}

#[tokio::test]
async fn test_fileBackedStore_shouldPersistAcrossConnections() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("glossary.db");

    {
        let repo = GlossaryRepository::new(DatabaseConnection::new(&path).unwrap());
        assert!(repo.insert(entry("toilet", "马桶")).await.unwrap());
    }

    let repo = GlossaryRepository::new(DatabaseConnection::new(&path).unwrap());
    assert!(repo.exists("toilet", SOURCE, TARGET).await.unwrap());
    assert!(!repo.insert(entry("toilet", "厕所")).await.unwrap());

    let record = repo.get_entry("toilet", SOURCE, TARGET).await.unwrap().unwrap();
    assert_eq!(record.target_text, "马桶");
}

#[tokio::test]
async fn test_concurrentInserts_ofSameKey_shouldStoreOneRow() {
    let repo = common::seeded_repository(&[]).await;
    let store: Arc<dyn GlossaryStore> = Arc::new(repo.clone());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move { store.insert(entry("contract", "合同")).await })
        })
        .collect();

    let mut inserted = 0;
    for handle in handles {
        if handle.await.unwrap().unwrap() {
            inserted += 1;
        }
    }

    assert_eq!(inserted, 1);
    assert_eq!(repo.list_entries(SOURCE, TARGET).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_matcher_withCjkSourceText_shouldFindEmbeddedTerm() {
    let repo = GlossaryRepository::new_in_memory().unwrap();
    repo.insert(NewGlossaryEntry::new("马桶", "chinese", "toilet", "english", Provenance::User))
        .await
        .unwrap();

    let matches = TextMatcher::new(Arc::new(repo))
        .match_text("安装智能马桶盖", "chinese", "english")
        .await
        .unwrap();

    assert_eq!(matches.translations.get("马桶").map(String::as_str), Some("toilet"));
    assert_eq!(matches.provenance.get("马桶"), Some(&Provenance::User));
}

#[tokio::test]
async fn test_findSimilar_withManyCandidates_shouldCapResults() {
    let repo = common::seeded_repository(&[]).await;
    for i in 0..8 {
        repo.insert(entry(&format!("network slice {}", i), "网络切片")).await.unwrap();
    }

    let similar = repo.find_similar("network slice", SOURCE, TARGET, 0.9).await.unwrap();

    assert_eq!(similar.len(), MAX_SIMILAR_RESULTS);
    assert!(similar.windows(2).all(|w| w[0].score >= w[1].score));
}

#[tokio::test]
async fn test_incrementUsage_withRepeatedTerms_shouldCountEachOnce() {
    let repo = common::seeded_repository(&[("5G network", "5G网络", Provenance::User)]).await;
    let terms = vec!["5G network".to_string(), "5G network".to_string(), "unknown".to_string()];

    let attempted = repo.increment_usage(&terms, SOURCE, TARGET).await.unwrap();

    assert_eq!(attempted, 2);
    let record = repo.get_entry("5G network", SOURCE, TARGET).await.unwrap().unwrap();
    assert_eq!(record.usage_count, 1);
    assert_eq!(repo.stats().await.unwrap().total_usage, 1);
}
