/*!
 * Tests for configuration loading and the settings derived from it
 */

use std::time::Duration;

use glossator::app_config::{Config, LogLevel, TranslationProvider};
use glossator::errors::ConfigError;
use glossator::translation::RetryPolicy;

use crate::common;

#[test]
fn test_saveThenLoad_shouldKeepOverriddenFields() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");

    let mut config = common::test_config(Some(dir.path().join("g.db")));
    config.target_language = "german".to_string();
    config.output.highlight_open = "<b>".to_string();
    config.log_level = LogLevel::Debug;
    config.save(&path).unwrap();

    let loaded = Config::load_or_create(&path).unwrap();
    assert_eq!(loaded.target_language, "german");
    assert_eq!(loaded.provider.provider_type, TranslationProvider::Ollama);
    assert_eq!(loaded.output.highlight_open, "<b>");
    assert_eq!(loaded.glossary.database_path, Some(dir.path().join("g.db")));
    assert_eq!(loaded.log_level.to_level_filter(), log::LevelFilter::Debug);
}

#[test]
fn test_loadOrCreate_withMalformedFile_shouldFail() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(dir.path(), "conf.json", "{ not json").unwrap();

    assert!(Config::load_or_create(&path).is_err());
}

#[test]
fn test_retryPolicy_fromConfig_shouldUseCountAndBackoff() {
    let mut config = common::test_config(None);
    config.translation.retry_count = 4;
    config.translation.retry_backoff_ms = 250;

    let policy = RetryPolicy::from_config(&config.translation);

    assert_eq!(policy.max_attempts, 4);
    assert_eq!(policy.delay_for(0), Duration::from_millis(250));
    assert_eq!(policy.delay_for(2), Duration::from_millis(1000));
}

#[test]
fn test_validate_withOutOfRangeSettings_shouldFail() {
    let mut config = common::test_config(None);
    config.translation.temperature = 2.5;
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

    let mut config = common::test_config(None);
    config.glossary.similarity_threshold = 1.5;
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

    let mut config = common::test_config(None);
    config.translation.retry_count = 0;
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
}
