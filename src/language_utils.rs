/*!
 * Language utilities.
 *
 * Languages are identified by lowercase English names ("english", "chinese").
 * There is no locale negotiation: a name is either in the supported set or it
 * is rejected.
 */

use crate::errors::ConfigError;

/// Supported language names
pub const SUPPORTED_LANGUAGES: &[&str] = &[
    "arabic",
    "chinese",
    "dutch",
    "english",
    "french",
    "german",
    "italian",
    "japanese",
    "korean",
    "portuguese",
    "russian",
    "spanish",
    "thai",
    "vietnamese",
];

/// Normalize a language name and check it against the supported set
pub fn normalize_language(name: &str) -> Result<String, ConfigError> {
    let normalized = name.trim().to_lowercase();

    if SUPPORTED_LANGUAGES.contains(&normalized.as_str()) {
        Ok(normalized)
    } else {
        Err(ConfigError::UnsupportedLanguage(name.to_string()))
    }
}

/// Check whether a language name is supported (case-insensitive)
pub fn is_supported(name: &str) -> bool {
    normalize_language(name).is_ok()
}

/// Validate a source/target pair, returning both normalized names
pub fn validate_pair(source: &str, target: &str) -> Result<(String, String), ConfigError> {
    let source = normalize_language(source)?;
    let target = normalize_language(target)?;
    Ok((source, target))
}

/// Capitalized display name used in prompts and log lines
pub fn display_name(name: &str) -> String {
    let mut chars = name.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizeLanguage_withMixedCase_shouldLowercase() {
        assert_eq!(normalize_language("  English ").unwrap(), "english");
        assert_eq!(normalize_language("CHINESE").unwrap(), "chinese");
    }

    #[test]
    fn test_normalizeLanguage_withUnknown_shouldFail() {
        let err = normalize_language("klingon").unwrap_err();
        assert_eq!(err, ConfigError::UnsupportedLanguage("klingon".to_string()));
        assert!(normalize_language("").is_err());
        // ISO codes are not names
        assert!(normalize_language("en").is_err());
    }

    #[test]
    fn test_validatePair_shouldNormalizeBoth() {
        let (s, t) = validate_pair("English", "Chinese").unwrap();
        assert_eq!(s, "english");
        assert_eq!(t, "chinese");
        assert!(validate_pair("english", "elvish").is_err());
    }

    #[test]
    fn test_displayName_shouldCapitalize() {
        assert_eq!(display_name("chinese"), "Chinese");
        assert_eq!(display_name("ENGLISH"), "English");
        assert_eq!(display_name(""), "");
    }
}
