//! Language type: the one canonical representation of a site language.
//!
//! Older pages persisted `english`/`hebrew` under assorted keys. Those spellings
//! are only accepted by [`Language::normalize`]; everything inside the crate
//! and everything written back to storage uses the ISO codes.

use crate::i18n::{LanguageConfig, LanguageRegistry, TextDirection};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A site language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "en")]
    English,
    #[serde(rename = "he")]
    Hebrew,
}

/// Returned when a string names no known language.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown language code: '{0}'")]
pub struct UnknownLanguage(pub String);

impl Language {
    /// Every language the registry knows about.
    pub const ALL: [Language; 2] = [Language::English, Language::Hebrew];

    /// Accept a canonical code or a legacy spelling such as `hebrew`.
    pub fn normalize(raw: &str) -> Option<Language> {
        LanguageRegistry::get().find(raw).map(|config| config.language)
    }

    /// The canonical (source) language.
    pub fn canonical() -> Language {
        LanguageRegistry::get().canonical().language
    }

    /// ISO 639-1 code, also used as the persisted value and the `lang` attribute.
    pub fn code(&self) -> &'static str {
        self.config().code
    }

    pub fn config(&self) -> &'static LanguageConfig {
        LanguageRegistry::get().config_for(*self)
    }

    pub fn name(&self) -> &'static str {
        self.config().name
    }

    pub fn native_name(&self) -> &'static str {
        self.config().native_name
    }

    pub fn direction(&self) -> TextDirection {
        self.config().direction
    }

    /// The other language of the pair, used by the two-state toggle.
    pub fn toggled(&self) -> Language {
        match self {
            Language::English => Language::Hebrew,
            Language::Hebrew => Language::English,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::normalize(s).ok_or_else(|| UnknownLanguage(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== normalize Tests ====================

    #[test]
    fn test_normalize_legacy_values() {
        assert_eq!(Language::normalize("hebrew"), Some(Language::Hebrew));
        assert_eq!(Language::normalize("english"), Some(Language::English));
        assert_eq!(Language::normalize("he"), Some(Language::Hebrew));
        assert_eq!(Language::normalize("klingon"), None);
    }

    #[test]
    fn test_from_str_uses_normalize() {
        let lang: Language = "Hebrew".parse().unwrap();
        assert_eq!(lang, Language::Hebrew);
        let err = "xx".parse::<Language>().unwrap_err();
        assert!(err.to_string().contains("Unknown"));
    }

    // ==================== Metadata Tests ====================

    #[test]
    fn test_canonical_is_english() {
        assert_eq!(Language::canonical(), Language::English);
    }

    #[test]
    fn test_direction() {
        assert_eq!(Language::English.direction(), TextDirection::Ltr);
        assert_eq!(Language::Hebrew.direction().as_attr(), "rtl");
    }

    #[test]
    fn test_names() {
        assert_eq!(Language::Hebrew.name(), "Hebrew");
        assert_eq!(Language::Hebrew.native_name(), "עברית");
        assert_eq!(Language::English.native_name(), "English");
    }

    #[test]
    fn test_display_is_code() {
        assert_eq!(Language::Hebrew.to_string(), "he");
        assert_eq!(format!("{}", Language::English), "en");
    }

    #[test]
    fn test_toggled() {
        assert_eq!(Language::English.toggled(), Language::Hebrew);
        assert_eq!(Language::Hebrew.toggled(), Language::English);
    }

    #[test]
    fn test_serde_uses_codes() {
        assert_eq!(serde_json::to_string(&Language::Hebrew).unwrap(), "\"he\"");
        let lang: Language = serde_json::from_str("\"en\"").unwrap();
        assert_eq!(lang, Language::English);
    }

    #[test]
    fn test_every_variant_has_config() {
        for lang in Language::ALL {
            assert_eq!(Language::normalize(lang.code()), Some(lang));
            assert_eq!(lang.config().language, lang);
        }
    }
}
