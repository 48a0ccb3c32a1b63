//! Language registry: Single source of truth for all languages the site knows.
//!
//! The registry is immutable metadata (codes, names, writing direction and the
//! legacy spellings older pages persisted). Which of these languages a page
//! actually offers is configuration, see [`crate::config::Config`].

use crate::i18n::Language;
use std::sync::OnceLock;

/// Writing direction of a language, as written to the document `dir` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextDirection {
    Ltr,
    Rtl,
}

impl TextDirection {
    /// Value for the `dir` attribute.
    pub fn as_attr(&self) -> &'static str {
        match self {
            TextDirection::Ltr => "ltr",
            TextDirection::Rtl => "rtl",
        }
    }
}

/// Metadata for a known language.
#[derive(Debug, Clone)]
pub struct LanguageConfig {
    /// The language this entry describes
    pub language: Language,

    /// ISO 639-1 language code (e.g., "en", "he")
    pub code: &'static str,

    /// English name of the language
    pub name: &'static str,

    /// Native name of the language (e.g., "עברית")
    pub native_name: &'static str,

    /// Writing direction
    pub direction: TextDirection,

    /// Legacy spellings accepted when reading stored preferences
    pub aliases: &'static [&'static str],

    /// Whether this is the canonical/source language (only one should be true)
    pub is_canonical: bool,
}

/// Global language registry.
///
/// Initialized once on first access and immutable thereafter.
pub struct LanguageRegistry {
    languages: Vec<LanguageConfig>,
}

static REGISTRY: OnceLock<LanguageRegistry> = OnceLock::new();

impl LanguageRegistry {
    /// Get the global language registry instance.
    pub fn get() -> &'static LanguageRegistry {
        REGISTRY.get_or_init(|| LanguageRegistry {
            languages: default_languages(),
        })
    }

    /// Get a language configuration by canonical code or legacy alias.
    ///
    /// Matching ignores surrounding whitespace and ASCII case.
    pub fn find(&self, raw: &str) -> Option<&LanguageConfig> {
        let raw = raw.trim();
        self.languages.iter().find(|lang| {
            lang.code.eq_ignore_ascii_case(raw)
                || lang.aliases.iter().any(|alias| alias.eq_ignore_ascii_case(raw))
        })
    }

    /// Get the configuration for a language.
    ///
    /// # Panics
    /// Panics if the registry has no entry for the language, which means
    /// `default_languages` is out of sync with the `Language` enum.
    pub fn config_for(&self, language: Language) -> &LanguageConfig {
        self.languages
            .iter()
            .find(|lang| lang.language == language)
            .expect("every Language variant has a registry entry")
    }

    /// Get the canonical language configuration.
    ///
    /// # Panics
    /// Panics if zero or several canonical languages are defined.
    pub fn canonical(&self) -> &LanguageConfig {
        let canonical_langs: Vec<_> = self
            .languages
            .iter()
            .filter(|lang| lang.is_canonical)
            .collect();

        match canonical_langs.len() {
            0 => panic!("No canonical language found in registry"),
            1 => canonical_langs[0],
            _ => panic!("Multiple canonical languages found in registry"),
        }
    }
}

/// English (canonical) and Hebrew.
fn default_languages() -> Vec<LanguageConfig> {
    vec![
        LanguageConfig {
            language: Language::English,
            code: "en",
            name: "English",
            native_name: "English",
            direction: TextDirection::Ltr,
            aliases: &["english"],
            is_canonical: true,
        },
        LanguageConfig {
            language: Language::Hebrew,
            code: "he",
            name: "Hebrew",
            native_name: "עברית",
            direction: TextDirection::Rtl,
            aliases: &["hebrew", "iw"],
            is_canonical: false,
        },
    ]
}
