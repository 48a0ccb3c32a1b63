use crate::i18n::Language;
use crate::theme::Theme;
use anyhow::{bail, Context, Result};
use reqwest::Url;

#[derive(Debug, Clone)]
pub struct Config {
    // Resources
    pub base_url: Url,
    pub dictionary_dir: String,
    pub partials_dir: String,

    // Languages
    pub default_language: Language,
    pub supported_languages: Vec<Language>,

    // Theme
    pub default_theme: Theme,

    // Preferences
    pub preferences_file: String,

    // CTA fallbacks when the page body carries no data-*-url
    pub intake_url: String,
    pub message_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("SITE_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8000/".to_string());
        let base_url = Url::parse(&base_url)
            .with_context(|| format!("SITE_BASE_URL is not a valid URL: {}", base_url))?;

        let default_language = match std::env::var("SITE_DEFAULT_LANGUAGE") {
            Ok(code) => Language::normalize(&code)
                .with_context(|| format!("SITE_DEFAULT_LANGUAGE: unknown language '{}'", code))?,
            Err(_) => Language::canonical(),
        };

        let supported_languages = match std::env::var("SITE_SUPPORTED_LANGUAGES") {
            Ok(list) => parse_language_list(&list)?,
            Err(_) => Language::ALL.to_vec(),
        };

        if !supported_languages.contains(&default_language) {
            bail!(
                "SITE_DEFAULT_LANGUAGE '{}' is not in SITE_SUPPORTED_LANGUAGES",
                default_language
            );
        }

        let default_theme = match std::env::var("SITE_DEFAULT_THEME") {
            Ok(raw) => raw
                .parse::<Theme>()
                .with_context(|| format!("SITE_DEFAULT_THEME: unknown theme '{}'", raw))?,
            Err(_) => Theme::Dark,
        };

        Ok(Self {
            base_url,
            dictionary_dir: std::env::var("SITE_DICTIONARY_DIR")
                .unwrap_or_else(|_| "i18n".to_string()),
            partials_dir: std::env::var("SITE_PARTIALS_DIR")
                .unwrap_or_else(|_| "partials".to_string()),
            default_language,
            supported_languages,
            default_theme,
            preferences_file: std::env::var("SITE_PREFERENCES_FILE")
                .unwrap_or_else(|_| ".sra-preferences.json".to_string()),
            intake_url: std::env::var("SITE_INTAKE_URL")
                .unwrap_or_else(|_| "https://example.com/intake-consent".to_string()),
            message_url: std::env::var("SITE_MESSAGE_URL")
                .unwrap_or_else(|_| "https://wa.me/XXXXXXXXXXX".to_string()),
        })
    }

    /// Defaults for a site served from `base_url`. Used by tests and tools.
    pub fn for_base_url(base_url: Url) -> Self {
        Self {
            base_url,
            dictionary_dir: "i18n".to_string(),
            partials_dir: "partials".to_string(),
            default_language: Language::canonical(),
            supported_languages: Language::ALL.to_vec(),
            default_theme: Theme::Dark,
            preferences_file: ".sra-preferences.json".to_string(),
            intake_url: "https://example.com/intake-consent".to_string(),
            message_url: "https://wa.me/XXXXXXXXXXX".to_string(),
        }
    }
}

/// Parse a comma-separated language list, dropping duplicates.
fn parse_language_list(list: &str) -> Result<Vec<Language>> {
    let mut languages = Vec::new();
    for raw in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let lang = Language::normalize(raw)
            .with_context(|| format!("SITE_SUPPORTED_LANGUAGES: unknown language '{}'", raw))?;
        if !languages.contains(&lang) {
            languages.push(lang);
        }
    }
    if languages.is_empty() {
        bail!("SITE_SUPPORTED_LANGUAGES is empty");
    }
    Ok(languages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "SITE_BASE_URL",
        "SITE_DEFAULT_LANGUAGE",
        "SITE_SUPPORTED_LANGUAGES",
        "SITE_DEFAULT_THEME",
        "SITE_DICTIONARY_DIR",
        "SITE_PARTIALS_DIR",
        "SITE_PREFERENCES_FILE",
        "SITE_INTAKE_URL",
        "SITE_MESSAGE_URL",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        let config = Config::from_env().unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost:8000/");
        assert_eq!(config.default_language, Language::English);
        assert_eq!(config.supported_languages, vec![Language::English, Language::Hebrew]);
        assert_eq!(config.default_theme, Theme::Dark);
        assert_eq!(config.dictionary_dir, "i18n");
        assert_eq!(config.partials_dir, "partials");
        assert_eq!(config.intake_url, "https://example.com/intake-consent");
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        std::env::set_var("SITE_BASE_URL", "https://sra.example/");
        std::env::set_var("SITE_DEFAULT_LANGUAGE", "hebrew");
        std::env::set_var("SITE_SUPPORTED_LANGUAGES", "he, en, he");
        std::env::set_var("SITE_DEFAULT_THEME", "light");
        std::env::set_var("SITE_MESSAGE_URL", "https://wa.me/972500000000");

        let config = Config::from_env().unwrap();
        assert_eq!(config.base_url.as_str(), "https://sra.example/");
        assert_eq!(config.default_language, Language::Hebrew);
        assert_eq!(config.supported_languages, vec![Language::Hebrew, Language::English]);
        assert_eq!(config.default_theme, Theme::Light);
        assert_eq!(config.message_url, "https://wa.me/972500000000");
        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_default_outside_supported() {
        clear_env();
        std::env::set_var("SITE_DEFAULT_LANGUAGE", "he");
        std::env::set_var("SITE_SUPPORTED_LANGUAGES", "en");
        let err = Config::from_env().unwrap_err();
        assert!(err.to_string().contains("not in SITE_SUPPORTED_LANGUAGES"));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_bad_values() {
        clear_env();
        std::env::set_var("SITE_BASE_URL", "not a url");
        assert!(Config::from_env().is_err());
        clear_env();

        std::env::set_var("SITE_DEFAULT_LANGUAGE", "fr");
        assert!(Config::from_env().is_err());
        clear_env();

        std::env::set_var("SITE_DEFAULT_THEME", "sepia");
        assert!(Config::from_env().is_err());
        clear_env();
    }

    #[test]
    fn test_parse_language_list() {
        assert_eq!(parse_language_list("en").unwrap(), vec![Language::English]);
        assert!(parse_language_list(" , ").is_err());
        assert!(parse_language_list("en,xx").is_err());
    }
}
