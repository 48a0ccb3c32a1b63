//! Persisted visitor preferences (language and theme).
//!
//! Values live behind a [`KeyValueStore`]. When the backing store fails the
//! preference store keeps serving from memory for the rest of the session.

use crate::i18n::Language;
use crate::theme::Theme;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Canonical key for the language preference.
pub const LANGUAGE_KEY: &str = "language";
/// Canonical key for the theme preference.
pub const THEME_KEY: &str = "theme";
/// Key an earlier loader mirrored the language code under. Read-only.
pub const LEGACY_LANGUAGE_KEY: &str = "sra_lang";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("preference store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("preference file is not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// String-keyed, string-valued persistence layer.
pub trait KeyValueStore: Send {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Non-persistent store. Also what every store degrades to.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PreferenceFile {
    #[serde(default)]
    values: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    updated_at: Option<DateTime<Utc>>,
}

/// JSON file store. The whole file is rewritten on every write.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<PreferenceFile, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(PreferenceFile::default()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(PreferenceFile::default()),
            Err(e) => Err(e.into()),
        }
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.load()?.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut file = self.load()?;
        file.values.insert(key.to_string(), value.to_string());
        file.updated_at = Some(Utc::now());
        let raw = serde_json::to_string_pretty(&file)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }
}

/// Preference store with in-memory fallback.
///
/// Every successful `set` is also mirrored in memory, so a store that fails
/// later still answers with the latest values.
pub struct PreferenceStore {
    backend: Option<Box<dyn KeyValueStore>>,
    memory: MemoryStore,
}

impl PreferenceStore {
    pub fn new(backend: Box<dyn KeyValueStore>) -> Self {
        Self {
            backend: Some(backend),
            memory: MemoryStore::default(),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            backend: None,
            memory: MemoryStore::default(),
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(Box::new(FileStore::new(path)))
    }

    /// Whether values still reach the persistence layer.
    pub fn is_persistent(&self) -> bool {
        self.backend.is_some()
    }

    /// Stored value for `key`, or `default` when absent.
    pub fn get(&mut self, key: &str, default: &str) -> String {
        self.lookup(key).unwrap_or_else(|| default.to_string())
    }

    /// Overwrite `key`. Never fails; a broken backend is dropped.
    pub fn set(&mut self, key: &str, value: &str) {
        // MemoryStore::write is infallible
        let _ = self.memory.write(key, value);
        if let Some(backend) = self.backend.as_mut() {
            if let Err(e) = backend.write(key, value) {
                warn!("Preference store unavailable, continuing in memory: {}", e);
                self.backend = None;
            }
        }
    }

    fn lookup(&mut self, key: &str) -> Option<String> {
        if let Ok(Some(value)) = self.memory.read(key) {
            return Some(value);
        }
        let backend = self.backend.as_ref()?;
        match backend.read(key) {
            Ok(value) => value,
            Err(e) => {
                warn!("Preference store unavailable, continuing in memory: {}", e);
                self.backend = None;
                None
            }
        }
    }

    // ==================== Typed Preferences ====================

    /// Saved language, normalised.
    ///
    /// Legacy spellings (`hebrew`) and the legacy `sra_lang` key are honoured.
    /// Anything outside `supported` yields `default`.
    pub fn language(&mut self, default: Language, supported: &[Language]) -> Language {
        let raw = self
            .lookup(LANGUAGE_KEY)
            .or_else(|| self.lookup(LEGACY_LANGUAGE_KEY));

        match raw.as_deref().and_then(Language::normalize) {
            Some(lang) if supported.contains(&lang) => lang,
            Some(lang) => {
                debug!("Saved language {} is not offered here, using {}", lang, default);
                default
            }
            None => default,
        }
    }

    pub fn set_language(&mut self, language: Language) {
        self.set(LANGUAGE_KEY, language.code());
    }

    /// The saved theme, if the visitor ever chose one.
    pub fn saved_theme(&mut self) -> Option<Theme> {
        self.lookup(THEME_KEY).and_then(|raw| raw.parse().ok())
    }

    pub fn theme(&mut self, default: Theme) -> Theme {
        self.saved_theme().unwrap_or(default)
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.set(THEME_KEY, theme.code());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const BOTH: &[Language] = &[Language::English, Language::Hebrew];

    /// Store whose every operation fails, like a browser with storage disabled.
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn read(&self, _key: &str) -> Result<Option<String>, StoreError> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into())
        }

        fn write(&mut self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into())
        }
    }

    // ==================== get/set Tests ====================

    #[test]
    fn test_get_returns_default_when_absent() {
        let mut store = PreferenceStore::in_memory();
        assert_eq!(store.get("theme", "dark"), "dark");
    }

    #[test]
    fn test_set_then_get() {
        let mut store = PreferenceStore::in_memory();
        store.set("theme", "light");
        assert_eq!(store.get("theme", "dark"), "light");
        store.set("theme", "dark");
        assert_eq!(store.get("theme", "light"), "dark");
    }

    #[test]
    fn test_file_store_survives_new_session() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");

        let mut first = PreferenceStore::file(&path);
        first.set_language(Language::Hebrew);
        first.set_theme(Theme::Light);

        let mut second = PreferenceStore::file(&path);
        assert_eq!(second.language(Language::English, BOTH), Language::Hebrew);
        assert_eq!(second.theme(Theme::Dark), Theme::Light);

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"language\": \"he\""));
        assert!(raw.contains("updated_at"));
    }

    #[test]
    fn test_missing_file_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let mut store = PreferenceStore::file(dir.path().join("nope.json"));
        assert_eq!(store.get("language", "en"), "en");
        assert!(store.is_persistent());
    }

    // ==================== Degradation Tests ====================

    #[test]
    fn test_broken_backend_degrades_to_memory() {
        let mut store = PreferenceStore::new(Box::new(BrokenStore));
        assert_eq!(store.get("theme", "dark"), "dark");
        assert!(!store.is_persistent());

        store.set("theme", "light");
        assert_eq!(store.get("theme", "dark"), "light");
    }

    #[test]
    fn test_unwritable_path_degrades_to_memory() {
        let dir = TempDir::new().unwrap();
        let mut store = PreferenceStore::file(dir.path().join("missing-dir").join("prefs.json"));

        store.set_language(Language::Hebrew);
        assert!(!store.is_persistent());
        assert_eq!(store.language(Language::English, BOTH), Language::Hebrew);
    }

    #[test]
    fn test_corrupt_file_degrades_to_memory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "{ not json").unwrap();

        let mut store = PreferenceStore::file(&path);
        assert_eq!(store.theme(Theme::Dark), Theme::Dark);
        assert!(!store.is_persistent());
    }

    // ==================== Normalisation Tests ====================

    #[test]
    fn test_legacy_language_value() {
        let mut store = PreferenceStore::in_memory();
        store.set(LANGUAGE_KEY, "hebrew");
        assert_eq!(store.language(Language::English, BOTH), Language::Hebrew);
    }

    #[test]
    fn test_legacy_language_key() {
        let mut store = PreferenceStore::in_memory();
        store.set(LEGACY_LANGUAGE_KEY, "he");
        assert_eq!(store.language(Language::English, BOTH), Language::Hebrew);
    }

    #[test]
    fn test_canonical_key_wins_over_legacy_key() {
        let mut store = PreferenceStore::in_memory();
        store.set(LEGACY_LANGUAGE_KEY, "he");
        store.set(LANGUAGE_KEY, "english");
        assert_eq!(store.language(Language::Hebrew, BOTH), Language::English);
    }

    #[test]
    fn test_invalid_or_unsupported_language_falls_back() {
        let mut store = PreferenceStore::in_memory();
        store.set(LANGUAGE_KEY, "klingon");
        assert_eq!(store.language(Language::English, BOTH), Language::English);

        store.set(LANGUAGE_KEY, "he");
        assert_eq!(
            store.language(Language::English, &[Language::English]),
            Language::English
        );
    }

    #[test]
    fn test_set_language_writes_canonical_code() {
        let mut store = PreferenceStore::in_memory();
        store.set_language(Language::Hebrew);
        assert_eq!(store.get(LANGUAGE_KEY, ""), "he");
    }

    #[test]
    fn test_invalid_theme_falls_back() {
        let mut store = PreferenceStore::in_memory();
        store.set(THEME_KEY, "sepia");
        assert_eq!(store.theme(Theme::Dark), Theme::Dark);
        assert_eq!(store.saved_theme(), None);
    }

    #[test]
    fn test_saved_theme() {
        let mut store = PreferenceStore::in_memory();
        assert_eq!(store.saved_theme(), None);
        store.set_theme(Theme::Light);
        assert_eq!(store.saved_theme(), Some(Theme::Light));
        assert_eq!(store.theme(Theme::Dark), Theme::Light);
    }
}
