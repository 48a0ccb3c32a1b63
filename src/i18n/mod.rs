//! Internationalization (i18n) for the bilingual site.
//!
//! # Architecture
//!
//! - `registry`: Immutable metadata for every known language
//! - `language`: The canonical `Language` type and legacy-value normalisation
//! - `dictionary`: Per-language key-path dictionaries
//! - `applier`: Loads dictionaries and renders them into the document
//! - `strings`: Built-in labels for values computed at runtime
//!
//! # Example
//!
//! ```rust,ignore
//! use sra_site::i18n::{Language, TranslationApplier};
//!
//! let mut applier = TranslationApplier::new(Language::English, supported, "i18n");
//! applier.init(&fetcher, &mut doc).await;
//! applier.set_language(Language::Hebrew, &fetcher, &mut prefs, &mut doc).await;
//! ```

mod applier;
mod dictionary;
mod language;
mod registry;
mod strings;

pub use applier::{
    DictionaryError, LoadTicket, SwitchOutcome, TranslationApplier, ENGLISH_MODE_CLASS,
    HEBREW_MODE_CLASS, I18N_ATTR, LANGUAGE_TOGGLE_IDS, LITERAL_EN_ATTR, LITERAL_HE_ATTR,
};
pub use dictionary::Dictionary;
pub use language::{Language, UnknownLanguage};
pub use registry::{LanguageConfig, LanguageRegistry, TextDirection};
pub use strings::LanguageStrings;
