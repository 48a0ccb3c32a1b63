//! Translation applier: loads dictionaries and writes localized text into the
//! document.
//!
//! A language switch is split in two synchronous halves around the fetch:
//! [`TranslationApplier::request`] hands out a [`LoadTicket`] and
//! [`TranslationApplier::commit`] applies the fetched dictionary only if that
//! ticket is still the most recent request. A slow load that was superseded
//! by a later toggle is therefore dropped instead of overwriting the newer
//! selection.

use crate::document::Document;
use crate::fetch::{FetchError, ResourceFetcher};
use crate::i18n::{Dictionary, Language};
use crate::prefs::PreferenceStore;
use tracing::{debug, info, warn};

/// Attribute holding a dictionary key path.
pub const I18N_ATTR: &str = "data-i18n";
/// Literal-mode attribute holding the English text.
pub const LITERAL_EN_ATTR: &str = "data-en";
/// Literal-mode attribute holding the Hebrew text.
pub const LITERAL_HE_ATTR: &str = "data-he";

/// Desktop and mobile language switches.
pub const LANGUAGE_TOGGLE_IDS: [&str; 2] = ["language-toggle", "language-toggle-mobile"];
pub const HEBREW_MODE_CLASS: &str = "hebrew-mode";
pub const ENGLISH_MODE_CLASS: &str = "english-mode";

#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    #[error("failed to fetch dictionary: {0}")]
    Fetch(#[from] FetchError),

    #[error("dictionary is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Proof of a pending language switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub language: Language,
    generation: u64,
}

/// What happened to a language switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// The new dictionary is active and the document was re-rendered.
    Applied,
    /// Unsupported, already active, or already loading. Nothing changed.
    Ignored,
    /// A newer request replaced this one before it finished. Result dropped.
    Superseded,
    /// The dictionary could not be loaded. Prior state kept.
    Failed,
}

pub struct TranslationApplier {
    supported: Vec<Language>,
    dictionary_dir: String,
    current: Language,
    dictionary: Dictionary,
    /// The active dictionary came from a successful fetch.
    loaded: bool,
    generation: u64,
    pending: Option<LoadTicket>,
}

impl TranslationApplier {
    /// Create an applier showing `current` with an empty dictionary.
    ///
    /// `current` should come from the preference store, which already
    /// restricts it to `supported`.
    pub fn new(current: Language, supported: Vec<Language>, dictionary_dir: &str) -> Self {
        Self {
            supported,
            dictionary_dir: dictionary_dir.trim_end_matches('/').to_string(),
            current,
            dictionary: Dictionary::empty(),
            loaded: false,
            generation: 0,
            pending: None,
        }
    }

    pub fn current(&self) -> Language {
        self.current
    }

    /// The language the visitor last asked for: pending if a load is in
    /// flight, otherwise the active one.
    pub fn requested(&self) -> Language {
        self.pending.map(|t| t.language).unwrap_or(self.current)
    }

    pub fn pending(&self) -> Option<LoadTicket> {
        self.pending
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    pub fn is_supported(&self, language: Language) -> bool {
        self.supported.contains(&language)
    }

    /// Resource path of the dictionary for `language`, relative to the site base.
    pub fn dictionary_path(&self, language: Language) -> String {
        if self.dictionary_dir.is_empty() {
            format!("{}.json", language.code())
        } else {
            format!("{}/{}.json", self.dictionary_dir, language.code())
        }
    }

    /// Resolve a key path against the loaded dictionary.
    pub fn get(&self, path: &str) -> Option<String> {
        self.dictionary.text(path)
    }

    /// Fetch and parse a dictionary. Does not touch applier state.
    pub async fn fetch_dictionary(
        fetcher: &ResourceFetcher,
        path: &str,
    ) -> Result<Dictionary, DictionaryError> {
        let raw = fetcher.fetch_text(path).await?;
        Ok(Dictionary::from_json(&raw)?)
    }

    /// Load the dictionary for `language` and make it active.
    ///
    /// On failure the previous dictionary and language are kept.
    pub async fn load(&mut self, fetcher: &ResourceFetcher, language: Language) -> bool {
        let path = self.dictionary_path(language);
        match Self::fetch_dictionary(fetcher, &path).await {
            Ok(dictionary) => {
                self.dictionary = dictionary;
                self.loaded = true;
                self.current = language;
                true
            }
            Err(e) => {
                warn!("Keeping {} dictionary, {} load failed: {}", self.current, language, e);
                false
            }
        }
    }

    /// Initial render: load the active language's dictionary and apply.
    ///
    /// `lang`/`dir` and literal-mode text are applied even if the load fails.
    pub async fn init(&mut self, fetcher: &ResourceFetcher, doc: &mut Document) {
        let language = self.current;
        self.load(fetcher, language).await;
        self.apply(doc);
    }

    /// Start a switch to `language`.
    ///
    /// Returns `None` when there is nothing to load: the language is not
    /// offered, it is already loading, or it is already active with its
    /// dictionary loaded. Asking for the active language while another load
    /// is in flight cancels that load; asking for it after its dictionary
    /// failed to load retries the fetch.
    pub fn request(&mut self, language: Language) -> Option<LoadTicket> {
        if !self.is_supported(language) {
            debug!("Ignoring switch to unsupported language {}", language);
            return None;
        }
        if self.pending.map(|t| t.language) == Some(language) {
            return None;
        }
        if language == self.current {
            if self.pending.take().is_some() {
                self.generation += 1;
                debug!("Switch back to {} cancels the pending load", language);
                return None;
            }
            if self.loaded {
                return None;
            }
            debug!("Retrying the {} dictionary", language);
        }

        self.generation += 1;
        let ticket = LoadTicket {
            language,
            generation: self.generation,
        };
        self.pending = Some(ticket);
        Some(ticket)
    }

    /// Finish a switch started by [`request`](Self::request).
    ///
    /// On success the language is persisted, the dictionary replaced and the
    /// document re-rendered.
    pub fn commit(
        &mut self,
        ticket: LoadTicket,
        result: Result<Dictionary, DictionaryError>,
        prefs: &mut PreferenceStore,
        doc: &mut Document,
    ) -> SwitchOutcome {
        if self.pending != Some(ticket) {
            debug!("Dropping stale {} dictionary", ticket.language);
            return SwitchOutcome::Superseded;
        }
        self.pending = None;

        match result {
            Ok(dictionary) => {
                self.current = ticket.language;
                self.dictionary = dictionary;
                self.loaded = true;
                prefs.set_language(ticket.language);
                self.apply(doc);
                info!("Language switched to {}", ticket.language);
                SwitchOutcome::Applied
            }
            Err(e) => {
                warn!("Staying on {}, {} load failed: {}", self.current, ticket.language, e);
                SwitchOutcome::Failed
            }
        }
    }

    /// Switch to `language`: request, fetch, commit.
    pub async fn set_language(
        &mut self,
        language: Language,
        fetcher: &ResourceFetcher,
        prefs: &mut PreferenceStore,
        doc: &mut Document,
    ) -> SwitchOutcome {
        let Some(ticket) = self.request(language) else {
            return SwitchOutcome::Ignored;
        };
        let path = self.dictionary_path(language);
        let result = Self::fetch_dictionary(fetcher, &path).await;
        self.commit(ticket, result, prefs, doc)
    }

    /// Switch on a page without dictionary keys.
    ///
    /// Literal mode needs no fetch, so the switch applies at once: the
    /// language is persisted and the document re-rendered. Any in-flight
    /// load is dropped.
    pub fn set_language_literal(
        &mut self,
        language: Language,
        prefs: &mut PreferenceStore,
        doc: &mut Document,
    ) -> SwitchOutcome {
        if !self.is_supported(language) {
            debug!("Ignoring switch to unsupported language {}", language);
            return SwitchOutcome::Ignored;
        }
        if language == self.current && self.pending.is_none() {
            return SwitchOutcome::Ignored;
        }
        if self.pending.take().is_some() {
            self.generation += 1;
        }
        if language != self.current {
            self.dictionary = Dictionary::empty();
            self.loaded = false;
            self.current = language;
        }

        prefs.set_language(language);
        self.apply(doc);
        info!("Language switched to {} (literal mode)", language);
        SwitchOutcome::Applied
    }

    /// Render the active language into the document.
    ///
    /// Literal-mode elements are written first, then dictionary keys; an
    /// element carrying both ends up with the dictionary text when the key
    /// resolves. Replacing text discards any nested markup in the element.
    /// Unresolved keys leave the element untouched.
    pub fn apply(&self, doc: &mut Document) {
        let language = self.current;
        let hebrew = language == Language::Hebrew;

        let root = doc.root_mut();
        root.set_attr("lang", language.code());
        root.set_attr("dir", language.direction().as_attr());

        let body = doc.body_mut();
        body.set_class(HEBREW_MODE_CLASS, hebrew);
        body.set_class(ENGLISH_MODE_CLASS, !hebrew);

        for id in LANGUAGE_TOGGLE_IDS {
            if let Some(toggle) = doc.by_id_mut(id) {
                toggle.set_attr("aria-checked", if hebrew { "true" } else { "false" });
            }
        }

        let literal_attr = if hebrew { LITERAL_HE_ATTR } else { LITERAL_EN_ATTR };
        for node in doc.select_with_attrs(&[LITERAL_EN_ATTR, LITERAL_HE_ATTR]) {
            let text = doc
                .get(node)
                .and_then(|el| el.attr(literal_attr))
                .map(str::to_string);
            if let Some(text) = text {
                doc.set_text(node, &text);
            }
        }

        for node in doc.select_with_attrs(&[I18N_ATTR]) {
            let value = doc
                .get(node)
                .and_then(|el| el.attr(I18N_ATTR))
                .and_then(|key| self.dictionary.text(key));
            if let Some(value) = value {
                doc.set_text(node, &value);
            }
        }
    }
}
