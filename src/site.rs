//! The site context: one object per page that owns every piece of state the
//! behaviour needs and routes user interactions to it.

use crate::config::Config;
use crate::controls::{self, CtaLinks, PageCapabilities};
use crate::document::Document;
use crate::estimator::{self, EstimatorInputs, EstimatorOutputs};
use crate::fetch::ResourceFetcher;
use crate::i18n::{Language, SwitchOutcome, TranslationApplier};
use crate::layout::{self, MountReport};
use crate::prefs::PreferenceStore;
use crate::theme::Theme;
use tracing::{debug, info};

pub struct Site {
    config: Config,
    fetcher: ResourceFetcher,
    prefs: PreferenceStore,
    applier: TranslationApplier,
    theme: Theme,
    /// The visitor has chosen a theme, here or on an earlier page.
    theme_saved: bool,
    document: Document,
    capabilities: PageCapabilities,
}

impl Site {
    /// Build the context for `document`, reading the saved language and theme.
    pub fn new(config: Config, mut prefs: PreferenceStore, document: Document) -> Self {
        let language = prefs.language(config.default_language, &config.supported_languages);
        let saved_theme = prefs.saved_theme();
        let applier = TranslationApplier::new(
            language,
            config.supported_languages.clone(),
            &config.dictionary_dir,
        );
        let fetcher = ResourceFetcher::new(config.base_url.clone());

        Self {
            theme: saved_theme.unwrap_or(config.default_theme),
            theme_saved: saved_theme.is_some(),
            config,
            fetcher,
            prefs,
            applier,
            document,
            capabilities: PageCapabilities::default(),
        }
    }

    /// Page load: mount the layout, detect capabilities, apply theme, CTA
    /// links and translations, then run the estimator if the page has one.
    ///
    /// The `dark` class is only touched on pages with a theme toggle or once
    /// the visitor has saved a theme. Pages without dictionary keys never
    /// fetch a dictionary.
    pub async fn boot(&mut self) -> MountReport {
        let report =
            layout::mount_layout(&self.fetcher, &self.config.partials_dir, &mut self.document)
                .await;

        self.capabilities = PageCapabilities::detect(&self.document);
        debug!("Page capabilities: {:?}", self.capabilities);

        if self.capabilities.theme_toggle || self.theme_saved {
            controls::apply_theme(&mut self.document, self.theme);
        }

        let links = CtaLinks::resolve(
            &self.document,
            &self.config.intake_url,
            &self.config.message_url,
        );
        controls::wire_ctas(&mut self.document, &links);

        if self.capabilities.dictionary {
            self.applier.init(&self.fetcher, &mut self.document).await;
        } else {
            self.applier.apply(&mut self.document);
        }
        self.recalculate();

        info!(
            "Page ready: language={}, theme={}",
            self.applier.current(),
            self.theme
        );
        report
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn capabilities(&self) -> PageCapabilities {
        self.capabilities
    }

    pub fn language(&self) -> Language {
        self.applier.current()
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn applier(&self) -> &TranslationApplier {
        &self.applier
    }

    pub fn preferences(&mut self) -> &mut PreferenceStore {
        &mut self.prefs
    }

    // ==================== Interactions ====================

    /// Switch language and re-render, including estimator labels.
    ///
    /// Pages without dictionary keys switch in literal mode, without a fetch.
    pub async fn set_language(&mut self, language: Language) -> SwitchOutcome {
        let outcome = if self.capabilities.dictionary {
            self.applier
                .set_language(language, &self.fetcher, &mut self.prefs, &mut self.document)
                .await
        } else {
            self.applier
                .set_language_literal(language, &mut self.prefs, &mut self.document)
        };
        if outcome == SwitchOutcome::Applied {
            self.recalculate();
        }
        outcome
    }

    /// The language toggle: flips relative to the most recent request, so a
    /// second click while a load is in flight cancels it.
    pub async fn toggle_language(&mut self) -> SwitchOutcome {
        if !self.capabilities.language_toggle {
            return SwitchOutcome::Ignored;
        }
        let target = self.applier.requested().toggled();
        self.set_language(target).await
    }

    /// Flip and persist the theme. `None` on pages without a theme toggle.
    pub fn toggle_theme(&mut self) -> Option<Theme> {
        if !self.capabilities.theme_toggle {
            return None;
        }
        self.theme = self.theme.toggled();
        self.theme_saved = true;
        self.prefs.set_theme(self.theme);
        controls::apply_theme(&mut self.document, self.theme);
        Some(self.theme)
    }

    pub fn toggle_mobile_menu(&mut self) -> Option<bool> {
        if !self.capabilities.mobile_menu {
            return None;
        }
        controls::toggle_mobile_menu(&mut self.document)
    }

    /// An estimator field changed: store the new value and recompute.
    pub fn set_estimator_field(&mut self, field: &str, value: &str) -> Option<EstimatorOutputs> {
        if !self.capabilities.estimator {
            return None;
        }
        self.document.by_id_mut(field)?.set_attr("value", value);
        self.recalculate()
    }

    /// Recompute and render the estimate from the current field values.
    pub fn recalculate(&mut self) -> Option<EstimatorOutputs> {
        if !self.capabilities.estimator {
            return None;
        }
        let inputs = EstimatorInputs::from_document(&self.document);
        let outputs = estimator::estimate(&inputs);
        estimator::render(&mut self.document, &outputs, self.applier.current());
        Some(outputs)
    }
}
