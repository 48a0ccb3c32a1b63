//! Page controls: capability detection, mobile menu, theme class and CTA links.

use crate::document::Document;
use crate::estimator;
use crate::i18n::{I18N_ATTR, LANGUAGE_TOGGLE_IDS};
use crate::theme::{Theme, DARK_CLASS};

pub const MENU_BUTTON_ID: &str = "menuBtn";
pub const MOBILE_MENU_ID: &str = "mobileMenu";
pub const THEME_TOGGLE_ID: &str = "themeToggle";
pub const HIDDEN_CLASS: &str = "hidden";

/// CTAs that open a chat.
pub const MESSAGE_CTA_IDS: [&str; 5] = [
    "ctaMessageTop",
    "ctaMessageTopMobile",
    "ctaMessageHero",
    "ctaMessageBottom",
    // deep dives usually start with a conversation
    "ctaStartDeep",
];

/// CTAs that open the intake form.
pub const INTAKE_CTA_IDS: [&str; 4] = [
    "ctaStartHero",
    "ctaStartQuick",
    "ctaStartStandard",
    "ctaStartBottom",
];

/// What this page offers. Detected once, after the layout is mounted.
///
/// The sidebar needs no flag: its partial is only fetched into an existing mount.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PageCapabilities {
    pub mobile_menu: bool,
    pub theme_toggle: bool,
    pub language_toggle: bool,
    /// Some element carries a `data-i18n` key. Without one, literal mode
    /// switches language with no dictionary fetch.
    pub dictionary: bool,
    pub estimator: bool,
}

impl PageCapabilities {
    pub fn detect(doc: &Document) -> Self {
        let has = |id: &str| doc.find_by_id(id).is_some();
        Self {
            mobile_menu: has(MENU_BUTTON_ID) && has(MOBILE_MENU_ID),
            theme_toggle: has(THEME_TOGGLE_ID),
            language_toggle: LANGUAGE_TOGGLE_IDS.into_iter().any(|id| has(id)),
            dictionary: !doc.select_with_attrs(&[I18N_ATTR]).is_empty(),
            estimator: estimator::is_present(doc),
        }
    }
}

/// Flip the mobile menu's `hidden` class. Returns whether the menu is now
/// hidden, or `None` if the page has no mobile menu.
pub fn toggle_mobile_menu(doc: &mut Document) -> Option<bool> {
    doc.find_by_id(MENU_BUTTON_ID)?;
    let menu = doc.by_id_mut(MOBILE_MENU_ID)?;
    Some(menu.toggle_class(HIDDEN_CLASS))
}

/// Reflect `theme` in the root `dark` class.
pub fn apply_theme(doc: &mut Document, theme: Theme) {
    doc.root_mut().set_class(DARK_CLASS, theme.is_dark());
}

/// Destinations for the call-to-action links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CtaLinks {
    pub intake: String,
    pub message: String,
}

impl CtaLinks {
    /// Body `data-intake-url` / `data-message-url` win over the fallbacks.
    pub fn resolve(doc: &Document, intake_fallback: &str, message_fallback: &str) -> Self {
        Self {
            intake: body_url(doc, "data-intake-url", intake_fallback),
            message: body_url(doc, "data-message-url", message_fallback),
        }
    }
}

fn body_url(doc: &Document, attr: &str, fallback: &str) -> String {
    match doc.body().attr(attr) {
        Some(url) if !url.trim().is_empty() => url.to_string(),
        _ => fallback.to_string(),
    }
}

/// Point every CTA present on the page at its destination. Returns how many
/// links were set.
pub fn wire_ctas(doc: &mut Document, links: &CtaLinks) -> usize {
    let targets = MESSAGE_CTA_IDS
        .iter()
        .map(|id| (*id, links.message.as_str()))
        .chain(INTAKE_CTA_IDS.iter().map(|id| (*id, links.intake.as_str())));

    let mut wired = 0;
    for (id, url) in targets {
        if let Some(el) = doc.by_id_mut(id) {
            el.set_attr("href", url);
            wired += 1;
        }
    }
    wired
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r##"<html class="dark"><body data-message-url="https://wa.me/972501234567">
        <button id="menuBtn">☰</button>
        <div id="mobileMenu" class="hidden md:hidden"></div>
        <button id="themeToggle">◐</button>
        <a id="ctaMessageHero" href="#">Message</a>
        <a id="ctaStartQuick" href="#">Start</a>
        <a id="ctaStartDeep" href="#">Deep</a>
    </body></html>"##;

    #[test]
    fn test_detect_capabilities() {
        let caps = PageCapabilities::detect(&Document::parse(PAGE));
        assert!(caps.mobile_menu);
        assert!(caps.theme_toggle);
        assert!(!caps.language_toggle);
        assert!(!caps.dictionary);
        assert!(!caps.estimator);
    }

    #[test]
    fn test_detect_dictionary_keys() {
        let doc = Document::parse(
            r#"<button id="language-toggle"></button><h1 data-i18n="hero.title">Hi</h1>"#,
        );
        let caps = PageCapabilities::detect(&doc);
        assert!(caps.language_toggle);
        assert!(caps.dictionary);

        let literal = Document::parse(r#"<span data-en="Start" data-he="התחל">Start</span>"#);
        assert!(!PageCapabilities::detect(&literal).dictionary);
    }

    #[test]
    fn test_mobile_menu_needs_both_elements() {
        let doc = Document::parse(r#"<div id="mobileMenu"></div>"#);
        assert!(!PageCapabilities::detect(&doc).mobile_menu);
        let mut doc = doc;
        assert_eq!(toggle_mobile_menu(&mut doc), None);
    }

    #[test]
    fn test_toggle_mobile_menu() {
        let mut doc = Document::parse(PAGE);
        assert_eq!(toggle_mobile_menu(&mut doc), Some(false));
        assert!(doc.by_id(MOBILE_MENU_ID).unwrap().has_class("md:hidden"));
        assert_eq!(toggle_mobile_menu(&mut doc), Some(true));
    }

    #[test]
    fn test_apply_theme() {
        let mut doc = Document::parse(PAGE);
        apply_theme(&mut doc, Theme::Light);
        assert!(!doc.root().has_class(DARK_CLASS));
        apply_theme(&mut doc, Theme::Dark);
        assert!(doc.root().has_class(DARK_CLASS));
    }

    #[test]
    fn test_cta_links_prefer_body_attributes() {
        let doc = Document::parse(PAGE);
        let links = CtaLinks::resolve(&doc, "https://intake.example", "https://msg.example");
        assert_eq!(links.message, "https://wa.me/972501234567");
        assert_eq!(links.intake, "https://intake.example");
    }

    #[test]
    fn test_wire_ctas() {
        let mut doc = Document::parse(PAGE);
        let links = CtaLinks {
            intake: "https://intake.example".to_string(),
            message: "https://msg.example".to_string(),
        };
        assert_eq!(wire_ctas(&mut doc, &links), 3);
        assert_eq!(doc.by_id("ctaMessageHero").unwrap().attr("href"), Some("https://msg.example"));
        assert_eq!(doc.by_id("ctaStartQuick").unwrap().attr("href"), Some("https://intake.example"));
        assert_eq!(doc.by_id("ctaStartDeep").unwrap().attr("href"), Some("https://msg.example"));
    }
}
