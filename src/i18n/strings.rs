use crate::estimator::{EffortBand, Package};
use crate::i18n::Language;

/// Built-in strings the core writes itself (estimator output labels).
///
/// Page copy lives in the per-language dictionaries; these are only the
/// values computed at runtime.
#[derive(Debug, Clone)]
pub struct LanguageStrings {
    // ==================== Effort Bands ====================
    pub effort_light: &'static str,
    pub effort_moderate: &'static str,
    pub effort_heavy: &'static str,
    pub effort_very_heavy: &'static str,

    // ==================== Packages ====================
    pub package_quick_check: &'static str,
    pub package_standard_audit: &'static str,
    pub package_deep_dive: &'static str,
}

impl LanguageStrings {
    pub fn for_language(language: Language) -> &'static LanguageStrings {
        match language {
            Language::English => &ENGLISH_STRINGS,
            Language::Hebrew => &HEBREW_STRINGS,
        }
    }

    pub fn effort(&self, band: EffortBand) -> &'static str {
        match band {
            EffortBand::Light => self.effort_light,
            EffortBand::Moderate => self.effort_moderate,
            EffortBand::Heavy => self.effort_heavy,
            EffortBand::VeryHeavy => self.effort_very_heavy,
        }
    }

    pub fn package(&self, package: Package) -> &'static str {
        match package {
            Package::QuickCheck => self.package_quick_check,
            Package::StandardAudit => self.package_standard_audit,
            Package::DeepDive => self.package_deep_dive,
        }
    }
}

/// English strings (canonical)
pub const ENGLISH_STRINGS: LanguageStrings = LanguageStrings {
    effort_light: "Light",
    effort_moderate: "Moderate",
    effort_heavy: "Heavy",
    effort_very_heavy: "Very Heavy",

    package_quick_check: "Quick Check",
    package_standard_audit: "Standard Audit",
    package_deep_dive: "Deep Dive",
};

/// Hebrew strings
pub const HEBREW_STRINGS: LanguageStrings = LanguageStrings {
    effort_light: "קל",
    effort_moderate: "בינוני",
    effort_heavy: "כבד",
    effort_very_heavy: "כבד מאוד",

    package_quick_check: "בדיקה מהירה",
    package_standard_audit: "ביקורת סטנדרטית",
    package_deep_dive: "צלילה לעומק",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_labels_match_band_names() {
        let strings = LanguageStrings::for_language(Language::English);
        assert_eq!(strings.effort(EffortBand::VeryHeavy), "Very Heavy");
        assert_eq!(strings.package(Package::StandardAudit), "Standard Audit");
    }

    #[test]
    fn test_hebrew_labels_differ_from_english() {
        let en = LanguageStrings::for_language(Language::English);
        let he = LanguageStrings::for_language(Language::Hebrew);
        for band in [
            EffortBand::Light,
            EffortBand::Moderate,
            EffortBand::Heavy,
            EffortBand::VeryHeavy,
        ] {
            assert!(!he.effort(band).is_empty());
            assert_ne!(en.effort(band), he.effort(band));
        }
        for package in [Package::QuickCheck, Package::StandardAudit, Package::DeepDive] {
            assert_ne!(en.package(package), he.package(package));
        }
    }
}
