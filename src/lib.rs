//! Client-side behaviour of the SRA bilingual site: language switching,
//! persisted preferences, layout partials, page controls and the review
//! effort estimator, running against an in-memory document.

pub mod config;
pub mod controls;
pub mod document;
pub mod estimator;
pub mod fetch;
pub mod i18n;
pub mod layout;
pub mod prefs;
pub mod site;
pub mod theme;
