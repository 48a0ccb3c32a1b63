//! Review effort estimator.
//!
//! Maps six numeric form inputs to an item count, an effort band and a package
//! recommendation. The heuristic is deliberately permissive: inputs are not
//! range-checked, negative or absurd values simply flow through the arithmetic.

use crate::document::Document;
use crate::i18n::{Language, LanguageStrings};
use tracing::debug;

/// Average weeks per month.
const WEEKS_PER_MONTH: f64 = 4.345;
/// Upper bound on the sampled share of comments.
const MAX_COMMENT_FRACTION: f64 = 0.35;
/// Upper bound on touchpoints per group/event.
const MAX_GROUP_TOUCHPOINTS: f64 = 12.0;
/// Items sampled per album.
const ITEMS_PER_ALBUM: i64 = 8;

const DEFAULT_TIMEFRAME_MONTHS: i64 = 12;

// ==================== Form Identifiers ====================

pub const FIELD_TIMEFRAME: &str = "timeframe";
pub const FIELD_POSTS_PER_WEEK: &str = "postsPerWeek";
pub const FIELD_TAGGED_PER_WEEK: &str = "taggedFreq";
pub const FIELD_COMMENTS_PER_POST: &str = "commentsPerPost";
pub const FIELD_GROUPS_EVENTS: &str = "groupsEvents";
pub const FIELD_ALBUMS: &str = "albums";

pub const INPUT_FIELDS: [&str; 6] = [
    FIELD_TIMEFRAME,
    FIELD_POSTS_PER_WEEK,
    FIELD_TAGGED_PER_WEEK,
    FIELD_COMMENTS_PER_POST,
    FIELD_GROUPS_EVENTS,
    FIELD_ALBUMS,
];

pub const OUTPUT_ITEMS: &str = "estItems";
pub const OUTPUT_EFFORT: &str = "estEffort";
pub const OUTPUT_PACKAGE: &str = "estPackage";

/// Ordinal review workload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EffortBand {
    Light,
    Moderate,
    Heavy,
    VeryHeavy,
}

/// Ordinal service tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Package {
    QuickCheck,
    StandardAudit,
    DeepDive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EstimatorInputs {
    pub timeframe_months: i64,
    pub posts_per_week: i64,
    pub tagged_per_week: i64,
    pub comments_per_post: i64,
    pub groups_events: i64,
    pub albums: i64,
}

impl Default for EstimatorInputs {
    fn default() -> Self {
        Self {
            timeframe_months: DEFAULT_TIMEFRAME_MONTHS,
            posts_per_week: 0,
            tagged_per_week: 0,
            comments_per_post: 0,
            groups_events: 0,
            albums: 0,
        }
    }
}

impl EstimatorInputs {
    /// Build inputs from raw field values keyed by field id.
    ///
    /// Missing or non-numeric values fall back to the defaults; fractional
    /// values are truncated.
    pub fn from_fields<'a>(field: impl Fn(&str) -> Option<&'a str>) -> Self {
        let defaults = Self::default();
        Self {
            timeframe_months: coerce(field(FIELD_TIMEFRAME), defaults.timeframe_months),
            posts_per_week: coerce(field(FIELD_POSTS_PER_WEEK), defaults.posts_per_week),
            tagged_per_week: coerce(field(FIELD_TAGGED_PER_WEEK), defaults.tagged_per_week),
            comments_per_post: coerce(field(FIELD_COMMENTS_PER_POST), defaults.comments_per_post),
            groups_events: coerce(field(FIELD_GROUPS_EVENTS), defaults.groups_events),
            albums: coerce(field(FIELD_ALBUMS), defaults.albums),
        }
    }

    /// Read the form fields' `value` attributes from the document.
    pub fn from_document(doc: &Document) -> Self {
        Self::from_fields(|id| doc.by_id(id).and_then(|el| el.attr("value")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EstimatorOutputs {
    pub weeks: i64,
    pub posts: i64,
    pub tagged_items: i64,
    pub comment_samples: i64,
    pub group_event_items: i64,
    pub album_items: i64,
    pub total: i64,
    pub effort: EffortBand,
    pub package: Package,
}

/// Run the estimate. Pure and deterministic.
pub fn estimate(inputs: &EstimatorInputs) -> EstimatorOutputs {
    let months = inputs.timeframe_months;

    let weeks = round_half_up(months as f64 * WEEKS_PER_MONTH).max(1);
    let posts = inputs.posts_per_week.saturating_mul(weeks);
    let tagged_items = inputs.tagged_per_week.saturating_mul(weeks);
    let comment_fraction = (inputs.comments_per_post as f64 / 100.0).min(MAX_COMMENT_FRACTION);
    let comment_samples = round_half_up(posts as f64 * comment_fraction);
    let touchpoints = (months as f64 / 2.0).min(MAX_GROUP_TOUCHPOINTS);
    let group_event_items = round_half_up(inputs.groups_events as f64 * touchpoints);
    let album_items = inputs.albums.saturating_mul(ITEMS_PER_ALBUM);

    // absurd inputs saturate instead of overflowing
    let total = [tagged_items, comment_samples, group_event_items, album_items]
        .into_iter()
        .fold(posts, i64::saturating_add);

    EstimatorOutputs {
        weeks,
        posts,
        tagged_items,
        comment_samples,
        group_event_items,
        album_items,
        total,
        effort: effort_band(total),
        package: recommend_package(months, total),
    }
}

/// Highest band whose threshold `total` crosses.
pub fn effort_band(total: i64) -> EffortBand {
    let mut band = EffortBand::Light;
    if total > 250 {
        band = EffortBand::Moderate;
    }
    if total > 700 {
        band = EffortBand::Heavy;
    }
    if total > 1500 {
        band = EffortBand::VeryHeavy;
    }
    band
}

/// Package tier; each rule can only raise the tier set before it.
pub fn recommend_package(months: i64, total: i64) -> Package {
    let mut package = Package::QuickCheck;
    if months >= 36 || total > 300 {
        package = Package::StandardAudit;
    }
    if months >= 120 || total > 900 {
        package = Package::DeepDive;
    }
    package
}

/// Write the outputs into the estimator's output elements.
///
/// Missing targets are skipped.
pub fn render(doc: &mut Document, outputs: &EstimatorOutputs, language: Language) {
    let strings = LanguageStrings::for_language(language);
    let values = [
        (OUTPUT_ITEMS, outputs.total.to_string()),
        (OUTPUT_EFFORT, strings.effort(outputs.effort).to_string()),
        (OUTPUT_PACKAGE, strings.package(outputs.package).to_string()),
    ];
    for (id, text) in values {
        match doc.find_by_id(id) {
            Some(node) => {
                doc.set_text(node, &text);
            }
            None => debug!("Estimator output #{} not on page", id),
        }
    }
}

/// Whether every estimator input field is on the page.
pub fn is_present(doc: &Document) -> bool {
    INPUT_FIELDS.iter().all(|id| doc.find_by_id(id).is_some())
}

/// Rounds halves toward positive infinity, matching the browser's `Math.round`.
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

fn coerce(raw: Option<&str>, default: i64) -> i64 {
    raw.map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .map(|v| v.trunc() as i64)
        .unwrap_or(default)
}
