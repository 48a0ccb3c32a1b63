//! Shared header/footer/sidebar partials injected into each page.

use crate::document::Document;
use crate::fetch::ResourceFetcher;
use tracing::{debug, warn};

pub const HEADER_MOUNT: &str = "sra-header";
pub const FOOTER_MOUNT: &str = "sra-footer";
pub const SIDEBAR_MOUNT: &str = "sra-sidebar";

/// A partial and the element it is injected into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partial {
    pub mount: &'static str,
    pub file: &'static str,
}

pub const PARTIALS: [Partial; 3] = [
    Partial {
        mount: HEADER_MOUNT,
        file: "header.html",
    },
    Partial {
        mount: FOOTER_MOUNT,
        file: "footer.html",
    },
    Partial {
        mount: SIDEBAR_MOUNT,
        file: "sidebar.html",
    },
];

/// Per-mount result of [`mount_layout`].
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MountReport {
    pub mounted: Vec<&'static str>,
    /// Mount point not on this page; nothing fetched.
    pub skipped: Vec<&'static str>,
    /// Fetch failed; the mount keeps its previous content.
    pub failed: Vec<&'static str>,
}

/// Fetch each partial in turn and inject it into its mount point.
///
/// Pages without a mount point skip that partial. There are no retries.
pub async fn mount_layout(
    fetcher: &ResourceFetcher,
    partials_dir: &str,
    doc: &mut Document,
) -> MountReport {
    let mut report = MountReport::default();
    let dir = partials_dir.trim_end_matches('/');

    for partial in PARTIALS {
        if doc.find_by_id(partial.mount).is_none() {
            report.skipped.push(partial.mount);
            continue;
        }

        let path = if dir.is_empty() {
            partial.file.to_string()
        } else {
            format!("{}/{}", dir, partial.file)
        };

        match fetcher.fetch_text(&path).await {
            Ok(html) => {
                // re-resolve: the mount may have been replaced by an earlier partial
                let Some(mount) = doc.find_by_id(partial.mount) else {
                    report.skipped.push(partial.mount);
                    continue;
                };
                let inserted = doc.set_inner_html(mount, &html);
                debug!("Mounted {} into #{} ({} elements)", path, partial.mount, inserted);
                report.mounted.push(partial.mount);
            }
            Err(e) => {
                warn!("Could not load partial {}: {}", path, e);
                report.failed.push(partial.mount);
            }
        }
    }

    report
}
