//! Render a page the way a visitor's browser would: mount the layout,
//! restore preferences, translate, and run the estimator.
//!
//! Usage:
//!   sra-site <page.html> [en|he]
//!
//! Resources are fetched from SITE_BASE_URL (see `Config::from_env`).

use anyhow::{bail, Context, Result};
use sra_site::config::Config;
use sra_site::document::Document;
use sra_site::estimator::{OUTPUT_EFFORT, OUTPUT_ITEMS, OUTPUT_PACKAGE};
use sra_site::i18n::{Language, I18N_ATTR};
use sra_site::prefs::PreferenceStore;
use sra_site::site::Site;
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sra_site=info".parse()?),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let Some(page_path) = args.next() else {
        bail!("Usage: sra-site <page.html> [en|he]");
    };
    let requested = args
        .next()
        .map(|raw| raw.parse::<Language>())
        .transpose()
        .context("Unknown language argument")?;

    let config = Config::from_env()?;
    let html = std::fs::read_to_string(&page_path)
        .with_context(|| format!("Failed to read page {}", page_path))?;

    let prefs = PreferenceStore::file(&config.preferences_file);
    let mut site = Site::new(config, prefs, Document::parse(&html));

    let report = site.boot().await;
    info!(
        "Layout: mounted {:?}, skipped {:?}, failed {:?}",
        report.mounted, report.skipped, report.failed
    );

    if let Some(language) = requested {
        let outcome = site.set_language(language).await;
        info!("Switch to {}: {:?}", language, outcome);
    }

    print_summary(&site);
    Ok(())
}

fn print_summary(site: &Site) {
    let doc = site.document();
    let language = site.language();
    println!(
        "language={} ({}) lang={} dir={} theme={}",
        language.name(),
        language.native_name(),
        doc.root().attr("lang").unwrap_or("-"),
        doc.root().attr("dir").unwrap_or("-"),
        site.theme()
    );
    println!("capabilities: {:?}", site.capabilities());

    for node in doc.select_with_attrs(&[I18N_ATTR]) {
        if let Some(el) = doc.get(node) {
            println!("  [{}] {}", el.attr(I18N_ATTR).unwrap_or(""), el.text());
        }
    }

    if site.capabilities().estimator {
        for id in [OUTPUT_ITEMS, OUTPUT_EFFORT, OUTPUT_PACKAGE] {
            if let Some(el) = doc.by_id(id) {
                println!("  #{} {}", id, el.text());
            }
        }
    }
}
