//! Run the review effort estimator from the command line.
//!
//! Usage:
//!   estimate timeframe=36 postsPerWeek=10 taggedFreq=5 commentsPerPost=50 groupsEvents=5 albums=10
//!   estimate --lang he timeframe=12
//!
//! Missing or non-numeric fields use the same defaults as the site form.

use anyhow::{Context, Result};
use sra_site::estimator::{estimate, EstimatorInputs, INPUT_FIELDS};
use sra_site::i18n::{Language, LanguageStrings};
use std::collections::HashMap;
use tracing::warn;

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sra_site=info".parse()?),
        )
        .init();

    let mut language = Language::canonical();
    let mut fields: HashMap<String, String> = HashMap::new();

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--lang" {
            let raw = args.next().context("--lang needs a value")?;
            language = raw.parse().context("Unknown language for --lang")?;
            continue;
        }
        match arg.split_once('=') {
            Some((key, value)) if INPUT_FIELDS.contains(&key) => {
                fields.insert(key.to_string(), value.to_string());
            }
            _ => warn!("Ignoring argument '{}'", arg),
        }
    }

    let inputs = EstimatorInputs::from_fields(|id| fields.get(id).map(String::as_str));
    let out = estimate(&inputs);
    let strings = LanguageStrings::for_language(language);

    println!("weeks:              {}", out.weeks);
    println!("posts:              {}", out.posts);
    println!("tagged items:       {}", out.tagged_items);
    println!("comment samples:    {}", out.comment_samples);
    println!("group/event items:  {}", out.group_event_items);
    println!("album items:        {}", out.album_items);
    println!("total:              {}", out.total);
    println!("effort:             {}", strings.effort(out.effort));
    println!("package:            {}", strings.package(out.package));

    Ok(())
}
