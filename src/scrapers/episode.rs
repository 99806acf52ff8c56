//! Episode page scraper.

use crate::dates::parse_air_date;
use crate::error::ScrapeError;
use crate::models::Episode;
use crate::scrapers::first_text;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::collections::BTreeSet;
use tracing::{debug, instrument};

static TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".node-title").expect("static selector"));
static DATE: Lazy<Selector> = Lazy::new(|| Selector::parse(".date").expect("static selector"));
static TAG_LINKS: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".tags a").expect("static selector"));

/// Build an [`Episode`] from the page at `loc`.
///
/// - `name`: first text under the first `.node-title`
/// - `date`: first text under the first `.date`, as `"Mon D, YYYY"`
/// - `tags`: text of every `a` under any `.tags` group, lowercased, sorted,
///   deduplicated
///
/// # Errors
///
/// [`ScrapeError::MissingField`] if the title or date marker is absent or has
/// no text, or any date parsing error from [`parse_air_date`].
#[instrument(level = "debug", skip(html))]
pub fn scrape_episode(loc: &str, html: &str) -> Result<Episode, ScrapeError> {
    let document = Html::parse_document(html);

    let name = document
        .select(&TITLE)
        .next()
        .and_then(first_text)
        .ok_or(ScrapeError::MissingField("node-title"))?;

    let date_text = document
        .select(&DATE)
        .next()
        .and_then(first_text)
        .ok_or(ScrapeError::MissingField("date"))?;
    let date = parse_air_date(&date_text)?;

    // An anchor nested in two `.tags` groups matches once; repeats across
    // groups collapse in the set.
    let tags: BTreeSet<String> = document
        .select(&TAG_LINKS)
        .filter_map(first_text)
        .map(|t| t.to_lowercase())
        .collect();

    debug!(%name, %date, tags = tags.len(), "Parsed episode");
    Ok(Episode {
        name,
        date,
        tags: tags.into_iter().collect(),
        loc: loc.to_string(),
    })
}
