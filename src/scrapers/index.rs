//! Year index page scraper.
//!
//! Each archive year lists its episodes as `.episode-archive` entries. The
//! episode link is the anchor inside the entry's `h3` header, with a
//! site-relative `href` such as `/radio-archives/episode/1/new-beginnings`.
//!
//! Links are made absolute by prefixing the episode base verbatim, with no
//! normalisation, so `loc` values stay identical across runs and match
//! catalogs written by earlier versions of this tool.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use tracing::{debug, info, instrument};
use url::Url;

static ENTRY: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".episode-archive").expect("static selector"));
static HEADER: Lazy<Selector> = Lazy::new(|| Selector::parse("h3").expect("static selector"));
static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a").expect("static selector"));

/// Extract absolute episode URLs from one year's index page.
///
/// URLs come back in document order and are not deduplicated. Entries whose
/// header has no anchor, whose anchor has no `href`, or whose `href` is not
/// site-relative, are skipped.
///
/// # Arguments
///
/// * `html` - The index page markup
/// * `base` - The episode base URL every `href` is appended to
///
/// # Returns
///
/// Absolute episode URLs, one per matching entry.
#[instrument(level = "debug", skip_all)]
pub fn episode_locs_from_index(html: &str, base: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    let prefix = base.as_str().trim_end_matches('/');

    let mut locs = Vec::new();
    for entry in document.select(&ENTRY) {
        let Some(header) = entry.select(&HEADER).next() else {
            continue;
        };
        let Some(href) = header
            .select(&ANCHOR)
            .next()
            .and_then(|a| a.value().attr("href"))
        else {
            continue;
        };
        match episode_loc(prefix, href) {
            Some(loc) => locs.push(loc),
            None => debug!(%href, "Skipping off-site episode link"),
        }
    }

    info!(count = locs.len(), "Indexed episode URLs");
    locs
}

/// `prefix` + `href`, for root-relative hrefs only. Absolute and
/// protocol-relative links would leave the site and yield `None`.
fn episode_loc(prefix: &str, href: &str) -> Option<String> {
    if !href.starts_with('/') || href.starts_with("//") {
        return None;
    }
    Some(format!("{prefix}{href}"))
}
