//! Scrapers for the radio archive's two page types.
//!
//! The site's markup is fixed, so both scrapers are driven by a handful of
//! CSS class markers:
//!
//! | Page | Module | Markers |
//! |------|--------|---------|
//! | Year index | [`index`] | `.episode-archive` > `h3` > `a[href]` |
//! | Episode | [`episode`] | `.node-title`, `.date`, `.tags a` |
//!
//! Index scraping never fails: entries that do not match are skipped.
//! Episode scraping returns a [`ScrapeError`](crate::error::ScrapeError) when a
//! required field is missing or the date does not parse.

pub mod episode;
pub mod index;

use scraper::ElementRef;

/// First text node under `element` that is not only whitespace, trimmed.
pub(crate) fn first_text(element: ElementRef<'_>) -> Option<String> {
    element
        .text()
        .map(str::trim)
        .find(|t| !t.is_empty())
        .map(str::to_string)
}
