//! Data models for the episode catalog.
//!
//! - [`Episode`]: one scraped episode page
//! - [`Catalog`]: the persisted document, a single `episodes` list
//!
//! Dates serialize as ISO-8601 calendar dates (`YYYY-MM-DD`) through chrono's
//! serde support, and are parsed back into [`NaiveDate`] on load.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A single episode as scraped from its page.
///
/// Episodes are never mutated after the scraper builds them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Episode {
    /// The episode title.
    pub name: String,
    /// The air date.
    pub date: NaiveDate,
    /// Lowercase tags, sorted and free of duplicates.
    pub tags: Vec<String>,
    /// Absolute URL of the episode page. Unique within a catalog.
    pub loc: String,
}

/// The persisted collection of every known episode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Catalog {
    pub episodes: Vec<Episode>,
}

impl Catalog {
    pub fn new(episodes: Vec<Episode>) -> Self {
        Self { episodes }
    }

    /// Every `loc` already present, for set-difference against a fresh crawl.
    pub fn locations(&self) -> HashSet<&str> {
        self.episodes.iter().map(|e| e.loc.as_str()).collect()
    }

    /// Append newly scraped episodes. Existing entries are left untouched.
    pub fn extend(&mut self, episodes: impl IntoIterator<Item = Episode>) {
        self.episodes.extend(episodes);
    }
}
