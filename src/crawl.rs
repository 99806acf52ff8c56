//! Catalog building: full crawl and incremental update.
//!
//! Both modes follow the same two-phase pattern:
//!
//! 1. **Indexing**: fetch every year's index page from `start_year` through
//!    `end_year` and collect episode URLs
//! 2. **Fetching**: fetch and scrape each episode page
//!
//! Fetches are strictly sequential. A page that does not come back as 200 is
//! dropped and counted; an episode page that does come back but fails to parse
//! is recorded in [`CrawlReport::failures`] and the crawl carries on.

use crate::config::CrawlerConfig;
use crate::error::{ConfigError, ScrapeError};
use crate::fetch::PageFetcher;
use crate::models::{Catalog, Episode};
use crate::scrapers::{episode::scrape_episode, index::episode_locs_from_index};
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use std::collections::BTreeSet;
use tracing::{info, instrument, warn};

/// An episode page that was fetched but could not be scraped.
#[derive(Debug)]
pub struct ScrapeFailure {
    pub loc: String,
    pub error: ScrapeError,
}

/// Outcome of one crawl.
#[derive(Debug, Default)]
pub struct CrawlReport {
    /// Newly scraped episodes, in fetch order.
    pub episodes: Vec<Episode>,
    /// Episode pages that failed to parse.
    pub failures: Vec<ScrapeFailure>,
    /// Index and episode URLs whose fetch returned nothing.
    pub dropped_fetches: usize,
}

impl CrawlReport {
    /// Log a one-line summary plus one warning per failed episode.
    pub fn log_summary(&self) {
        for failure in &self.failures {
            warn!(loc = %failure.loc, error = %failure.error, "Skipped episode");
        }
        info!(
            scraped = self.episodes.len(),
            failed = self.failures.len(),
            dropped_fetches = self.dropped_fetches,
            "Crawl complete"
        );
    }
}

/// Index page URL for every year in `start_year..=end_year`.
pub fn index_page_locs(config: &CrawlerConfig, end_year: i32) -> Vec<String> {
    (config.start_year..=end_year)
        .map(|year| config.index_page_loc(year))
        .collect()
}

/// Crawl everything and return every episode found.
///
/// Episode URLs from all years are unioned into a set first, so an episode
/// listed under several years is fetched once. Output is ordered by `loc`.
///
/// # Arguments
///
/// * `fetcher` - Source of index and episode pages
/// * `config` - Start year, index page template and episode base URL
/// * `end_year` - Last archive year to crawl, inclusive
///
/// # Returns
///
/// A [`CrawlReport`] holding every scraped episode plus per-episode failures,
/// or a [`ConfigError`] if the episode base URL does not parse.
#[instrument(level = "info", skip_all, fields(start_year = config.start_year, end_year = end_year))]
pub async fn build_all<F: PageFetcher>(
    fetcher: &F,
    config: &CrawlerConfig,
    end_year: i32,
) -> Result<CrawlReport, ConfigError> {
    let mut report = CrawlReport::default();
    let universe = index_episode_locs(fetcher, config, end_year, &mut report).await?;
    let unique: BTreeSet<String> = universe.into_iter().collect();
    info!(count = unique.len(), "Unique episode URLs");

    fetch_episodes(fetcher, unique, &mut report).await;
    Ok(report)
}

/// Crawl only what `existing` does not already hold, and append it.
///
/// The fresh URL universe keeps document order; anything already present as a
/// `loc` in `existing` is skipped without being fetched. Existing entries are
/// never re-checked or deduplicated.
///
/// # Arguments
///
/// * `fetcher` - Source of index and episode pages
/// * `config` - Start year, index page template and episode base URL
/// * `end_year` - Last archive year to crawl, inclusive
/// * `existing` - The loaded catalog; new episodes are appended to it in place
///
/// # Returns
///
/// A [`CrawlReport`] whose `episodes` are exactly what was appended to
/// `existing`, or a [`ConfigError`] if the episode base URL does not parse.
#[instrument(level = "info", skip_all, fields(start_year = config.start_year, end_year = end_year, existing = existing.episodes.len()))]
pub async fn update<F: PageFetcher>(
    fetcher: &F,
    config: &CrawlerConfig,
    end_year: i32,
    existing: &mut Catalog,
) -> Result<CrawlReport, ConfigError> {
    let mut report = CrawlReport::default();
    let universe = index_episode_locs(fetcher, config, end_year, &mut report).await?;

    let new_locs: Vec<String> = {
        let known = existing.locations();
        universe
            .into_iter()
            .filter(|loc| !known.contains(loc.as_str()))
            .unique()
            .collect()
    };
    info!(count = new_locs.len(), "New episode URLs");

    fetch_episodes(fetcher, new_locs, &mut report).await;
    existing.extend(report.episodes.iter().cloned());
    Ok(report)
}

async fn index_episode_locs<F: PageFetcher>(
    fetcher: &F,
    config: &CrawlerConfig,
    end_year: i32,
    report: &mut CrawlReport,
) -> Result<Vec<String>, ConfigError> {
    let base = config.episode_base()?;
    let index_locs = index_page_locs(config, end_year);

    info!(pages = index_locs.len(), "Downloading index pages");
    let pages: Vec<Option<String>> = stream::iter(index_locs)
        .then(|loc| async move { fetcher.fetch(&loc).await })
        .collect()
        .await;

    let mut locs = Vec::new();
    for page in pages {
        match page {
            Some(html) => locs.extend(episode_locs_from_index(&html, &base)),
            None => report.dropped_fetches += 1,
        }
    }
    info!(count = locs.len(), "Collected episode URLs");
    Ok(locs)
}

async fn fetch_episodes<F, I>(fetcher: &F, locs: I, report: &mut CrawlReport)
where
    F: PageFetcher,
    I: IntoIterator<Item = String>,
{
    info!("Downloading and parsing episodes");
    // Scrape as each page arrives so only one body is held at a time.
    let results: Vec<(String, Option<Result<Episode, ScrapeError>>)> = stream::iter(locs)
        .then(|loc| async move {
            let scraped = fetcher
                .fetch(&loc)
                .await
                .map(|html| scrape_episode(&loc, &html));
            (loc, scraped)
        })
        .collect()
        .await;

    for (loc, scraped) in results {
        match scraped {
            Some(Ok(episode)) => report.episodes.push(episode),
            Some(Err(error)) => {
                warn!(%loc, %error, "Episode page did not parse");
                report.failures.push(ScrapeFailure { loc, error });
            }
            None => report.dropped_fetches += 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::tests::StaticFetcher;
    use chrono::NaiveDate;

    const BASE: &str = "http://www.thisamericanlife.org";

    fn config(start_year: i32) -> CrawlerConfig {
        CrawlerConfig {
            start_year,
            ..CrawlerConfig::default()
        }
    }

    fn index_url(year: i32) -> String {
        format!("{BASE}/radio-archives/{year}")
    }

    fn episode_url(n: u32) -> String {
        format!("{BASE}/radio-archives/episode/{n}")
    }

    fn index_page(episodes: &[u32]) -> String {
        episodes
            .iter()
            .map(|n| {
                format!(
                    "<div class=\"episode-archive\"><h3><a href=\"/radio-archives/episode/{n}\">{n}</a></h3></div>"
                )
            })
            .collect()
    }

    fn episode_page(n: u32) -> String {
        format!(
            "<h1 class=\"node-title\">Episode {n}</h1>\
             <div class=\"date\">Jan {n}, 2015</div>\
             <div class=\"tags\"><a>Travel</a><a>Family</a></div>"
        )
    }

    fn episode(n: u32) -> Episode {
        Episode {
            name: format!("Episode {n}"),
            date: NaiveDate::from_ymd_opt(2015, 1, n).unwrap(),
            tags: vec!["family".to_string(), "travel".to_string()],
            loc: episode_url(n),
        }
    }

    #[test]
    fn test_index_page_locs_inclusive() {
        let locs = index_page_locs(&config(2013), 2015);
        assert_eq!(locs, vec![index_url(2013), index_url(2014), index_url(2015)]);
    }

    #[test]
    fn test_index_page_locs_empty_range() {
        assert!(index_page_locs(&config(2016), 2015).is_empty());
    }

    #[tokio::test]
    async fn test_single_index_end_to_end() {
        let fetcher = StaticFetcher::default()
            .with_page(&index_url(2015), &index_page(&[2, 1]))
            .with_page(&episode_url(1), &episode_page(1))
            .with_page(&episode_url(2), &episode_page(2));

        let report = build_all(&fetcher, &config(2015), 2015).await.unwrap();

        assert_eq!(
            fetcher.requested(),
            vec![index_url(2015), episode_url(1), episode_url(2)]
        );
        assert_eq!(report.episodes, vec![episode(1), episode(2)]);
        assert!(report.failures.is_empty());
        assert_eq!(report.dropped_fetches, 0);
    }

    #[tokio::test]
    async fn test_build_all_dedups_across_years() {
        let fetcher = StaticFetcher::default()
            .with_page(&index_url(2014), &index_page(&[1, 2]))
            .with_page(&index_url(2015), &index_page(&[2, 3, 3]))
            .with_page(&episode_url(1), &episode_page(1))
            .with_page(&episode_url(2), &episode_page(2))
            .with_page(&episode_url(3), &episode_page(3));

        let report = build_all(&fetcher, &config(2014), 2015).await.unwrap();

        let locs: BTreeSet<&str> = report.episodes.iter().map(|e| e.loc.as_str()).collect();
        assert_eq!(report.episodes.len(), 3);
        assert_eq!(locs.len(), 3);
        let episode_fetches = fetcher
            .requested()
            .into_iter()
            .filter(|u| u.contains("/episode/"))
            .count();
        assert_eq!(episode_fetches, 3);
    }

    #[tokio::test]
    async fn test_missing_index_year_is_dropped() {
        let fetcher = StaticFetcher::default()
            .with_page(&index_url(2015), &index_page(&[1]))
            .with_page(&episode_url(1), &episode_page(1));

        let report = build_all(&fetcher, &config(2013), 2015).await.unwrap();

        assert_eq!(report.episodes, vec![episode(1)]);
        assert_eq!(report.dropped_fetches, 2);
    }

    #[tokio::test]
    async fn test_bad_episode_is_isolated() {
        let fetcher = StaticFetcher::default()
            .with_page(&index_url(2015), &index_page(&[1, 2, 3]))
            .with_page(&episode_url(1), &episode_page(1))
            .with_page(
                &episode_url(2),
                "<h1 class=\"node-title\">Two</h1><div class=\"date\">Xyz 2 2015</div>",
            );

        let report = build_all(&fetcher, &config(2015), 2015).await.unwrap();

        assert_eq!(report.episodes, vec![episode(1)]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].loc, episode_url(2));
        assert!(matches!(
            report.failures[0].error,
            ScrapeError::UnknownMonth(_)
        ));
        // episode 3 has no page at all
        assert_eq!(report.dropped_fetches, 1);
    }

    #[tokio::test]
    async fn test_update_fetches_only_new() {
        let fetcher = StaticFetcher::default()
            .with_page(&index_url(2015), &index_page(&[1, 2, 3]))
            .with_page(&episode_url(1), &episode_page(1))
            .with_page(&episode_url(2), &episode_page(2))
            .with_page(&episode_url(3), &episode_page(3));
        let mut catalog = Catalog::new(vec![episode(1), episode(2)]);

        let report = update(&fetcher, &config(2015), 2015, &mut catalog)
            .await
            .unwrap();

        assert_eq!(fetcher.requested(), vec![index_url(2015), episode_url(3)]);
        assert_eq!(report.episodes, vec![episode(3)]);
        assert_eq!(catalog.episodes, vec![episode(1), episode(2), episode(3)]);
    }

    #[tokio::test]
    async fn test_update_keeps_document_order_and_dedups_new() {
        let fetcher = StaticFetcher::default()
            .with_page(&index_url(2014), &index_page(&[5, 1]))
            .with_page(&index_url(2015), &index_page(&[4, 5]))
            .with_page(&episode_url(4), &episode_page(4))
            .with_page(&episode_url(5), &episode_page(5));
        let mut catalog = Catalog::new(vec![episode(1)]);

        update(&fetcher, &config(2014), 2015, &mut catalog)
            .await
            .unwrap();

        assert_eq!(
            fetcher.requested(),
            vec![index_url(2014), index_url(2015), episode_url(5), episode_url(4)]
        );
        assert_eq!(catalog.episodes, vec![episode(1), episode(5), episode(4)]);
    }

    #[tokio::test]
    async fn test_update_with_nothing_new() {
        let fetcher =
            StaticFetcher::default().with_page(&index_url(2015), &index_page(&[1]));
        let mut catalog = Catalog::new(vec![episode(1), episode(1)]);

        let report = update(&fetcher, &config(2015), 2015, &mut catalog)
            .await
            .unwrap();

        assert!(report.episodes.is_empty());
        // pre-existing duplicates are left alone
        assert_eq!(catalog.episodes.len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_base_url_is_config_error() {
        let fetcher = StaticFetcher::default();
        let config = CrawlerConfig {
            episode_base_url: "nope".to_string(),
            ..config(2015)
        };

        let err = build_all(&fetcher, &config, 2015).await.unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(fetcher.requested().is_empty());
    }
}
