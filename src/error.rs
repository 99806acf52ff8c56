//! Error types for the catalog crawler.
//!
//! Scrape errors are per-episode and never abort a crawl; store and config
//! errors are fatal for the run.

use std::num::ParseIntError;
use std::path::PathBuf;
use thiserror::Error;

/// Why a single episode page could not be turned into an [`Episode`](crate::models::Episode).
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// The month token is not one of `Jan`..`Dec`.
    #[error("unknown month abbreviation: {0:?}")]
    UnknownMonth(String),

    /// The day or year token is not an integer.
    #[error("invalid number {token:?} in date: {source}")]
    InvalidNumber {
        token: String,
        #[source]
        source: ParseIntError,
    },

    /// Fewer than three tokens.
    #[error("malformed date: {0:?}")]
    MalformedDate(String),

    /// Well-formed tokens that do not name a calendar day.
    #[error("no such date: {year}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },

    /// A required structural marker is absent from the page.
    #[error("missing field: .{0}")]
    MissingField(&'static str),
}

/// Errors raised while reading or writing the catalog file.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("catalog I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("catalog JSON error at {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors raised while loading [`CrawlerConfig`](crate::config::CrawlerConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
