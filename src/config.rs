//! Crawler configuration.
//!
//! The built-in defaults point at the radio archive this tool was written for.
//! A YAML file may override any subset of fields:
//!
//! ```yaml
//! start_year: 2000
//! user_agent: "My Crawler"
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, instrument};
use url::Url;

pub const DEFAULT_START_YEAR: i32 = 1995;
pub const DEFAULT_INDEX_PAGE_TEMPLATE: &str = "http://www.thisamericanlife.org/radio-archives/{year}";
pub const DEFAULT_EPISODE_BASE_URL: &str = "http://www.thisamericanlife.org";
pub const DEFAULT_USER_AGENT: &str = "Digital Anthropology Podcast Crawler";

/// Placeholder substituted with the year in [`CrawlerConfig::index_page_template`].
pub const YEAR_PLACEHOLDER: &str = "{year}";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// First archive year to crawl.
    pub start_year: i32,
    /// Index page URL with a `{year}` placeholder.
    pub index_page_template: String,
    /// Base that relative episode links are resolved against.
    pub episode_base_url: String,
    /// Sent as `User-Agent` on every request.
    pub user_agent: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            start_year: DEFAULT_START_YEAR,
            index_page_template: DEFAULT_INDEX_PAGE_TEMPLATE.to_string(),
            episode_base_url: DEFAULT_EPISODE_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl CrawlerConfig {
    /// Load and validate a YAML config file.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&text)?;
        info!(start_year = config.start_year, "Loaded crawler config");
        Ok(config)
    }

    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.index_page_template.contains(YEAR_PLACEHOLDER) {
            return Err(ConfigError::Invalid(format!(
                "index_page_template {:?} has no {YEAR_PLACEHOLDER} placeholder",
                self.index_page_template
            )));
        }
        self.episode_base()?;
        Ok(())
    }

    /// The parsed [`episode_base_url`](Self::episode_base_url).
    pub fn episode_base(&self) -> Result<Url, ConfigError> {
        Url::parse(&self.episode_base_url).map_err(|e| {
            ConfigError::Invalid(format!(
                "episode_base_url {:?}: {e}",
                self.episode_base_url
            ))
        })
    }

    /// Index page URL for one archive year.
    pub fn index_page_loc(&self, year: i32) -> String {
        self.index_page_template
            .replace(YEAR_PLACEHOLDER, &year.to_string())
    }
}
