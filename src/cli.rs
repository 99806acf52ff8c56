//! Command-line interface definitions.
//!
//! Two positionals are required: the catalog path and the mode. Anything else
//! that clap rejects is answered with [`USAGE`] on stdout.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Printed on stdout for any argument error.
pub const USAGE: &str = "USAGE: podcast_catalog [json location] [all|new]";

/// Exit code for argument errors.
pub const USAGE_EXIT_CODE: i32 = 2;

/// Crawl mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Crawl every archive year and replace the catalog
    All,
    /// Fetch only episodes missing from the existing catalog and append them
    New,
}

/// Command-line arguments.
///
/// # Examples
///
/// ```sh
/// # Full crawl into a fresh catalog
/// podcast_catalog ./episodes.json all
///
/// # Incremental update of an existing catalog
/// podcast_catalog ./episodes.json new
///
/// # Only re-check recent years, with a site override
/// podcast_catalog ./episodes.json new --start-year 2023 --config crawler.yaml
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Path of the JSON catalog file
    pub catalog_path: PathBuf,

    /// `all` for a full crawl, `new` for an incremental update
    #[arg(value_enum)]
    pub mode: Mode,

    /// Optional YAML file overriding the crawler configuration
    #[arg(short, long, env = "PODCAST_CATALOG_CONFIG")]
    pub config: Option<PathBuf>,

    /// First archive year to crawl (defaults to the configured start year)
    #[arg(long)]
    pub start_year: Option<i32>,

    /// Last archive year to crawl (defaults to the current year)
    #[arg(long)]
    pub end_year: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_all_mode() {
        let cli = Cli::try_parse_from(["podcast_catalog", "./episodes.json", "all"]).unwrap();

        assert_eq!(cli.catalog_path, PathBuf::from("./episodes.json"));
        assert_eq!(cli.mode, Mode::All);
        assert_eq!(cli.start_year, None);
        assert_eq!(cli.end_year, None);
    }

    #[test]
    fn test_cli_new_mode_with_options() {
        let cli = Cli::try_parse_from([
            "podcast_catalog",
            "/tmp/episodes.json",
            "new",
            "--start-year",
            "2020",
            "--end-year",
            "2021",
            "-c",
            "crawler.yaml",
        ])
        .unwrap();

        assert_eq!(cli.mode, Mode::New);
        assert_eq!(cli.start_year, Some(2020));
        assert_eq!(cli.end_year, Some(2021));
        assert_eq!(cli.config, Some(PathBuf::from("crawler.yaml")));
    }

    #[test]
    fn test_cli_rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["podcast_catalog", "./episodes.json", "some"]).is_err());
    }

    #[test]
    fn test_cli_rejects_wrong_arg_count() {
        assert!(Cli::try_parse_from(["podcast_catalog", "./episodes.json"]).is_err());
        assert!(Cli::try_parse_from(["podcast_catalog"]).is_err());
        assert!(
            Cli::try_parse_from(["podcast_catalog", "./episodes.json", "all", "extra"]).is_err()
        );
    }
}
