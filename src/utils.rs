//! Small helpers for the binary's top level.

use chrono::{Datelike, Local};
use std::error::Error;
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// The current local calendar year, the default last archive year.
pub fn current_year() -> i32 {
    Local::now().year()
}

/// Ensure the directory that will hold `path` exists and is writable.
///
/// Run before a crawl so an unwritable target fails fast rather than after
/// every page has been downloaded.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or a scratch file
/// cannot be written in it.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_parent(path: &Path) -> Result<(), Box<dyn Error>> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).await?;

    let scratch_path = dir.join("..__write_check__");
    stdfs::File::create(&scratch_path)?;
    let _ = stdfs::remove_file(&scratch_path);
    info!(dir = %dir.display(), "Catalog directory is writable");
    Ok(())
}
