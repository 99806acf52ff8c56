//! Catalog persistence.
//!
//! The catalog is a single pretty-printed JSON document:
//!
//! ```text
//! {
//!   "episodes": [
//!     {
//!       "name": "1: New Beginnings",
//!       "date": "1995-11-17",
//!       "tags": ["family"],
//!       "loc": "http://www.thisamericanlife.org/radio-archives/episode/1/new-beginnings"
//!     }
//!   ]
//! }
//! ```
//!
//! Saving writes a sibling `.tmp` file and renames it over the target, so the
//! target is either the old document or the complete new one.

use crate::error::StoreError;
use crate::models::Catalog;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

/// Serialize `catalog` to `path`, replacing whatever was there.
///
/// The JSON goes to a sibling `.tmp` file first and is renamed over `path`.
/// If either step fails the `.tmp` file is removed.
///
/// # Arguments
///
/// * `catalog` - The catalog to write
/// * `path` - Target file; its directory must already exist
///
/// # Returns
///
/// `Ok(())` once the rename has landed, or a [`StoreError`] describing which
/// step failed.
#[instrument(level = "info", skip_all, fields(path = %path.display(), episodes = catalog.episodes.len()))]
pub async fn save_catalog(catalog: &Catalog, path: &Path) -> Result<(), StoreError> {
    let mut json = serde_json::to_string_pretty(catalog).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    json.push('\n');

    let tmp = tmp_path(path);
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Err(e) = fs::write(&tmp, json).await {
        error!(tmp = %tmp.display(), error = %e, "Failed to write catalog");
        let _ = fs::remove_file(&tmp).await;
        return Err(io_err(e));
    }
    if let Err(e) = fs::rename(&tmp, path).await {
        error!(tmp = %tmp.display(), error = %e, "Failed to move catalog into place");
        let _ = fs::remove_file(&tmp).await;
        return Err(io_err(e));
    }

    info!("Wrote catalog");
    Ok(())
}

/// Read the catalog at `path`.
///
/// Dates are parsed back into [`NaiveDate`](chrono::NaiveDate), so an entry
/// whose `date` is not `YYYY-MM-DD` fails the whole load.
///
/// # Arguments
///
/// * `path` - The catalog file written by [`save_catalog`]
///
/// # Returns
///
/// The parsed [`Catalog`], or [`StoreError::Io`] if the file is missing or
/// unreadable and [`StoreError::Json`] if it does not parse.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn load_catalog(path: &Path) -> Result<Catalog, StoreError> {
    let text = fs::read_to_string(path)
        .await
        .map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    let catalog: Catalog = serde_json::from_str(&text).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    info!(episodes = catalog.episodes.len(), "Loaded catalog");
    Ok(catalog)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}
