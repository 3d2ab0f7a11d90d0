//! Per-URL reference persistence.
//!
//! Output is one pretty-printed JSON file per scraped URL, in a directory
//! that is wiped at the start of every run. Filenames are derived from the
//! URL: scheme stripped, lower-cased, every non-alphanumeric character
//! replaced by `_`.

use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};

use crate::error::{CrawlError, CrawlResult};
use crate::page_extractor::Reference;

/// Clear the output directory if it exists, then (re)create it.
///
/// Failure here is fatal for the run: without a usable output location no
/// page could ever be persisted.
pub async fn prepare_output_dir(dir: &Path) -> CrawlResult<()> {
    match tokio::fs::remove_dir_all(dir).await {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(source) => {
            return Err(CrawlError::OutputDir {
                path: dir.to_path_buf(),
                source,
            });
        }
    }
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|source| CrawlError::OutputDir {
            path: dir.to_path_buf(),
            source,
        })
}

/// Derive the output filename for a scraped URL.
pub fn reference_filename(url: &str) -> String {
    let stripped = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    let mut name: String = stripped
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    name.push_str(".json");
    name
}

/// Write the ordered reference list for `url` into `dir`.
///
/// Errors are returned for the caller to log; a failed write skips one page
/// and never aborts the run.
pub async fn write_references(dir: &Path, url: &str, references: &[Reference]) -> Result<()> {
    let payload =
        serde_json::to_vec_pretty(references).context("failed to serialize references")?;
    let path = dir.join(reference_filename(url));
    tokio::fs::write(&path, payload)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
