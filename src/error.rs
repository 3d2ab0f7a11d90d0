//! Run-level error taxonomy.
//!
//! Only setup failures cross the crate boundary as run-level errors; per-page
//! navigation and extraction failures are logged and absorbed inside the
//! crawl engine. Signal misuse variants indicate a broken invariant in the
//! engine itself rather than anything the environment did.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can abort a crawl run.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// The output directory could not be cleared or created.
    #[error("failed to prepare output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The browser could not be found, downloaded, or launched.
    #[error("browser setup failed: {0}")]
    BrowserSetup(String),

    /// The configured pre-crawl hook returned an error.
    #[error("launch hook failed: {0}")]
    LaunchHook(String),

    /// The configured seed URL is not an absolute http(s) URL.
    #[error("invalid seed URL '{url}': {reason}")]
    InvalidSeedUrl { url: String, reason: String },

    /// The completion signal was resolved a second time.
    #[error("completion signal resolved more than once")]
    SignalAlreadyResolved,

    /// The crawl engine dropped its completion signal without resolving it.
    #[error("crawl ended without resolving its completion signal")]
    SignalAbandoned,
}

/// Convenience alias for results carrying a [`CrawlError`].
pub type CrawlResult<T> = Result<T, CrawlError>;
