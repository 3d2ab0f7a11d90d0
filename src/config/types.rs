//! Crawl configuration.
//!
//! All configuration is static: the binary embeds one `CrawlConfig` and the
//! CLI takes no runtime flags. Construction goes through the builder, which
//! validates the seed URL.

use chromiumoxide::browser::Browser;
use futures::future::BoxFuture;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Default number of concurrently outstanding page visits.
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Default output directory, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Pre-crawl hook run against the freshly launched browser, e.g. to log in
/// before the first page visit. Any error it returns aborts the run as a
/// setup failure.
pub type LaunchHook =
    Arc<dyn Fn(Arc<Browser>) -> BoxFuture<'static, anyhow::Result<()>> + Send + Sync>;

/// Configuration for one crawl run.
#[derive(Clone)]
pub struct CrawlConfig {
    /// Seed URL, validated as absolute http(s) by the builder.
    pub(crate) url: String,
    /// Prefixes of pages whose references get persisted.
    pub(crate) scraping_whitelist: Vec<String>,
    /// Prefixes of links that may be followed (the engine unions this with
    /// the scraping whitelist).
    pub(crate) crawling_whitelist: Vec<String>,
    /// Query parameter names that survive URL normalization.
    pub(crate) query_param_whitelist: Vec<String>,
    /// Maximum outstanding page visits, always >= 1.
    pub(crate) concurrency: usize,
    /// Head-ful browser plus verbose logging.
    pub(crate) debug: bool,
    /// Output directory; cleared at the start of every run.
    pub(crate) dir: PathBuf,
    pub(crate) on_launch: Option<LaunchHook>,
}

impl CrawlConfig {
    #[must_use]
    pub fn builder() -> super::builder::CrawlConfigBuilder {
        super::builder::CrawlConfigBuilder::new()
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn scraping_whitelist(&self) -> &[String] {
        &self.scraping_whitelist
    }

    #[must_use]
    pub fn crawling_whitelist(&self) -> &[String] {
        &self.crawling_whitelist
    }

    #[must_use]
    pub fn query_param_whitelist(&self) -> &[String] {
        &self.query_param_whitelist
    }

    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    #[must_use]
    pub fn debug(&self) -> bool {
        self.debug
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn on_launch(&self) -> Option<&LaunchHook> {
        self.on_launch.as_ref()
    }
}

impl std::fmt::Debug for CrawlConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrawlConfig")
            .field("url", &self.url)
            .field("scraping_whitelist", &self.scraping_whitelist)
            .field("crawling_whitelist", &self.crawling_whitelist)
            .field("query_param_whitelist", &self.query_param_whitelist)
            .field("concurrency", &self.concurrency)
            .field("debug", &self.debug)
            .field("dir", &self.dir)
            .field("on_launch", &self.on_launch.is_some())
            .finish()
    }
}
