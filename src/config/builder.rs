//! Fluent builder for [`CrawlConfig`].

use chromiumoxide::browser::Browser;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use url::Url;

use super::types::{CrawlConfig, LaunchHook, DEFAULT_CONCURRENCY, DEFAULT_OUTPUT_DIR};
use crate::error::{CrawlError, CrawlResult};

pub struct CrawlConfigBuilder {
    url: Option<String>,
    scraping_whitelist: Vec<String>,
    crawling_whitelist: Vec<String>,
    query_param_whitelist: Vec<String>,
    concurrency: usize,
    debug: bool,
    dir: PathBuf,
    on_launch: Option<LaunchHook>,
}

impl CrawlConfigBuilder {
    pub(crate) fn new() -> Self {
        Self {
            url: None,
            scraping_whitelist: Vec::new(),
            crawling_whitelist: Vec::new(),
            query_param_whitelist: Vec::new(),
            concurrency: DEFAULT_CONCURRENCY,
            debug: false,
            dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            on_launch: None,
        }
    }

    /// Seed URL. Required.
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    #[must_use]
    pub fn scraping_whitelist(mut self, prefixes: Vec<String>) -> Self {
        self.scraping_whitelist = prefixes;
        self
    }

    #[must_use]
    pub fn crawling_whitelist(mut self, prefixes: Vec<String>) -> Self {
        self.crawling_whitelist = prefixes;
        self
    }

    #[must_use]
    pub fn query_param_whitelist(mut self, params: Vec<String>) -> Self {
        self.query_param_whitelist = params;
        self
    }

    /// Clamped to at least 1: zero outstanding visits could never drain the
    /// frontier.
    #[must_use]
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    #[must_use]
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    #[must_use]
    pub fn dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.dir = dir.into();
        self
    }

    /// Pre-crawl hook, run once against the launched browser before the seed
    /// URL is visited.
    #[must_use]
    pub fn on_launch<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(Arc<Browser>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.on_launch = Some(Arc::new(move |browser| Box::pin(hook(browser))));
        self
    }

    /// Validate and build.
    ///
    /// The seed must be an absolute http(s) URL; everything else has a
    /// usable default.
    pub fn build(self) -> CrawlResult<CrawlConfig> {
        let url = self.url.ok_or_else(|| CrawlError::InvalidSeedUrl {
            url: String::new(),
            reason: "no seed URL configured".to_string(),
        })?;

        let parsed = Url::parse(&url).map_err(|e| CrawlError::InvalidSeedUrl {
            url: url.clone(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(CrawlError::InvalidSeedUrl {
                url,
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        Ok(CrawlConfig {
            url,
            scraping_whitelist: self.scraping_whitelist,
            crawling_whitelist: self.crawling_whitelist,
            query_param_whitelist: self.query_param_whitelist,
            concurrency: self.concurrency,
            debug: self.debug,
            dir: self.dir,
            on_launch: self.on_launch,
        })
    }
}
