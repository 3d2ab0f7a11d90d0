//! Page visiting: the seam between the crawl engine and the browser.
//!
//! The orchestrator is generic over [`PageVisitor`] so the engine's
//! scheduling, dedup and termination logic can be exercised without a
//! browser; [`BrowserVisitor`] is the production implementation.

use anyhow::{Context, Result};
use chromiumoxide::browser::Browser;
use chromiumoxide::Page;
use log::warn;
use std::future::Future;
use std::sync::Arc;

use crate::page_extractor::{extract_page_result, PageResult};

/// One page visit: navigate to `url`, extract references and links.
///
/// Implementations report failures as errors; they never retry. The engine
/// logs the failure against the URL and moves on.
pub trait PageVisitor: Send + Sync + 'static {
    fn visit(&self, url: &str) -> impl Future<Output = Result<PageResult>> + Send;
}

impl<V: PageVisitor> PageVisitor for Arc<V> {
    fn visit(&self, url: &str) -> impl Future<Output = Result<PageResult>> + Send {
        V::visit(self, url)
    }
}

/// Visits pages through a shared chromiumoxide browser.
#[derive(Debug, Clone)]
pub struct BrowserVisitor {
    browser: Arc<Browser>,
    query_param_whitelist: Arc<[String]>,
}

impl BrowserVisitor {
    pub fn new(browser: Arc<Browser>, query_param_whitelist: Vec<String>) -> Self {
        Self {
            browser,
            query_param_whitelist: query_param_whitelist.into(),
        }
    }

    async fn visit_on_page(&self, page: &Page, url: &str) -> Result<PageResult> {
        page.goto(url)
            .await
            .with_context(|| format!("navigation to {url} failed"))?;
        page.wait_for_navigation()
            .await
            .with_context(|| format!("page load for {url} failed"))?;
        extract_page_result(page, url, &self.query_param_whitelist).await
    }
}

impl PageVisitor for BrowserVisitor {
    async fn visit(&self, url: &str) -> Result<PageResult> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .with_context(|| format!("failed to open a page for {url}"))?;

        // The page must be closed on every exit path; run the fallible part
        // first and close before surfacing its outcome.
        let outcome = self.visit_on_page(&page, url).await;
        if let Err(e) = page.close().await {
            warn!("failed to close page for {url}: {e}");
        }
        outcome
    }
}
