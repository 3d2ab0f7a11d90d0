//! Whitelist-scoped site crawler that extracts OSIS scripture references
//! from rendered pages.
//!
//! Starting from a single seed URL, the crawler renders each reachable page
//! in a real Chrome session, collects anchors carrying a `data-osis`
//! attribute as references, and follows same-origin links gated by a prefix
//! whitelist. One pretty-printed JSON file per scraped URL lands in the
//! output directory.

pub mod browser_setup;
pub mod completion;
pub mod config;
pub mod content_saver;
pub mod crawl_engine;
pub mod error;
pub mod frontier;
pub mod page_extractor;
pub mod utils;
pub mod whitelist;

pub use config::{CrawlConfig, CrawlConfigBuilder};
pub use crawl_engine::{BrowserVisitor, CrawlOrchestrator, PageVisitor};
pub use error::{CrawlError, CrawlResult};
pub use frontier::Frontier;
pub use page_extractor::{PageResult, Reference};
pub use whitelist::Whitelist;

/// Run a complete crawl: launch the browser and prepare the output
/// directory concurrently, seed the frontier, and await the completion
/// signal.
///
/// Only setup failures surface as errors; individual page failures are
/// logged and absorbed.
pub async fn crawl(config: CrawlConfig) -> CrawlResult<()> {
    let (handle, ()) = tokio::try_join!(
        browser_setup::setup_browser(&config),
        content_saver::prepare_output_dir(config.dir()),
    )?;

    let visitor = BrowserVisitor::new(handle.browser(), config.query_param_whitelist().to_vec());
    let orchestrator = CrawlOrchestrator::new(&config, visitor);
    let outcome = orchestrator.run().await;

    // Drop the orchestrator (and with it the visitor's browser reference)
    // before shutdown so the browser can be closed gracefully.
    drop(orchestrator);
    handle.shutdown().await;

    outcome
}
