//! The crawl engine: orchestration loop and the page-visitor seam.

pub mod orchestrator;
pub mod visitor;

pub use orchestrator::CrawlOrchestrator;
pub use visitor::{BrowserVisitor, PageVisitor};
