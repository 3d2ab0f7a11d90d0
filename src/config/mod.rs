//! Static crawl configuration and its builder.

pub mod builder;
pub mod types;

pub use builder::CrawlConfigBuilder;
pub use types::{CrawlConfig, LaunchHook, DEFAULT_CONCURRENCY, DEFAULT_OUTPUT_DIR};
