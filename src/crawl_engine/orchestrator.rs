//! Crawl orchestration: worker pool, whitelist policy, and termination.
//!
//! One logical loop interleaves up to `concurrency` outstanding page visits.
//! Completed visits feed the scraping whitelist (persist or skip) and the
//! crawling whitelist (follow or drop); the completion check runs only after
//! every link from the completed visit has been offered to the frontier, so
//! the idle test can never observe a half-processed task.

use futures::stream::FuturesUnordered;
use futures::StreamExt;
use log::{debug, error, info};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinHandle;

use super::visitor::PageVisitor;
use crate::completion::CompletionSignal;
use crate::config::CrawlConfig;
use crate::content_saver;
use crate::error::CrawlResult;
use crate::frontier::Frontier;
use crate::page_extractor::PageResult;
use crate::whitelist::Whitelist;

/// Wires the frontier, worker pool, whitelists and completion signal into a
/// single crawl run.
pub struct CrawlOrchestrator<V: PageVisitor> {
    visitor: Arc<V>,
    frontier: Arc<Frontier>,
    seed: String,
    scraping: Whitelist,
    crawling: Whitelist,
    output_dir: PathBuf,
    concurrency: usize,
}

impl<V: PageVisitor> CrawlOrchestrator<V> {
    pub fn new(config: &CrawlConfig, visitor: V) -> Self {
        let scraping = Whitelist::new(config.scraping_whitelist().to_vec());
        let crawling = Whitelist::new(config.crawling_whitelist().to_vec()).union(&scraping);
        Self {
            visitor: Arc::new(visitor),
            frontier: Arc::new(Frontier::new()),
            seed: config.url().to_string(),
            scraping,
            crawling,
            output_dir: config.dir().to_path_buf(),
            concurrency: config.concurrency(),
        }
    }

    /// The shared frontier, exposed for progress inspection.
    #[must_use]
    pub fn frontier(&self) -> Arc<Frontier> {
        Arc::clone(&self.frontier)
    }

    /// Crawl everything reachable from the configured seed URL and await the
    /// run's completion signal.
    pub async fn run(&self) -> CrawlResult<()> {
        let (signal, completion) = CompletionSignal::new();

        let mut pending: VecDeque<String> = VecDeque::new();
        if self.frontier.try_enqueue(&self.seed) {
            pending.push_back(self.seed.clone());
        }

        let mut active: FuturesUnordered<VisitTask> = FuturesUnordered::new();

        while !signal.is_resolved() {
            // Fill the pool up to the concurrency bound.
            while active.len() < self.concurrency {
                let Some(url) = pending.pop_front() else { break };
                debug!("retrieving {url}");
                let visitor = Arc::clone(&self.visitor);
                active.push(tokio::spawn(async move {
                    let outcome = visitor.visit(&url).await;
                    (url, outcome)
                }));
            }

            match active.next().await {
                Some(Ok((url, Ok(result)))) => {
                    self.frontier.mark_completed();
                    self.process_result(&url, result, &mut pending).await;
                }
                Some(Ok((url, Err(e)))) => {
                    // The page is done regardless; coverage shrinks, the run
                    // continues.
                    self.frontier.mark_completed();
                    error!("failed to crawl '{url}': {e:#}");
                }
                Some(Err(e)) => {
                    // A panicked visit still has to count as completed or the
                    // seen == completed termination condition is unreachable.
                    self.frontier.mark_completed();
                    error!("page visit task panicked: {e}");
                }
                None => {}
            }

            // Idle check. Runs strictly after the completed task's links were
            // enqueued above, so every same-task discovery is visible here.
            if active.is_empty() && pending.is_empty() {
                debug_assert_eq!(
                    self.frontier.completed_count(),
                    self.frontier.seen_count(),
                    "idle with unfinished frontier entries"
                );
                signal.resolve(Ok(()))?;
            } else {
                info!(
                    "{}/{}",
                    self.frontier.completed_count(),
                    self.frontier.seen_count()
                );
            }
        }

        completion.wait().await
    }

    async fn process_result(&self, url: &str, result: PageResult, pending: &mut VecDeque<String>) {
        if self.scraping.is_allowed(url) {
            match content_saver::write_references(&self.output_dir, url, &result.references).await {
                Ok(()) => info!("{} references saved for {url}", result.references.len()),
                Err(e) => error!("failed to save references for {url}: {e:#}"),
            }
        }

        for link in result.links {
            if self.crawling.is_allowed(&link) && self.frontier.try_enqueue(&link) {
                pending.push_back(link);
            }
        }
    }
}

type VisitTask = JoinHandle<(String, anyhow::Result<PageResult>)>;
