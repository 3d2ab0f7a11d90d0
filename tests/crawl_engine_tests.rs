//! Crawl engine integration tests against a scripted page visitor.
//!
//! The orchestrator is generic over `PageVisitor`, so these tests drive the
//! full dedup/whitelist/termination machinery with an in-memory site map
//! instead of a browser.

use refscrape::{CrawlConfig, CrawlOrchestrator, PageResult, PageVisitor, Reference};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Visits pages from a fixed site map, recording visit order and tracking
/// how many visits are outstanding at once.
struct FakeVisitor {
    pages: HashMap<String, PageResult>,
    failing: Vec<String>,
    delay: Duration,
    visits: Mutex<Vec<String>>,
    outstanding: AtomicUsize,
    max_outstanding: AtomicUsize,
}

impl FakeVisitor {
    fn new(pages: HashMap<String, PageResult>) -> Self {
        Self {
            pages,
            failing: Vec::new(),
            delay: Duration::ZERO,
            visits: Mutex::new(Vec::new()),
            outstanding: AtomicUsize::new(0),
            max_outstanding: AtomicUsize::new(0),
        }
    }

    fn with_failing(mut self, urls: Vec<String>) -> Self {
        self.failing = urls;
        self
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    fn visits(&self) -> Vec<String> {
        self.visits.lock().unwrap().clone()
    }

    fn max_outstanding(&self) -> usize {
        self.max_outstanding.load(Ordering::SeqCst)
    }
}

impl PageVisitor for FakeVisitor {
    async fn visit(&self, url: &str) -> anyhow::Result<PageResult> {
        let now = self.outstanding.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_outstanding.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.visits.lock().unwrap().push(url.to_string());
        self.outstanding.fetch_sub(1, Ordering::SeqCst);

        if self.failing.iter().any(|f| f == url) {
            anyhow::bail!("scripted failure for {url}");
        }
        Ok(self.pages.get(url).cloned().unwrap_or_default())
    }
}

fn page(references: &[(&str, &str)], links: &[&str]) -> PageResult {
    PageResult {
        references: references
            .iter()
            .map(|(text, osis)| Reference {
                text: (*text).to_string(),
                osis: (*osis).to_string(),
            })
            .collect(),
        links: links.iter().map(|l| (*l).to_string()).collect(),
    }
}

fn site(entries: &[(&str, PageResult)]) -> FakeVisitor {
    FakeVisitor::new(
        entries
            .iter()
            .map(|(url, result)| ((*url).to_string(), result.clone()))
            .collect(),
    )
}

fn config(seed: &str, dir: &Path) -> CrawlConfig {
    CrawlConfig::builder()
        .url(seed)
        .dir(dir)
        .build()
        .expect("test config must build")
}

#[tokio::test]
async fn cyclic_link_graph_terminates_with_one_completion() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let visitor = Arc::new(site(&[
        ("https://a.test/1", page(&[], &["https://a.test/2"])),
        ("https://a.test/2", page(&[], &["https://a.test/1"])),
    ]));

    let orchestrator = CrawlOrchestrator::new(
        &config("https://a.test/1", tmp.path()),
        Arc::clone(&visitor),
    );
    let frontier = orchestrator.frontier();

    orchestrator.run().await.expect("cyclic crawl must complete");

    assert_eq!(frontier.seen_count(), 2);
    assert_eq!(frontier.completed_count(), 2);
    assert_eq!(visitor.visits().len(), 2);
}

#[tokio::test]
async fn each_url_is_visited_exactly_once() {
    let tmp = tempfile::tempdir().expect("tempdir");
    // Two pages both link to /shared, and every page links back to the seed.
    let visitor = Arc::new(site(&[
        (
            "https://a.test/seed",
            page(
                &[],
                &["https://a.test/x", "https://a.test/y", "https://a.test/seed"],
            ),
        ),
        (
            "https://a.test/x",
            page(&[], &["https://a.test/shared", "https://a.test/seed"]),
        ),
        (
            "https://a.test/y",
            page(&[], &["https://a.test/shared", "https://a.test/seed"]),
        ),
    ]));

    let orchestrator = CrawlOrchestrator::new(
        &config("https://a.test/seed", tmp.path()),
        Arc::clone(&visitor),
    );
    let frontier = orchestrator.frontier();

    orchestrator.run().await.expect("crawl must complete");

    assert_eq!(frontier.seen_count(), 4);
    assert_eq!(frontier.completed_count(), 4);

    let mut visits = visitor.visits();
    visits.sort();
    visits.dedup();
    assert_eq!(visits.len(), 4, "some URL was visited more than once");
}

#[tokio::test]
async fn end_to_end_scenario_persists_references_and_honors_whitelists() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let seed = "https://a.test/mod/page/view.php?id=1";
    let other = "https://a.test/elsewhere";

    let visitor = Arc::new(site(&[(seed, page(&[("John 3:16", "John 3:16")], &[other]))]));

    let crawl_config = CrawlConfig::builder()
        .url(seed)
        .scraping_whitelist(vec![seed.to_string()])
        .crawling_whitelist(vec![seed.to_string()])
        .dir(tmp.path())
        .build()
        .expect("config must build");

    let orchestrator = CrawlOrchestrator::new(&crawl_config, Arc::clone(&visitor));
    let frontier = orchestrator.frontier();

    orchestrator.run().await.expect("crawl must complete");

    // The non-whitelisted link was never visited.
    assert_eq!(frontier.seen_count(), 1);
    assert_eq!(frontier.completed_count(), 1);
    assert_eq!(visitor.visits(), vec![seed.to_string()]);

    let output = tmp.path().join("a_test_mod_page_view_php_id_1.json");
    let raw = tokio::fs::read_to_string(&output)
        .await
        .expect("output file must exist");
    let references: Vec<Reference> = serde_json::from_str(&raw).expect("output must parse");
    assert_eq!(
        references,
        vec![Reference {
            text: "John 3:16".to_string(),
            osis: "John 3:16".to_string(),
        }]
    );
}

#[tokio::test]
async fn pages_outside_the_scraping_whitelist_are_not_persisted() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let seed = "https://a.test/course/view.php";
    let scraped = "https://a.test/mod/page/view.php";

    let visitor = site(&[
        (seed, page(&[("Gen 1:1", "Gen 1:1")], &[scraped])),
        (scraped, page(&[("John 3:16", "John 3:16")], &[])),
    ]);
    // This test needs no handle into the fake, so the orchestrator can own it.

    let crawl_config = CrawlConfig::builder()
        .url(seed)
        .scraping_whitelist(vec!["https://a.test/mod".to_string()])
        .crawling_whitelist(vec!["https://a.test/course".to_string()])
        .dir(tmp.path())
        .build()
        .expect("config must build");

    let orchestrator = CrawlOrchestrator::new(&crawl_config, visitor);
    orchestrator.run().await.expect("crawl must complete");

    // The seed was crawled (its links followed) but not persisted; the mod
    // page was reachable because scraping entries join the crawling set.
    assert!(!tmp.path().join("a_test_course_view_php.json").exists());
    assert!(tmp.path().join("a_test_mod_page_view_php.json").exists());
}

#[tokio::test]
async fn concurrency_bound_is_respected() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let seed = "https://a.test/seed";
    let children: Vec<String> = (0..10).map(|i| format!("https://a.test/p{i}")).collect();
    let child_refs: Vec<&str> = children.iter().map(String::as_str).collect();

    let visitor = Arc::new(
        FakeVisitor::new(
            [(seed.to_string(), page(&[], &child_refs))]
                .into_iter()
                .collect(),
        )
        .with_delay(Duration::from_millis(20)),
    );

    let crawl_config = CrawlConfig::builder()
        .url(seed)
        .concurrency(2)
        .dir(tmp.path())
        .build()
        .expect("config must build");

    let orchestrator = CrawlOrchestrator::new(&crawl_config, Arc::clone(&visitor));
    let frontier = orchestrator.frontier();

    orchestrator.run().await.expect("crawl must complete");

    assert_eq!(frontier.completed_count(), 11);
    assert!(
        visitor.max_outstanding() <= 2,
        "observed {} outstanding visits with concurrency 2",
        visitor.max_outstanding()
    );
}

#[tokio::test]
async fn page_failures_are_absorbed_and_the_run_completes() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let visitor = Arc::new(
        site(&[
            (
                "https://a.test/seed",
                page(&[], &["https://a.test/broken", "https://a.test/fine"]),
            ),
            (
                "https://a.test/broken",
                page(&[], &["https://a.test/unreached"]),
            ),
            ("https://a.test/fine", page(&[("Ps 23:1", "Ps 23:1")], &[])),
        ])
        .with_failing(vec!["https://a.test/broken".to_string()]),
    );

    let orchestrator = CrawlOrchestrator::new(
        &config("https://a.test/seed", tmp.path()),
        Arc::clone(&visitor),
    );
    let frontier = orchestrator.frontier();

    orchestrator
        .run()
        .await
        .expect("failures must not abort the run");

    // The broken page counts as done; its links were lost with it.
    assert_eq!(frontier.seen_count(), 3);
    assert_eq!(frontier.completed_count(), 3);
    let visits = visitor.visits();
    assert!(!visits.contains(&"https://a.test/unreached".to_string()));
    assert!(tmp.path().join("a_test_fine.json").exists());
}
