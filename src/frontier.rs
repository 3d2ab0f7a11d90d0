//! Crawl frontier: the ever-seen URL set plus completion bookkeeping.
//!
//! The seen-set is the single synchronization point preventing duplicate
//! visits. URLs are recorded exactly as handed in; the frontier applies no
//! normalization of its own, so two URLs differing only in trailing slash or
//! query order count as distinct entries.

use dashmap::DashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Monotonically growing set of URLs ever scheduled for a visit.
///
/// There is no removal operation: once seen, a URL stays seen for the run,
/// which is what lets cyclic link graphs terminate.
#[derive(Debug, Default)]
pub struct Frontier {
    seen: DashSet<String>,
    completed: AtomicUsize,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `url` as seen iff it was not seen before.
    ///
    /// `DashSet::insert` is the atomic check-and-set; callers may race from
    /// any number of tasks and exactly one of them gets `true` per URL.
    pub fn try_enqueue(&self, url: &str) -> bool {
        self.seen.insert(url.to_string())
    }

    /// Count one finished visit, successful or not.
    pub fn mark_completed(&self) {
        self.completed.fetch_add(1, Ordering::SeqCst);
    }

    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    pub fn completed_count(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}
