//! Single-resolution completion signal for a crawl run.
//!
//! The signal is the run's terminal result: resolved to success when the
//! frontier drains, or to failure on an unrecoverable setup error. Resolving
//! it twice is a programming error and fails loudly instead of being
//! silently ignored.

use std::sync::Mutex;
use tokio::sync::oneshot;

use crate::error::{CrawlError, CrawlResult};

/// The resolving half of a completion signal.
#[derive(Debug)]
pub struct CompletionSignal {
    sender: Mutex<Option<oneshot::Sender<CrawlResult<()>>>>,
}

/// The awaiting half; consumed by `wait`.
#[derive(Debug)]
pub struct CompletionFuture {
    receiver: oneshot::Receiver<CrawlResult<()>>,
}

impl CompletionSignal {
    pub fn new() -> (CompletionSignal, CompletionFuture) {
        let (sender, receiver) = oneshot::channel();
        (
            CompletionSignal {
                sender: Mutex::new(Some(sender)),
            },
            CompletionFuture { receiver },
        )
    }

    /// Resolve the signal exactly once.
    ///
    /// Returns `CrawlError::SignalAlreadyResolved` on a second call; that is
    /// an invariant violation in the caller, not a recoverable condition.
    pub fn resolve(&self, outcome: CrawlResult<()>) -> CrawlResult<()> {
        let sender = self
            .sender
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .take()
            .ok_or(CrawlError::SignalAlreadyResolved)?;
        // The receiver being gone just means nobody is waiting anymore.
        let _ = sender.send(outcome);
        Ok(())
    }

    pub fn is_resolved(&self) -> bool {
        self.sender
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .is_none()
    }
}

impl CompletionFuture {
    /// Await the run's terminal result.
    ///
    /// A dropped-without-resolve signal surfaces as `SignalAbandoned`, the
    /// same invariant-violation class as double resolution.
    pub async fn wait(self) -> CrawlResult<()> {
        self.receiver
            .await
            .map_err(|_| CrawlError::SignalAbandoned)?
    }
}
