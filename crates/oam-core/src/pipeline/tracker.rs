//! Completion tracker: counting barrier between dispatched and finished workers.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

#[derive(Debug, Default)]
struct Counts {
    registered: AtomicUsize,
    completed: AtomicUsize,
    done: Notify,
}

#[derive(Debug, Clone, Default)]
pub struct CompletionTracker {
    counts: Arc<Counts>,
}

impl CompletionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more worker. Call before spawning it; the worker owns the ticket.
    pub fn register(&self) -> CompletionTicket {
        self.counts.registered.fetch_add(1, Ordering::AcqRel);
        CompletionTicket {
            counts: Arc::clone(&self.counts),
        }
    }

    pub fn registered(&self) -> usize {
        self.counts.registered.load(Ordering::Acquire)
    }

    pub fn completed(&self) -> usize {
        self.counts.completed.load(Ordering::Acquire)
    }

    /// Workers registered but not yet finished.
    fn pending(&self) -> usize {
        let completed = self.completed();
        self.registered().saturating_sub(completed)
    }

    /// Wait until every registered ticket has been dropped.
    pub async fn wait_all(&self) {
        loop {
            let notified = self.counts.done.notified();
            tokio::pin!(notified);
            // Register interest before checking so a completion in between is not lost.
            notified.as_mut().enable();
            if self.pending() == 0 {
                return;
            }
            notified.await;
        }
    }
}

/// Held by one worker. Dropping it signals completion exactly once.
#[derive(Debug)]
pub struct CompletionTicket {
    counts: Arc<Counts>,
}

impl Drop for CompletionTicket {
    fn drop(&mut self) {
        self.counts.completed.fetch_add(1, Ordering::AcqRel);
        self.counts.done.notify_waiters();
    }
}
