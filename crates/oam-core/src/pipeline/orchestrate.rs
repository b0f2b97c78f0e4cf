//! Orchestrator: admit, register, dispatch, then wait for every worker.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::cache::UrlCache;
use crate::fetch::SourceFetcher;
use crate::job::JobDescriptor;
use crate::sink::Sink;

use super::admission::AdmissionLimiter;
use super::tracker::CompletionTracker;
use super::worker::{report, run_job};

/// Shared state for one run: cache, limiter, tracker, and the injected
/// network and sink collaborators.
pub struct Pipeline {
    cache: Arc<UrlCache>,
    limiter: AdmissionLimiter,
    tracker: CompletionTracker,
    fetcher: Arc<dyn SourceFetcher>,
    sink: Arc<dyn Sink>,
}

impl Pipeline {
    pub fn new(
        fetcher: Arc<dyn SourceFetcher>,
        sink: Arc<dyn Sink>,
        max_concurrent: usize,
    ) -> Self {
        Self {
            cache: Arc::new(UrlCache::new()),
            limiter: AdmissionLimiter::new(max_concurrent),
            tracker: CompletionTracker::new(),
            fetcher,
            sink,
        }
    }

    pub fn cache(&self) -> &UrlCache {
        &self.cache
    }

    pub fn limiter(&self) -> &AdmissionLimiter {
        &self.limiter
    }

    pub fn tracker(&self) -> &CompletionTracker {
        &self.tracker
    }

    /// Dispatch every job and return once all dispatched workers have finished.
    ///
    /// Jobs whose admission is cancelled are skipped and never registered.
    /// Returns the number of dispatched jobs; per-job outcomes are only logged.
    pub async fn run<I>(&self, jobs: I, cancel: &CancellationToken) -> usize
    where
        I: IntoIterator<Item = JobDescriptor>,
    {
        let mut dispatched = 0usize;
        for job in jobs {
            let permit = match self.limiter.acquire(cancel).await {
                Ok(permit) => permit,
                Err(e) => {
                    tracing::warn!(name = job.name(), "Skipping {}: {}", job.name(), e);
                    continue;
                }
            };
            let ticket = self.tracker.register();

            let cache = Arc::clone(&self.cache);
            let fetcher = Arc::clone(&self.fetcher);
            let sink = Arc::clone(&self.sink);
            tokio::task::spawn_blocking(move || {
                // Dropped in reverse order: slot released, then completion signalled.
                let _ticket = ticket;
                let _permit = permit;
                let outcome = run_job(&job, &cache, fetcher.as_ref(), sink.as_ref());
                report(&job, &outcome);
            });
            dispatched += 1;
        }

        self.tracker.wait_all().await;
        tracing::debug!(dispatched, cached_urls = self.cache.len(), "batch finished");
        dispatched
    }
}
