//! Fetch worker body: cache or network, then sink, then one log line.

use std::path::PathBuf;

use crate::cache::UrlCache;
use crate::fetch::{FetchError, SourceFetcher};
use crate::job::JobDescriptor;
use crate::sink::{Sink, SinkError};

/// Why a job failed. Reported, never propagated past the worker.
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Sink(#[from] SinkError),
}

/// Terminal state of one job.
#[derive(Debug)]
pub enum Outcome {
    /// Bytes written to `path`; `cached` is true when no network call was made.
    Success { path: PathBuf, cached: bool },
    Failed(JobError),
}

/// Resolve `job` to bytes and hand them to `sink`. Never retries.
pub(super) fn run_job(
    job: &JobDescriptor,
    cache: &UrlCache,
    fetcher: &dyn SourceFetcher,
    sink: &dyn Sink,
) -> Outcome {
    let url = job.resolved_url();
    let lookup = match cache.get_or_fetch(&url, || fetcher.fetch(&url)) {
        Ok(lookup) => lookup,
        Err(e) => return Outcome::Failed(e.into()),
    };
    if lookup.hit {
        tracing::debug!(name = job.name(), url = %url, "cache hit");
    }

    match sink.write(job.output_root(), job.name(), &lookup.payload) {
        Ok(path) => Outcome::Success {
            path,
            cached: lookup.hit,
        },
        Err(e) => Outcome::Failed(e.into()),
    }
}

/// One line per terminal event.
pub(super) fn report(job: &JobDescriptor, outcome: &Outcome) {
    match outcome {
        Outcome::Success { path, cached } => {
            tracing::info!(name = job.name(), cached = *cached, "Saved {}", path.display());
        }
        Outcome::Failed(JobError::Fetch(FetchError::HttpStatus { url, code })) => {
            tracing::warn!(name = job.name(), status = *code, "Failed to fetch {}: HTTP {}", url, code);
        }
        Outcome::Failed(e) => {
            tracing::warn!(name = job.name(), "{}: {}", job.name(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::SourceCoordinates;
    use crate::sink::FsSink;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct StaticFetcher {
        calls: AtomicUsize,
        status: u32,
    }

    impl SourceFetcher for StaticFetcher {
        fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.status == 200 {
                Ok(format!("from {}", url).into_bytes())
            } else {
                Err(FetchError::HttpStatus {
                    url: url.to_string(),
                    code: self.status,
                })
            }
        }
    }

    fn job(name: &str, root: &std::path::Path) -> JobDescriptor {
        JobDescriptor::new(
            name,
            SourceCoordinates::new("org/r", "main", "openapi.yaml"),
            root,
            Arc::from("https://h"),
        )
    }

    #[test]
    fn miss_then_hit_writes_both() {
        let root = tempfile::tempdir().unwrap();
        let cache = UrlCache::new();
        let fetcher = StaticFetcher {
            calls: AtomicUsize::new(0),
            status: 200,
        };

        let first = run_job(&job("a", root.path()), &cache, &fetcher, &FsSink);
        let second = run_job(&job("b", root.path()), &cache, &fetcher, &FsSink);

        assert!(matches!(first, Outcome::Success { cached: false, .. }));
        assert!(matches!(second, Outcome::Success { cached: true, .. }));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
        let body = std::fs::read(root.path().join("b").join("b.yaml")).unwrap();
        assert_eq!(body, b"from https://h/org/r/main/openapi.yaml");
    }

    #[test]
    fn http_failure_writes_nothing() {
        let root = tempfile::tempdir().unwrap();
        let cache = UrlCache::new();
        let fetcher = StaticFetcher {
            calls: AtomicUsize::new(0),
            status: 404,
        };
        let j = job("missing", root.path());
        let outcome = run_job(&j, &cache, &fetcher, &FsSink);
        assert!(matches!(
            outcome,
            Outcome::Failed(JobError::Fetch(FetchError::HttpStatus { code: 404, .. }))
        ));
        assert!(!j.destination().exists());
        assert!(cache.is_empty());
    }
}
