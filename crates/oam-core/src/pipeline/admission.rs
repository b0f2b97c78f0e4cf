//! Admission limiter: caps the number of fetches in flight.
//!
//! A permit is held for the whole life of a worker and gives its slot back when
//! dropped. `in_flight` and `peak_in_flight` are kept for instrumentation.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio_util::sync::CancellationToken;

/// `acquire` gave up because the run was cancelled. The job must be skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("admission cancelled")]
pub struct AdmissionCancelled;

#[derive(Debug, Default)]
struct InFlight {
    current: AtomicUsize,
    peak: AtomicUsize,
}

#[derive(Debug, Clone)]
pub struct AdmissionLimiter {
    semaphore: Arc<Semaphore>,
    counters: Arc<InFlight>,
    capacity: usize,
}

impl AdmissionLimiter {
    /// Create a limiter with `capacity` slots (at least 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            counters: Arc::new(InFlight::default()),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Permits currently held.
    pub fn in_flight(&self) -> usize {
        self.counters.current.load(Ordering::Acquire)
    }

    /// Highest number of permits held at once since creation.
    pub fn peak_in_flight(&self) -> usize {
        self.counters.peak.load(Ordering::Acquire)
    }

    /// Wait for a free slot, or fail with `AdmissionCancelled` once `cancel` fires.
    /// Cancellation wins when both are ready.
    pub async fn acquire(
        &self,
        cancel: &CancellationToken,
    ) -> Result<AdmissionPermit, AdmissionCancelled> {
        let permit = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(AdmissionCancelled),
            permit = Arc::clone(&self.semaphore).acquire_owned() => {
                permit.map_err(|_| AdmissionCancelled)?
            }
        };

        let now = self.counters.current.fetch_add(1, Ordering::AcqRel) + 1;
        self.counters.peak.fetch_max(now, Ordering::AcqRel);
        Ok(AdmissionPermit {
            counters: Arc::clone(&self.counters),
            _permit: permit,
        })
    }
}

/// Reserved slot. Dropping it releases the slot exactly once.
#[derive(Debug)]
pub struct AdmissionPermit {
    counters: Arc<InFlight>,
    _permit: OwnedSemaphorePermit,
}

impl Drop for AdmissionPermit {
    fn drop(&mut self) {
        // Runs before `_permit` is dropped, so the counter never exceeds capacity.
        self.counters.current.fetch_sub(1, Ordering::AcqRel);
    }
}
