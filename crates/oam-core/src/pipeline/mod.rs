//! Bounded-concurrency fetch pipeline.
//!
//! The orchestrator takes an admission permit per job, registers it with the
//! completion tracker and hands it to a worker thread. Workers resolve bytes
//! through the shared URL cache (fetching on a miss) and pass them to the
//! sink. Permit and ticket are dropped on every worker exit path, so the
//! orchestrator's final `wait_all` cannot miss a worker.

mod admission;
mod orchestrate;
mod tracker;
mod worker;

pub use admission::{AdmissionCancelled, AdmissionLimiter, AdmissionPermit};
pub use orchestrate::Pipeline;
pub use tracker::{CompletionTicket, CompletionTracker};
pub use worker::{JobError, Outcome};

/// Default number of fetches allowed in flight.
pub const DEFAULT_MAX_CONCURRENT: usize = 20;
