//! Run-scoped memoization of fetched payloads, keyed by resolved URL.
//!
//! Entries are written once and read many times; there is no eviction or
//! expiry. `get_or_fetch` collapses concurrent first-time fetches of the same
//! URL into one: followers wait for the leader and then read its entry.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// Fetched bytes, shared between every job that resolves to the same URL.
pub type Payload = Arc<[u8]>;

/// Result of `get_or_fetch`: the payload and whether it came from the cache.
#[derive(Debug, Clone)]
pub struct CacheLookup {
    pub payload: Payload,
    pub hit: bool,
}

#[derive(Debug, Default)]
pub struct UrlCache {
    entries: RwLock<HashMap<String, Payload>>,
    /// Per-URL gate held by the worker currently fetching that URL. Removed once
    /// the URL is stored; kept after a failure so waiters stay serialized.
    in_flight: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl UrlCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, url: &str) -> Option<Payload> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(url)
            .cloned()
    }

    /// Store `bytes` for `url`. Storing the same URL again replaces the entry.
    pub fn store(&self, url: &str, bytes: impl Into<Payload>) -> Payload {
        let payload: Payload = bytes.into();
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(url.to_string(), Arc::clone(&payload));
        payload
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return the cached payload for `url`, or run `fetch` and cache its bytes.
    ///
    /// At most one `fetch` per URL runs at a time. A failed fetch stores
    /// nothing; the next waiter then runs its own `fetch`.
    pub fn get_or_fetch<E, F>(&self, url: &str, fetch: F) -> Result<CacheLookup, E>
    where
        F: FnOnce() -> Result<Vec<u8>, E>,
    {
        if let Some(payload) = self.lookup(url) {
            return Ok(CacheLookup { payload, hit: true });
        }

        let gate = {
            let mut flights = self
                .in_flight
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            Arc::clone(flights.entry(url.to_string()).or_default())
        };
        let _leader = gate.lock().unwrap_or_else(PoisonError::into_inner);

        // Another worker may have finished while we waited on the gate.
        if let Some(payload) = self.lookup(url) {
            return Ok(CacheLookup { payload, hit: true });
        }

        let bytes = fetch()?;
        let payload = self.store(url, bytes);
        // Later callers hit `entries` before reaching the gate.
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(url);
        Ok(CacheLookup {
            payload,
            hit: false,
        })
    }
}
