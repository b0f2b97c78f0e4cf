//! Network layer: the `SourceFetcher` seam and its libcurl implementation.
//!
//! Fetchers are blocking; the pipeline calls them from worker threads.

mod credentials;
mod error;
mod http;

pub use self::credentials::Credentials;
pub use self::error::FetchError;
pub use self::http::CurlFetcher;

/// Retrieves the raw bytes behind a resolved URL.
///
/// Implementations must only return `Ok` for a complete 200 response body.
pub trait SourceFetcher: Send + Sync {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}
