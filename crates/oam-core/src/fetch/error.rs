//! Fetch error type and curl error classification.

/// Why a single fetch failed. Each variant is a job-level failure; none is retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Request could not be built or sent (DNS, connect, TLS, timeout...).
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },
    /// Server answered with something other than 200.
    #[error("failed to fetch {url}: HTTP {code}")]
    HttpStatus { url: String, code: u32 },
    /// Connection broke while draining the response body.
    #[error("reading body of {url} failed: {message}")]
    Read { url: String, message: String },
}

/// Body-level curl failures map to `Read`; everything else is `Transport`.
pub(super) fn classify_curl_error(url: &str, e: &curl::Error) -> FetchError {
    if e.is_recv_error()
        || e.is_partial_file()
        || e.is_read_error()
        || e.is_bad_content_encoding()
    {
        return FetchError::Read {
            url: url.to_string(),
            message: e.to_string(),
        };
    }
    FetchError::Transport {
        url: url.to_string(),
        message: e.to_string(),
    }
}
