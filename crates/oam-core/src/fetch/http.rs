//! Single GET per URL with libcurl, body buffered in memory.

use std::time::Duration;

use super::credentials::Credentials;
use super::error::{classify_curl_error, FetchError};
use super::SourceFetcher;

/// Blocking fetcher backed by a fresh `curl::easy::Easy` per request.
#[derive(Debug, Clone)]
pub struct CurlFetcher {
    credentials: Option<Credentials>,
    connect_timeout: Duration,
    timeout: Duration,
}

impl CurlFetcher {
    pub fn new(credentials: Option<Credentials>) -> Self {
        Self {
            credentials,
            connect_timeout: Duration::from_secs(30),
            timeout: Duration::from_secs(300),
        }
    }

    pub fn with_timeouts(mut self, connect_timeout: Duration, timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self.timeout = timeout;
        self
    }

    pub fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    fn configure(&self, easy: &mut curl::easy::Easy, url: &str) -> Result<(), curl::Error> {
        easy.url(url)?;
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(self.timeout)?;
        easy.useragent(concat!("oam/", env!("CARGO_PKG_VERSION")))?;
        if let Some(creds) = &self.credentials {
            let mut auth = curl::easy::Auth::new();
            auth.basic(true);
            easy.http_auth(&auth)?;
            easy.username(creds.username())?;
            easy.password(creds.token())?;
        }
        Ok(())
    }
}

impl SourceFetcher for CurlFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let mut body = Vec::new();
        let mut easy = curl::easy::Easy::new();
        self.configure(&mut easy, url)
            .map_err(|e| classify_curl_error(url, &e))?;

        {
            let mut transfer = easy.transfer();
            transfer
                .write_function(|data| {
                    body.extend_from_slice(data);
                    Ok(data.len())
                })
                .map_err(|e| classify_curl_error(url, &e))?;
            transfer
                .perform()
                .map_err(|e| classify_curl_error(url, &e))?;
        }

        let code = easy
            .response_code()
            .map_err(|e| classify_curl_error(url, &e))?;
        if code != 200 {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                code,
            });
        }
        tracing::debug!(url, bytes = body.len(), "fetched");
        Ok(body)
    }
}
