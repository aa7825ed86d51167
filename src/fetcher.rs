// 🌐 Source Fetcher
// Retrieves raw documents (the HTML page, a remote rate CSV) as text.

use crate::error::{EtlError, EtlResult};
use std::time::Duration;

/// Anything that can turn a URL into a document body.
///
/// The pipeline only sees this trait, so tests swap in canned documents
/// instead of touching the network.
pub trait Fetcher {
    fn fetch(&self, url: &str) -> EtlResult<String>;
}

/// Blocking HTTP(S) fetcher
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> EtlResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent("Mozilla/5.0 (compatible; bank-etl/0.1)")
            .timeout(timeout)
            .build()?;

        Ok(HttpFetcher { client })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> EtlResult<String> {
        tracing::debug!(url, "fetching document");

        let response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(EtlError::Fetch(format!("GET {} returned {}", url, status)));
        }

        let body = response.text()?;
        tracing::debug!(url, bytes = body.len(), "document fetched");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[ignore = "opens a loopback socket"]
    fn test_unreachable_host_is_fetch_error() {
        let fetcher = HttpFetcher::new(Duration::from_secs(2)).unwrap();
        // Port 1 on loopback is never listening in CI
        let err = fetcher.fetch("http://127.0.0.1:1/").unwrap_err();
        assert!(matches!(err, EtlError::Fetch(_)), "got {:?}", err);
    }

    #[test]
    fn test_invalid_url_is_fetch_error() {
        let fetcher = HttpFetcher::new(Duration::from_secs(2)).unwrap();
        let err = fetcher.fetch("not a url").unwrap_err();
        assert!(matches!(err, EtlError::Fetch(_)));
    }
}
