// src/crawl/fetch.rs
// =============================================================================
// This module downloads a single page.
//
// One call = one GET request:
// - browser-like User-Agent header
// - fixed per-request timeout
// - no retries
//
// Any failure (network error, timeout, non-2xx status) is logged here and
// handed back as a FetchError. The traversal just abandons that branch.
// =============================================================================

use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("HTTP {0}")]
    Status(StatusCode),

    #[error("request failed: {0}")]
    Request(reqwest::Error),

    #[error("could not build HTTP client: {0}")]
    Client(reqwest::Error),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else {
            FetchError::Request(err)
        }
    }
}

// Thin wrapper around a reqwest Client, reused for every page of a run
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self { client })
    }

    // Fetches a page and returns its body as text
    pub async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        match self.get(url).await {
            Ok(html) => {
                debug!(url = %url, bytes = html.len(), "fetched page");
                Ok(html)
            }
            Err(e) => {
                warn!(url = %url, error = %e, "Error fetching page");
                Err(e)
            }
        }
    }

    async fn get(&self, url: &Url) -> Result<String, FetchError> {
        let response = self.client.get(url.clone()).send().await?;

        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }

        let html = response.text().await?;
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_USER_AGENT;
    use mockito::{Matcher, Server};

    fn fetcher() -> Fetcher {
        Fetcher::new(Duration::from_secs(10), DEFAULT_USER_AGENT).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_success_sends_user_agent() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/page")
            .match_header("user-agent", Matcher::Regex("^Mozilla/5.0".to_string()))
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<html><body>hello</body></html>")
            .expect(1)
            .create_async()
            .await;

        let url = Url::parse(&format!("{}/page", server.url())).unwrap();
        let html = fetcher().fetch(&url).await.unwrap();
        assert!(html.contains("hello"));

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/missing")
            .with_status(404)
            .with_body("not found")
            .expect(1)
            .create_async()
            .await;

        let url = Url::parse(&format!("{}/missing", server.url())).unwrap();
        let result = fetcher().fetch(&url).await;
        assert!(matches!(result, Err(FetchError::Status(StatusCode::NOT_FOUND))));

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        // Nothing listens on port 9 of localhost in the test environment
        let url = Url::parse("http://127.0.0.1:9/").unwrap();
        let result = fetcher().fetch(&url).await;
        assert!(matches!(
            result,
            Err(FetchError::Request(_)) | Err(FetchError::Timeout)
        ));
    }
}
