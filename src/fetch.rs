//! Single-shot resource fetching
//!
//! [`ResourceFetcher`] is the seam between the retry logic and the network. [`HttpFetcher`] is
//! the production implementation; tests plug in scripted fetchers.

use crate::error::{Error, Result};
use async_trait::async_trait;
use std::time::Duration;

/// Fetches one remote resource into memory
///
/// Implementations make exactly one request per call and wait at most `timeout` for it.
/// Every failure is returned as an `Err`; implementations never panic on bad input.
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    /// Fetch `url` and return the response body
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<Vec<u8>>;
}

/// reqwest-backed fetcher
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher sending the given User-Agent
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| Error::Other(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Wrap an existing client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResourceFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify(e, url, timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| classify(e, url, timeout))?;
        Ok(body.to_vec())
    }
}

fn classify(e: reqwest::Error, url: &str, timeout: Duration) -> Error {
    if e.is_timeout() {
        Error::Timeout {
            url: url.to_string(),
            timeout,
        }
    } else {
        Error::Network(e)
    }
}
