//! Trending feed aggregation
//!
//! [`FeedClient`] pulls the proxied page text for a platform; [`FeedAggregator`] runs the
//! platform's adapter over it and wraps the items in a [`FeedEnvelope`].

use crate::adapters::adapter_for;
use crate::config::FeedConfig;
use crate::error::{Error, Result};
use crate::types::{FeedEnvelope, Platform};
use chrono::{DateTime, Local};
use tracing::{debug, info};

/// HTTP client for the text-extraction proxy
#[derive(Clone, Debug)]
pub struct FeedClient {
    http_client: reqwest::Client,
    api_base: String,
}

impl FeedClient {
    /// Create a client from the feed configuration
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created
    pub fn new(config: &FeedConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| Error::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    /// Proxy URL for a platform's tab
    pub fn feed_url(&self, platform: Platform) -> String {
        format!(
            "{}/?tab={}",
            self.api_base,
            urlencoding::encode(platform.tab())
        )
    }

    /// Fetch the raw page text for a platform
    ///
    /// # Errors
    /// Returns error if the request fails, times out or answers with a non-2xx status
    pub async fn fetch_text(&self, platform: Platform) -> Result<String> {
        let url = self.feed_url(platform);
        debug!(%url, "fetching trending page");

        let response = self.http_client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                status: status.as_u16(),
                url,
            });
        }

        Ok(response.text().await?)
    }
}

/// Turns platform page text into a feed envelope
pub struct FeedAggregator;

impl FeedAggregator {
    /// Extract up to `limit` items from `text`, stamped with the current local time
    ///
    /// An envelope with zero items is still a valid result.
    pub fn aggregate(platform: Platform, text: &str, limit: usize) -> FeedEnvelope {
        Self::aggregate_at(platform, text, limit, Local::now())
    }

    /// Same as [`aggregate`](Self::aggregate) with an explicit fetch time
    pub fn aggregate_at(
        platform: Platform,
        text: &str,
        limit: usize,
        fetch_time: DateTime<Local>,
    ) -> FeedEnvelope {
        let adapter = adapter_for(platform);
        let items = adapter.extract(text, limit);
        debug!(
            platform = platform.code(),
            adapter = adapter.name(),
            count = items.len(),
            "extracted items"
        );

        FeedEnvelope {
            platform: platform.code().to_string(),
            platform_name: platform.tab().to_string(),
            fetch_time,
            count: items.len(),
            items,
        }
    }

    /// Fetch a platform's page and aggregate it
    ///
    /// # Errors
    /// Returns error if the page cannot be fetched
    pub async fn fetch(client: &FeedClient, platform: Platform, limit: usize) -> Result<FeedEnvelope> {
        let text = client.fetch_text(platform).await?;
        let envelope = Self::aggregate(platform, &text, limit);
        info!(
            platform = platform.code(),
            count = envelope.count,
            "fetched trending list"
        );
        Ok(envelope)
    }
}
