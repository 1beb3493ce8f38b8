//! Configurations tuned for fast tests

use hotlist_dl::{Config, DownloadConfig, FeedConfig, RetryConfig};
use std::time::Duration;

/// Retry budget with millisecond delays
pub fn quick_retry(max_attempts: u32) -> RetryConfig {
    RetryConfig {
        max_attempts,
        delay: Some(Duration::from_millis(10)),
        max_delay: Duration::from_millis(10),
        backoff_multiplier: 1.0,
        jitter: false,
    }
}

/// Download settings that keep a test run under a second
pub fn quick_download_config(max_attempts: u32, concurrency: usize) -> DownloadConfig {
    DownloadConfig {
        timeout: Duration::from_secs(2),
        retry: quick_retry(max_attempts),
        delay_between_requests: Duration::ZERO,
        concurrency,
        ..DownloadConfig::default()
    }
}

/// Full configuration pointing the feed client at a mock server
pub fn config_for_server(server_uri: &str) -> Config {
    Config {
        feed: FeedConfig {
            api_base: server_uri.to_string(),
            timeout: Duration::from_secs(5),
            ..FeedConfig::default()
        },
        download: quick_download_config(3, 1),
    }
}
