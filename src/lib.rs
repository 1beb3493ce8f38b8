//! # hotlist-dl
//!
//! Trending-list scraper and batch resource downloader.
//!
//! ## Overview
//!
//! hotlist-dl has two halves:
//! - **Feeds** - pull a platform's trending page through a text-extraction proxy, parse it with
//!   the platform's grammar and emit ranked items as JSON
//! - **Downloads** - fetch a list of resource URLs into a directory with per-URL retries,
//!   deterministic file names and a success/failure report
//!
//! ## Quick Start
//!
//! ```no_run
//! use hotlist_dl::{BatchDownloader, Config, FeedAggregator, FeedClient, Platform};
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!
//!     let client = FeedClient::new(&config.feed)?;
//!     let feed = FeedAggregator::fetch(&client, Platform::Xhs, 10).await?;
//!     println!("{}", serde_json::to_string_pretty(&feed)?);
//!
//!     let downloader = BatchDownloader::from_config(config.download)?;
//!     let urls = vec!["https://example.com/cover.jpg".to_string()];
//!     let report = downloader
//!         .download_all(&urls, Path::new("images"), "file_{:03d}")
//!         .await?;
//!     println!("{} of {} downloaded", report.success, report.total);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Per-platform text grammars
pub mod adapters;
/// Feed fetching and aggregation
pub mod aggregator;
/// Batch downloading
pub mod batch;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Single-shot resource fetching
pub mod fetch;
/// Popularity figure parsing
pub mod heat;
/// Retry logic with configurable backoff
pub mod retry;
/// Core types
pub mod types;
/// Utility functions
pub mod utils;

// Re-export commonly used types
pub use adapters::{PlatformAdapter, adapter_for, extract_for_code};
pub use aggregator::{FeedAggregator, FeedClient};
pub use batch::BatchDownloader;
pub use config::{Config, DownloadConfig, FeedConfig, RetryConfig};
pub use error::{Error, Result};
pub use fetch::{HttpFetcher, ResourceFetcher};
pub use heat::parse_heat;
pub use retry::{IsRetryable, RetryingFetcher};
pub use types::{BatchReport, DownloadResult, FeedEnvelope, Platform, RankedItem, Trend};
