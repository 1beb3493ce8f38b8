//! Retry logic for resource fetches
//!
//! A fetch moves through `Pending → Attempting → {Success | RetryScheduled} → … →
//! {Success | Exhausted}`. [`download_with_retry`] drives that loop for any async operation;
//! [`RetryingFetcher`] applies it to a [`ResourceFetcher`] and writes the body atomically.
//!
//! # Example
//!
//! ```no_run
//! use hotlist_dl::retry::{IsRetryable, download_with_retry};
//! use hotlist_dl::config::RetryConfig;
//!
//! #[derive(Debug)]
//! enum MyError {
//!     Transient,
//!     Permanent,
//! }
//!
//! impl std::fmt::Display for MyError {
//!     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
//!         write!(f, "{:?}", self)
//!     }
//! }
//!
//! impl IsRetryable for MyError {
//!     fn is_retryable(&self) -> bool {
//!         matches!(self, MyError::Transient)
//!     }
//! }
//!
//! # async fn example() -> Result<(), MyError> {
//! let config = RetryConfig::default();
//! let outcome = download_with_retry(&config, || async {
//!     // Your operation here
//!     Ok::<_, MyError>(())
//! })
//! .await;
//! outcome.result?;
//! # Ok(())
//! # }
//! ```

use crate::config::{DEFAULT_TIMEOUT, DownloadConfig, RetryConfig};
use crate::error::{Error, Result};
use crate::fetch::ResourceFetcher;
use crate::types::DownloadResult;
use rand::Rng;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Trait for errors that can be classified as retryable or not
///
/// Transient failures (network errors, timeouts, bad statuses) should return `true`.
/// Permanent failures (invalid configuration, unwritable target) should return `false`.
pub trait IsRetryable {
    /// Returns true if the error is transient and the operation should be retried
    fn is_retryable(&self) -> bool;
}

impl IsRetryable for Error {
    fn is_retryable(&self) -> bool {
        match self {
            // Every transport-level failure gets another chance
            Error::Network(_) | Error::HttpStatus { .. } | Error::Timeout { .. } => true,
            // Writing the target failed; another download will not fix the disk
            Error::File { .. } => false,
            Error::Config { .. }
            | Error::Serialization(_)
            | Error::UnsupportedPlatform(_)
            | Error::InvalidTemplate(_)
            | Error::Other(_) => false,
        }
    }
}

/// Terminal state of a retried operation
#[must_use]
#[derive(Debug)]
pub struct RetryOutcome<T, E> {
    /// Value of the successful attempt, or the error of the last one
    pub result: std::result::Result<T, E>,
    /// Number of attempts made
    pub attempts: u32,
}

/// Execute an async operation with bounded retries
///
/// The operation runs at most `config.max_attempts` times (at least once). After a retryable
/// failure with attempts left, the loop sleeps for the current delay; the delay is multiplied
/// by `backoff_multiplier` after every retry and capped at `max_delay`. A non-retryable error
/// ends the loop immediately.
pub async fn download_with_retry<F, Fut, T, E>(
    config: &RetryConfig,
    mut operation: F,
) -> RetryOutcome<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
    E: IsRetryable + std::fmt::Display,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 0;
    let mut delay = config.initial_delay(DEFAULT_TIMEOUT);

    loop {
        attempt += 1;
        match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    tracing::info!(attempts = attempt, "Operation succeeded after retry");
                }
                return RetryOutcome {
                    result: Ok(result),
                    attempts: attempt,
                };
            }
            Err(e) if e.is_retryable() && attempt < max_attempts => {
                tracing::warn!(
                    error = %e,
                    attempt = attempt,
                    max_attempts = max_attempts,
                    delay_ms = delay.as_millis(),
                    "Operation failed, retrying"
                );

                let jittered_delay = if config.jitter {
                    add_jitter(delay)
                } else {
                    delay
                };
                tokio::time::sleep(jittered_delay).await;

                let next_delay =
                    Duration::from_secs_f64(delay.as_secs_f64() * config.backoff_multiplier);
                delay = next_delay.min(config.max_delay);
            }
            Err(e) => {
                if e.is_retryable() {
                    tracing::error!(
                        error = %e,
                        attempts = attempt,
                        "Operation failed after all retry attempts exhausted"
                    );
                } else {
                    tracing::error!(
                        error = %e,
                        "Operation failed with non-retryable error"
                    );
                }
                return RetryOutcome {
                    result: Err(e),
                    attempts: attempt,
                };
            }
        }
    }
}

/// Add random jitter to a delay
///
/// The actual delay will be between `delay` and `2 * delay`.
fn add_jitter(delay: Duration) -> Duration {
    let mut rng = rand::thread_rng();
    let jitter_factor: f64 = rng.gen_range(0.0..=1.0);
    let jittered_secs = delay.as_secs_f64() * (1.0 + jitter_factor);
    Duration::from_secs_f64(jittered_secs)
}

/// Fetches resources to disk with a bounded retry budget
#[derive(Clone)]
pub struct RetryingFetcher {
    fetcher: Arc<dyn ResourceFetcher>,
    retry: RetryConfig,
    timeout: Duration,
}

impl RetryingFetcher {
    /// Create a retrying fetcher with an explicit policy and per-attempt timeout
    ///
    /// A policy without a delay waits `timeout` between attempts.
    pub fn new(fetcher: Arc<dyn ResourceFetcher>, retry: RetryConfig, timeout: Duration) -> Self {
        let retry = RetryConfig {
            delay: Some(retry.initial_delay(timeout)),
            ..retry
        };
        Self {
            fetcher,
            retry,
            timeout,
        }
    }

    /// Create a retrying fetcher from the download settings
    pub fn from_config(fetcher: Arc<dyn ResourceFetcher>, config: &DownloadConfig) -> Self {
        Self::new(fetcher, config.retry_policy(), config.timeout)
    }

    /// Fetch `url` into `target`, retrying failed attempts
    ///
    /// On success the file at `target` holds exactly the body of the successful attempt.
    /// On failure no partial file is left behind.
    pub async fn fetch_with_retry(&self, url: &str, target: &Path) -> DownloadResult {
        let outcome = download_with_retry(&self.retry, move || async move {
            let body = self.fetcher.fetch(url, self.timeout).await?;
            write_atomic(target, &body).await
        })
        .await;

        match outcome.result {
            Ok(()) => {
                tracing::debug!(url, path = %target.display(), attempts = outcome.attempts, "downloaded");
                DownloadResult {
                    url: url.to_string(),
                    success: true,
                    error: None,
                    attempts: outcome.attempts,
                    path: Some(target.to_path_buf()),
                }
            }
            Err(e) => DownloadResult {
                url: url.to_string(),
                success: false,
                error: Some(e.to_string()),
                attempts: outcome.attempts,
                path: None,
            },
        }
    }
}

/// Write `bytes` to a sibling `.part` file and rename it over `target`
async fn write_atomic(target: &Path, bytes: &[u8]) -> Result<()> {
    let partial = partial_path(target);

    if let Err(e) = tokio::fs::write(&partial, bytes).await {
        let _ = tokio::fs::remove_file(&partial).await;
        return Err(Error::File {
            operation: "write",
            path: partial,
            source: e,
        });
    }

    if let Err(e) = tokio::fs::rename(&partial, target).await {
        let _ = tokio::fs::remove_file(&partial).await;
        return Err(Error::File {
            operation: "rename",
            path: target.to_path_buf(),
            source: e,
        });
    }

    Ok(())
}

fn partial_path(target: &Path) -> PathBuf {
    let mut name = target.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    target.with_file_name(name)
}
