//! Error types for hotlist-dl
//!
//! Feed parsing never fails: grammar mismatches and malformed numbers degrade to missing items or
//! missing heat values. The variants below cover the fallible edges of the crate:
//! - network fetches (transport failures, timeouts, non-2xx statuses)
//! - the filesystem (output directory, atomic file writes)
//! - configuration loading and validation

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for hotlist-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for hotlist-dl
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "download.concurrency")
        key: Option<String>,
    },

    /// Filesystem operation failed on a specific path
    #[error("failed to {operation} {path}: {source}")]
    File {
        /// What was being done (e.g., "create directory", "write")
        operation: &'static str,
        /// The path involved
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Remote answered with a non-success status
    #[error("HTTP {status} fetching {url}")]
    HttpStatus {
        /// Numeric HTTP status code
        status: u16,
        /// The URL that was requested
        url: String,
    },

    /// Request exceeded its deadline
    #[error("timeout fetching {url} (exceeded {timeout:?})")]
    Timeout {
        /// The URL that was requested
        url: String,
        /// The deadline that was exceeded
        timeout: Duration,
    },

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Platform code that no adapter handles
    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// File name template without a usable index slot
    #[error("invalid file name template: {0}")]
    InvalidTemplate(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Shorthand for a configuration error tied to a key
    pub fn config(key: &str, message: impl Into<String>) -> Self {
        Error::Config {
            message: message.into(),
            key: Some(key.to_string()),
        }
    }
}
