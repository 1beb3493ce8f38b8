//! Configuration types for hotlist-dl
//!
//! A [`Config`] is built once at startup (defaults or a JSON file) and handed by value or
//! reference to the components that need it. Nothing reads or mutates it afterwards.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Feed proxy settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Base URL of the text-extraction proxy (default: "https://r.jina.ai/rebang.today")
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Request timeout for a feed fetch (default: 30 seconds)
    #[serde(default = "default_timeout", with = "duration_serde")]
    pub timeout: Duration,

    /// User-Agent header sent to the proxy
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Item limit used when the caller does not give one (default: 50)
    #[serde(default = "default_limit")]
    pub default_limit: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            timeout: default_timeout(),
            user_agent: default_user_agent(),
            default_limit: default_limit(),
        }
    }
}

/// Batch download behavior
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Timeout for a single fetch attempt (default: 30 seconds)
    #[serde(default = "default_timeout", with = "duration_serde")]
    pub timeout: Duration,

    /// Retry policy applied to every URL
    #[serde(default)]
    pub retry: RetryConfig,

    /// Minimum pause between two consecutive requests (default: 1 second)
    #[serde(default = "default_request_delay", with = "duration_serde")]
    pub delay_between_requests: Duration,

    /// Extension used when none can be derived from the URL (default: "bin")
    #[serde(default = "default_extension")]
    pub default_extension: String,

    /// Longest extension accepted from a URL path (default: 5)
    #[serde(default = "default_max_extension_len")]
    pub max_extension_len: usize,

    /// Number of URLs downloaded at the same time (default: 1 = sequential)
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// User-Agent header sent with resource requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            retry: RetryConfig::default(),
            delay_between_requests: default_request_delay(),
            default_extension: default_extension(),
            max_extension_len: default_max_extension_len(),
            concurrency: default_concurrency(),
            user_agent: default_user_agent(),
        }
    }
}

impl DownloadConfig {
    /// Retry policy with the delay resolved against the fetch timeout
    pub fn retry_policy(&self) -> RetryConfig {
        RetryConfig {
            delay: Some(self.retry.initial_delay(self.timeout)),
            ..self.retry.clone()
        }
    }
}

/// Retry configuration for failed fetches
///
/// `max_attempts` counts every attempt, the first one included. The default of 4 is one
/// initial attempt plus three retries. With the default multiplier of 1.0 the delay between
/// attempts is fixed. An unset `delay` means "wait as long as the fetch timeout".
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total number of attempts per resource (default: 4)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the first retry (default: unset, which means the fetch timeout)
    #[serde(
        default,
        with = "optional_duration_serde",
        skip_serializing_if = "Option::is_none"
    )]
    pub delay: Option<Duration>,

    /// Upper bound for the delay when a multiplier is set (default: 300 seconds)
    #[serde(default = "default_max_delay", with = "duration_serde")]
    pub max_delay: Duration,

    /// Multiplier applied to the delay after each retry (default: 1.0)
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Add random jitter to delays (default: false)
    #[serde(default)]
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay: None,
            max_delay: default_max_delay(),
            backoff_multiplier: default_backoff_multiplier(),
            jitter: false,
        }
    }
}

impl RetryConfig {
    /// Delay before the first retry, `fallback` when none is configured
    pub fn initial_delay(&self, fallback: Duration) -> Duration {
        self.delay.unwrap_or(fallback)
    }
}

/// Main configuration for hotlist-dl
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Config {
    /// Feed proxy settings
    #[serde(default)]
    pub feed: FeedConfig,

    /// Batch download settings
    #[serde(default)]
    pub download: DownloadConfig,
}

impl Config {
    /// Load a configuration from a JSON file
    ///
    /// Missing fields take their defaults. The result is validated before it is returned.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| Error::File {
            operation: "read config",
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Config = serde_json::from_str(&raw)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Check settings that would make the downloader misbehave
    pub fn validate(&self) -> Result<()> {
        if self.feed.api_base.trim().is_empty() {
            return Err(Error::config("feed.api_base", "must not be empty"));
        }
        if self.feed.timeout.is_zero() {
            return Err(Error::config("feed.timeout", "must be greater than zero"));
        }
        if self.download.timeout.is_zero() {
            return Err(Error::config("download.timeout", "must be greater than zero"));
        }
        if self.download.concurrency == 0 {
            return Err(Error::config("download.concurrency", "must be at least 1"));
        }
        if self.download.default_extension.is_empty() {
            return Err(Error::config(
                "download.default_extension",
                "must not be empty",
            ));
        }
        if self.download.retry.max_attempts == 0 {
            return Err(Error::config(
                "download.retry.max_attempts",
                "must be at least 1",
            ));
        }
        let multiplier = self.download.retry.backoff_multiplier;
        if multiplier.is_nan() || multiplier < 1.0 {
            return Err(Error::config(
                "download.retry.backoff_multiplier",
                "must be 1.0 or greater",
            ));
        }
        Ok(())
    }
}

fn default_api_base() -> String {
    "https://r.jina.ai/rebang.today".to_string()
}

/// Fetch timeout, also the retry delay when nothing else applies
pub(crate) const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

fn default_timeout() -> Duration {
    DEFAULT_TIMEOUT
}

fn default_user_agent() -> String {
    concat!("hotlist-dl/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_limit() -> usize {
    50
}

fn default_request_delay() -> Duration {
    Duration::from_secs(1)
}

fn default_extension() -> String {
    "bin".to_string()
}

fn default_max_extension_len() -> usize {
    5
}

fn default_concurrency() -> usize {
    1
}

fn default_max_attempts() -> u32 {
    4
}

fn default_max_delay() -> Duration {
    Duration::from_secs(300)
}

fn default_backoff_multiplier() -> f64 {
    1.0
}

// Duration serialization helper (whole seconds)
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

// Optional duration in whole seconds; absent or null means unset
mod optional_duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration {
            Some(duration) => serializer.serialize_some(&duration.as_secs()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_secs))
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.feed.api_base, "https://r.jina.ai/rebang.today");
        assert_eq!(config.feed.default_limit, 50);
        assert_eq!(config.download.timeout, Duration::from_secs(30));
        assert_eq!(config.download.retry.delay, None);
        assert_eq!(
            config.download.retry_policy().initial_delay(Duration::ZERO),
            config.download.timeout,
            "retry delay defaults to the fetch timeout"
        );
        assert_eq!(config.download.retry.max_attempts, 4);
        assert_eq!(config.download.default_extension, "bin");
        assert_eq!(config.download.max_extension_len, 5);
        assert_eq!(config.download.concurrency, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let json = r#"{ "download": { "timeout": 10, "retry": { "max_attempts": 2 } } }"#;
        let config: Config = serde_json::from_str(json).expect("deserialize failed");

        assert_eq!(config.download.timeout, Duration::from_secs(10));
        assert_eq!(config.download.retry.max_attempts, 2);
        assert_eq!(config.download.retry.delay, None);
        assert_eq!(
            config.download.retry_policy().initial_delay(Duration::ZERO),
            Duration::from_secs(10),
            "unset retry delay follows the configured timeout"
        );
        assert_eq!(config.download.delay_between_requests, Duration::from_secs(1));
        assert_eq!(config.feed.default_limit, 50);
    }

    #[test]
    fn durations_serialize_as_seconds() {
        let json = serde_json::to_value(DownloadConfig::default()).expect("serialize failed");
        assert_eq!(json["timeout"], 30);
        assert_eq!(json["delay_between_requests"], 1);
        assert!(json["retry"].get("delay").is_none());
    }

    #[test]
    fn retry_delay_follows_timeout_unless_set() {
        let config: Config =
            serde_json::from_str(r#"{ "download": { "timeout": 5 } }"#).unwrap();
        assert_eq!(
            config.download.retry_policy().delay,
            Some(Duration::from_secs(5))
        );

        let config: Config = serde_json::from_str(
            r#"{ "download": { "timeout": 5, "retry": { "delay": 2 } } }"#,
        )
        .unwrap();
        assert_eq!(
            config.download.retry_policy().delay,
            Some(Duration::from_secs(2))
        );

        let config: Config =
            serde_json::from_str(r#"{ "download": { "retry": { "delay": null } } }"#).unwrap();
        assert_eq!(config.download.retry.delay, None);

        let round_trip: RetryConfig =
            serde_json::from_value(serde_json::to_value(RetryConfig {
                delay: Some(Duration::from_secs(7)),
                ..RetryConfig::default()
            })
            .unwrap())
            .unwrap();
        assert_eq!(round_trip.delay, Some(Duration::from_secs(7)));
    }

    #[test]
    fn validate_rejects_zero_concurrency() {
        let mut config = Config::default();
        config.download.concurrency = 0;
        match config.validate() {
            Err(Error::Config { key, .. }) => {
                assert_eq!(key.as_deref(), Some("download.concurrency"))
            }
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_zero_attempts_and_shrinking_backoff() {
        let mut config = Config::default();
        config.download.retry.max_attempts = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.download.retry.backoff_multiplier = 0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn from_json_file_reads_and_validates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        std::fs::write(&path, r#"{ "feed": { "default_limit": 20 } }"#).unwrap();
        let config = Config::from_json_file(&path).unwrap();
        assert_eq!(config.feed.default_limit, 20);

        std::fs::write(&path, r#"{ "download": { "concurrency": 0 } }"#).unwrap();
        assert!(Config::from_json_file(&path).is_err());

        let missing = dir.path().join("missing.json");
        assert!(matches!(
            Config::from_json_file(&missing),
            Err(Error::File { .. })
        ));
    }
}
