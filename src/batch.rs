//! Batch downloading of resource URLs into a directory
//!
//! Every URL gets its own [`RetryingFetcher`] run; a failed URL is recorded in the
//! [`BatchReport`] and the batch moves on. Files are named from the 1-based input index, so
//! the output is deterministic no matter how many downloads run at once.

use crate::config::DownloadConfig;
use crate::error::{Error, Result};
use crate::fetch::{HttpFetcher, ResourceFetcher};
use crate::retry::RetryingFetcher;
use crate::types::{BatchReport, DownloadResult};
use crate::utils::{extension_from_url, render_index_template};
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Downloads an ordered list of URLs into a directory
pub struct BatchDownloader {
    fetcher: RetryingFetcher,
    config: DownloadConfig,
}

/// One planned download
struct Job {
    index: usize,
    url: String,
    path: PathBuf,
}

impl BatchDownloader {
    /// Create a downloader on top of any fetcher
    pub fn new(fetcher: Arc<dyn ResourceFetcher>, config: DownloadConfig) -> Self {
        Self {
            fetcher: RetryingFetcher::from_config(fetcher, &config),
            config,
        }
    }

    /// Create a downloader that fetches over HTTP
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created
    pub fn from_config(config: DownloadConfig) -> Result<Self> {
        let fetcher = HttpFetcher::new(&config.user_agent)?;
        Ok(Self::new(Arc::new(fetcher), config))
    }

    /// Download every URL and summarize the outcome
    ///
    /// `template` names each file from its 1-based index (see
    /// [`render_index_template`](crate::utils::render_index_template)); the extension is
    /// derived from the URL.
    ///
    /// # Errors
    /// Only an invalid template or an output directory that cannot be created is an error.
    /// Failed downloads are reported in the returned [`BatchReport`].
    pub async fn download_all(
        &self,
        urls: &[String],
        output_dir: &Path,
        template: &str,
    ) -> Result<BatchReport> {
        let results = self.download_each(urls, output_dir, template).await?;
        let report = BatchReport::from_results(&results);

        tracing::info!(
            total = report.total,
            success = report.success,
            failed = report.failed,
            dir = %output_dir.display(),
            "batch download finished"
        );
        Ok(report)
    }

    /// Download every URL and return the per-URL results in input order
    pub async fn download_each(
        &self,
        urls: &[String],
        output_dir: &Path,
        template: &str,
    ) -> Result<Vec<DownloadResult>> {
        let jobs = self.plan(urls, output_dir, template)?;

        tokio::fs::create_dir_all(output_dir)
            .await
            .map_err(|e| Error::File {
                operation: "create directory",
                path: output_dir.to_path_buf(),
                source: e,
            })?;

        let pacer = RequestPacer::new(self.config.delay_between_requests);
        let concurrency = self.config.concurrency.max(1);
        tracing::debug!(count = jobs.len(), concurrency, "starting batch download");

        let mut results: Vec<(usize, DownloadResult)> = futures::stream::iter(jobs)
            .map(|job| {
                let pacer = &pacer;
                async move {
                    pacer.wait_turn().await;
                    let result = self.fetcher.fetch_with_retry(&job.url, &job.path).await;
                    pacer.mark().await;
                    if !result.success {
                        tracing::warn!(
                            url = %job.url,
                            attempts = result.attempts,
                            error = result.error.as_deref().unwrap_or("unknown"),
                            "giving up on resource"
                        );
                    }
                    (job.index, result)
                }
            })
            .buffer_unordered(concurrency)
            .collect()
            .await;

        results.sort_by_key(|(index, _)| *index);
        Ok(results.into_iter().map(|(_, result)| result).collect())
    }

    fn plan(&self, urls: &[String], output_dir: &Path, template: &str) -> Result<Vec<Job>> {
        urls.iter()
            .enumerate()
            .map(|(index, url)| {
                let stem = render_index_template(template, index + 1)?;
                let extension = extension_from_url(
                    url,
                    &self.config.default_extension,
                    self.config.max_extension_len,
                );
                Ok(Job {
                    index,
                    url: url.clone(),
                    path: output_dir.join(format!("{}.{}", stem, extension)),
                })
            })
            .collect()
    }
}

/// Keeps consecutive requests at least `spacing` apart
///
/// A request may not start until `spacing` has passed since the last request started or
/// finished. The first request starts immediately.
struct RequestPacer {
    spacing: Duration,
    last: Mutex<Option<Instant>>,
}

impl RequestPacer {
    fn new(spacing: Duration) -> Self {
        Self {
            spacing,
            last: Mutex::new(None),
        }
    }

    async fn wait_turn(&self) {
        let mut last = self.last.lock().await;
        if let Some(previous) = *last {
            tokio::time::sleep_until(previous + self.spacing).await;
        }
        *last = Some(Instant::now());
    }

    async fn mark(&self) {
        *self.last.lock().await = Some(Instant::now());
    }
}
