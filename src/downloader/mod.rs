//! Core downloader implementation
//!
//! [`WikiDownloader`] is the library facade: it owns the configuration, a
//! shared HTTP client, and the event channel, and exposes the two batch
//! operations (`download`, `extract`). The download pipeline itself is a
//! bounded worker pool over `StreamExt::buffer_unordered`: one task
//! per resolved href, fail-soft per task, barrier join before the report is
//! returned.

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;

use crate::config::Config;
use crate::error::{DownloadError, Error, Result};
use crate::types::{BatchReport, Event, TaskFailure};
use crate::{extraction, resolver, utils};
use futures::stream::{self, StreamExt};
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use url::Url;

/// Capacity of the broadcast event channel
const EVENT_CHANNEL_CAPACITY: usize = 1024;

/// Concurrent Wikipedia dump downloader and extractor
///
/// # Example
///
/// ```no_run
/// use wikidump_dl::{Config, WikiDownloader};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let downloader = WikiDownloader::new(Config::default())?;
///
///     // Subscribe to progress events
///     let mut events = downloader.subscribe();
///     tokio::spawn(async move {
///         while let Ok(event) = events.recv().await {
///             println!("Event: {:?}", event);
///         }
///     });
///
///     let report = downloader.download("en", "latest").await?;
///     println!("{} downloaded, {} failed", report.completed.len(), report.failures.len());
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct WikiDownloader {
    config: Config,
    client: reqwest::Client,
    event_tx: broadcast::Sender<Event>,
}

impl WikiDownloader {
    /// Create a downloader from the given configuration
    ///
    /// Validates the configured base URL and builds the shared HTTP client.
    pub fn new(config: Config) -> Result<Self> {
        Url::parse(&config.dump_base_url).map_err(|e| Error::Config {
            message: format!("invalid dump base URL {}: {}", config.dump_base_url, e),
            key: Some("dump_base_url".to_string()),
        })?;

        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::Other(format!("failed to build HTTP client: {}", e)))?;

        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Ok(Self {
            config,
            client,
            event_tx,
        })
    }

    /// Subscribe to pipeline events
    ///
    /// Events are dropped when no receiver exists; subscribing is optional.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    /// Access the active configuration
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Download every archive for a language/date into the download directory
    ///
    /// Resolves the index page (fatal on fetch failure), then downloads each
    /// matched archive through a worker pool of width
    /// `max_concurrent_downloads`. Per-file failures are collected into the
    /// returned [`BatchReport`] and never abort the batch; an index page
    /// with no matching archives yields an empty report.
    pub async fn download(&self, lang: &str, date: &str) -> Result<BatchReport> {
        let index_url = utils::dump_index_url(&self.config.dump_base_url, lang, date);

        let hrefs = resolver::resolve_archives(&self.client, &index_url, lang, date).await?;

        self.event_tx
            .send(Event::ArchivesResolved {
                index_url: index_url.clone(),
                count: hrefs.len(),
            })
            .ok();

        if hrefs.is_empty() {
            return Ok(BatchReport::default());
        }

        tokio::fs::create_dir_all(&self.config.download.download_dir).await?;

        Ok(download_all(
            &self.client,
            &hrefs,
            &index_url,
            &self.config.download.download_dir,
            self.config.download.max_concurrent_downloads,
            &self.event_tx,
        )
        .await)
    }

    /// Decompress every `.bz2` archive directly under `input_dir`
    ///
    /// See [`extraction::extract_all`]; concurrency and block size come
    /// from the configuration.
    pub async fn extract(&self, input_dir: &Path) -> Result<BatchReport> {
        extraction::extract_all(
            input_dir,
            self.config.extraction.max_concurrent_extractions,
            self.config.extraction.read_block_size,
            &self.event_tx,
        )
        .await
    }
}

/// Download a set of archive hrefs through a bounded worker pool
///
/// One task per href; completion order is unspecified. A failing task
/// leaves its partial file in place and does not cancel siblings. Blocks
/// until every task has finished, then returns the per-task report.
pub async fn download_all(
    client: &reqwest::Client,
    hrefs: &[String],
    index_url: &str,
    output_dir: &Path,
    concurrency: usize,
    event_tx: &broadcast::Sender<Event>,
) -> BatchReport {
    let concurrency = concurrency.max(1);

    info!(
        index_url,
        archive_count = hrefs.len(),
        concurrency,
        "dispatching download tasks"
    );

    let results: Vec<std::result::Result<String, TaskFailure>> = stream::iter(hrefs)
        .map(|href| async move {
            match download_one(client, index_url, href, output_dir, event_tx).await {
                Ok(bytes) => {
                    info!(href = %href, bytes, "download complete");
                    event_tx
                        .send(Event::DownloadComplete {
                            href: href.clone(),
                            bytes_received: bytes,
                        })
                        .ok();
                    Ok(href.clone())
                }
                Err(e) => {
                    warn!(href = %href, error = %e, "download failed");
                    event_tx
                        .send(Event::DownloadFailed {
                            href: href.clone(),
                            error: e.to_string(),
                        })
                        .ok();
                    Err(TaskFailure {
                        name: href.clone(),
                        error: Error::Download(e),
                    })
                }
            }
        })
        .buffer_unordered(concurrency)
        .collect()
        .await;

    BatchReport::tally(results)
}

/// Stream one archive to its destination file
///
/// Returns the number of bytes written. The response body is never buffered
/// whole; each received block is appended to the destination (opened in
/// truncate-create mode) and a progress event is emitted after every block.
async fn download_one(
    client: &reqwest::Client,
    index_url: &str,
    href: &str,
    output_dir: &Path,
    event_tx: &broadcast::Sender<Event>,
) -> std::result::Result<u64, DownloadError> {
    let url = utils::archive_url(index_url, href);
    let dest = utils::download_output_path(output_dir, href);

    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|e| DownloadError::Transport {
            href: href.to_string(),
            reason: e.to_string(),
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(DownloadError::HttpStatus {
            href: href.to_string(),
            status: status.as_u16(),
        });
    }

    // None when the server omits content-length; progress totals stay unknown
    let total_bytes = response.content_length();

    debug!(href = %href, url = %url, ?total_bytes, dest = %dest.display(), "streaming archive");
    event_tx
        .send(Event::DownloadStarted {
            href: href.to_string(),
            total_bytes,
        })
        .ok();

    let mut file = tokio::fs::File::create(&dest)
        .await
        .map_err(|e| DownloadError::Write {
            path: dest.clone(),
            source: e,
        })?;

    let mut bytes_received = 0u64;
    let mut body = response.bytes_stream();

    while let Some(block) = body.next().await {
        // A mid-stream transport error leaves the partial file in place
        let block = block.map_err(|e| DownloadError::Transport {
            href: href.to_string(),
            reason: e.to_string(),
        })?;

        file.write_all(&block)
            .await
            .map_err(|e| DownloadError::Write {
                path: dest.clone(),
                source: e,
            })?;

        bytes_received += block.len() as u64;
        event_tx
            .send(Event::DownloadProgress {
                href: href.to_string(),
                bytes_received,
                total_bytes,
            })
            .ok();
    }

    file.flush().await.map_err(|e| DownloadError::Write {
        path: dest.clone(),
        source: e,
    })?;

    Ok(bytes_received)
}
