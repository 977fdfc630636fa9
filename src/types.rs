//! Core types and events
//!
//! Events are broadcast over a `tokio::sync::broadcast` channel; consumers
//! subscribe via [`WikiDownloader::subscribe`](crate::WikiDownloader::subscribe).
//! Progress events are observability signals only and never drive control
//! flow inside the pipelines.

use crate::error::Error;
use std::path::PathBuf;

/// Events emitted by the download and extraction pipelines
#[derive(Debug, Clone)]
pub enum Event {
    /// The index page was fetched and filtered
    ArchivesResolved {
        /// The dump index URL that was scanned
        index_url: String,
        /// Number of archive hrefs that matched
        count: usize,
    },

    /// A download task opened its response stream
    DownloadStarted {
        /// The archive href being downloaded
        href: String,
        /// Expected total bytes, if the server sent a content-length
        total_bytes: Option<u64>,
    },

    /// Byte progress for one download task (emitted per received block)
    DownloadProgress {
        /// The archive href being downloaded
        href: String,
        /// Bytes received so far
        bytes_received: u64,
        /// Expected total bytes, `None` when the server omitted content-length
        total_bytes: Option<u64>,
    },

    /// A download task wrote its last block
    DownloadComplete {
        /// The archive href that finished
        href: String,
        /// Total bytes written to the destination file
        bytes_received: u64,
    },

    /// A download task failed; the partial file is left in place
    DownloadFailed {
        /// The archive href that failed
        href: String,
        /// Error message
        error: String,
    },

    /// An extraction task started decompressing
    ExtractionStarted {
        /// The archive being decompressed
        archive: PathBuf,
    },

    /// An extraction task finished
    ExtractionComplete {
        /// The archive that was decompressed
        archive: PathBuf,
        /// The decompressed output file
        output: PathBuf,
    },

    /// An extraction task failed
    ExtractionFailed {
        /// The archive that failed to decompress
        archive: PathBuf,
        /// Error message
        error: String,
    },
}

/// One failed task within a batch
#[derive(Debug)]
pub struct TaskFailure {
    /// Task name: the archive href (downloads) or path (extractions)
    pub name: String,
    /// The error that failed the task
    pub error: Error,
}

/// Per-task results of one `download` or `extract` batch
///
/// Both pipelines are fail-soft: every discoverable task is attempted and
/// individual failures never abort the batch, so overall success can only
/// be determined by inspecting this report.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Names of tasks that completed successfully, in completion order
    pub completed: Vec<String>,
    /// Tasks that failed, in completion order
    pub failures: Vec<TaskFailure>,
}

impl BatchReport {
    /// Build a report from per-task results in pool completion order
    pub(crate) fn tally(results: Vec<std::result::Result<String, TaskFailure>>) -> Self {
        let mut report = BatchReport::default();
        for result in results {
            match result {
                Ok(name) => report.completed.push(name),
                Err(failure) => report.failures.push(failure),
            }
        }
        report
    }

    /// Total number of tasks that were dispatched
    #[must_use]
    pub fn total(&self) -> usize {
        self.completed.len() + self.failures.len()
    }

    /// True when every dispatched task completed (including the empty batch)
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}
