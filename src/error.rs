//! Error types for wikidump-dl
//!
//! This module provides error handling for the library, including:
//! - A batch-fatal top-level [`Error`] type (index resolution, setup, I/O)
//! - Per-task error types ([`DownloadError`], [`ExtractionError`]) that are
//!   collected into a batch report instead of aborting sibling tasks

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for wikidump-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for wikidump-dl
///
/// Only index resolution failures and pipeline setup failures surface through
/// this type directly; per-file download and extraction failures are wrapped
/// in the [`Download`](Error::Download) and [`Extraction`](Error::Extraction)
/// variants and collected into a [`BatchReport`](crate::types::BatchReport)
/// rather than propagated.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "dump_base_url")
        key: Option<String>,
    },

    /// Dump index page unreachable or returned a non-success status
    ///
    /// This is fatal to the `download` operation: without the index page
    /// there is no task set to run.
    #[error("failed to fetch dump index {url}: {reason}")]
    IndexFetch {
        /// The index URL that could not be fetched
        url: String,
        /// The transport error or HTTP status that caused the failure
        reason: String,
    },

    /// Archive filename pattern failed to compile
    #[error("invalid archive pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// Per-file download failure (collected, not batch-fatal)
    #[error("download error: {0}")]
    Download(#[from] DownloadError),

    /// Per-file extraction failure (collected, not batch-fatal)
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Per-file download errors
///
/// One download task failing with any of these leaves sibling tasks running
/// and the partially written destination file in place.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Server returned a non-success status for an archive URL
    #[error("archive {href} returned HTTP {status}")]
    HttpStatus {
        /// The href whose resolved URL was rejected
        href: String,
        /// The HTTP status code returned by the server
        status: u16,
    },

    /// Transport failure while opening or streaming the response body
    #[error("transport error for {href}: {reason}")]
    Transport {
        /// The href being downloaded when the transport failed
        href: String,
        /// The underlying transport error
        reason: String,
    },

    /// Failed to create or write the destination file
    #[error("failed to write {path}: {source}")]
    Write {
        /// The destination path that could not be written
        path: PathBuf,
        /// The underlying I/O error
        source: std::io::Error,
    },
}

/// Per-file extraction errors
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The source archive could not be opened or read
    #[error("failed to read archive {archive}: {source}")]
    Read {
        /// The archive that could not be read
        archive: PathBuf,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// The decompressor rejected the archive (corrupt or truncated data)
    #[error("failed to decompress {archive}: {reason}")]
    Decompress {
        /// The archive that failed to decompress
        archive: PathBuf,
        /// The decompressor's error message
        reason: String,
    },

    /// Failed to create or write the decompressed output file
    #[error("failed to write {path}: {source}")]
    Write {
        /// The output path that could not be written
        path: PathBuf,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// The blocking extraction task panicked
    #[error("extraction task for {archive} panicked: {reason}")]
    TaskPanicked {
        /// The archive whose extraction task panicked
        archive: PathBuf,
        /// The join error message
        reason: String,
    },
}
