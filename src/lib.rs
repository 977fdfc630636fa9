//! # wikidump-dl
//!
//! Concurrent Wikipedia dump downloader and streaming bzip2 extractor.
//!
//! ## Design Philosophy
//!
//! wikidump-dl is designed to be:
//! - **Library-first** - No CLI or UI, purely a Rust crate for embedding
//! - **Fail-soft** - A batch attempts every task; one file failing never
//!   aborts its siblings, and the caller inspects the per-task report
//! - **Memory-bounded** - Downloads and decompression both stream in
//!   blocks, so memory use is independent of archive size
//! - **Event-driven** - Consumers subscribe to progress events, no polling
//!
//! ## Quick Start
//!
//! ```no_run
//! use wikidump_dl::{Config, WikiDownloader};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let downloader = WikiDownloader::new(Config::default())?;
//!
//!     // Download every pages-articles archive for the Czech wiki
//!     let report = downloader.download("cs", "latest").await?;
//!     for failure in &report.failures {
//!         eprintln!("{}: {}", failure.name, failure.error);
//!     }
//!
//!     // Decompress what landed in the download directory
//!     let dir = downloader.config().download.download_dir.clone();
//!     downloader.extract(&dir).await?;
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Core downloader implementation
pub mod downloader;
/// Error types
pub mod error;
/// Streaming bzip2 extraction
pub mod extraction;
/// Archive filename patterns
pub mod patterns;
/// Dump index resolution
pub mod resolver;
/// Core types and events
pub mod types;
/// URL templating and output path helpers
pub mod utils;

// Re-export commonly used types
pub use config::{Config, DownloadConfig, ExtractionConfig};
pub use downloader::{WikiDownloader, download_all};
pub use error::{DownloadError, Error, ExtractionError, Result};
pub use extraction::extract_all;
pub use resolver::resolve_archives;
pub use types::{BatchReport, Event, TaskFailure};
