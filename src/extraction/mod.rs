//! Streaming bzip2 extraction
//!
//! Decompresses every `.bz2` file directly under a directory into a sibling
//! file with the suffix stripped. Decompression is incremental: each worker
//! reads fixed-size blocks through a [`MultiBzDecoder`], so memory use is
//! bounded by the block size regardless of archive size. Wikipedia dumps
//! may be multi-stream bz2 files, which the multi-stream decoder handles.


use crate::error::{Error, ExtractionError, Result};
use crate::types::{BatchReport, Event, TaskFailure};
use bzip2::read::MultiBzDecoder;
use futures::stream::{self, StreamExt};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tokio::sync::broadcast;
use tokio::task::spawn_blocking;
use tracing::{info, warn};

/// Archive filename suffix recognized by the extraction pipeline
pub const ARCHIVE_SUFFIX: &str = ".bz2";

/// Check whether a path names a recognized archive
#[must_use]
pub fn is_archive(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(ARCHIVE_SUFFIX))
}

/// Destination path for an archive: the source with the suffix stripped
///
/// Returns `None` for paths without the archive suffix. The result always
/// differs from the source, so an extraction never overwrites its input.
#[must_use]
pub fn extraction_output_path(archive: &Path) -> Option<PathBuf> {
    let name = archive.file_name()?.to_str()?;
    let stripped = name.strip_suffix(ARCHIVE_SUFFIX)?;
    if stripped.is_empty() {
        return None;
    }
    Some(archive.with_file_name(stripped))
}

/// Decompress every archive directly under `input_dir` through a worker pool
///
/// Enumeration is non-recursive and skips non-regular files and files whose
/// suffix is the entire name. One task per archive; a corrupt archive fails
/// its own task only, and the batch always runs to completion (barrier
/// join). Directory enumeration failure is the only fatal error.
pub async fn extract_all(
    input_dir: &Path,
    concurrency: usize,
    block_size: usize,
    event_tx: &broadcast::Sender<Event>,
) -> Result<BatchReport> {
    let archives = enumerate_archives(input_dir).await?;
    let concurrency = concurrency.max(1);

    info!(
        input_dir = %input_dir.display(),
        archive_count = archives.len(),
        concurrency,
        "dispatching extraction tasks"
    );

    let results: Vec<std::result::Result<String, TaskFailure>> = stream::iter(archives)
        .map(|archive| async move {
            let name = archive.display().to_string();
            event_tx
                .send(Event::ExtractionStarted {
                    archive: archive.clone(),
                })
                .ok();

            match extract_one(archive.clone(), block_size).await {
                Ok(output) => {
                    info!(archive = %name, output = %output.display(), "extraction complete");
                    event_tx
                        .send(Event::ExtractionComplete { archive, output })
                        .ok();
                    Ok(name)
                }
                Err(e) => {
                    warn!(archive = %name, error = %e, "extraction failed");
                    event_tx
                        .send(Event::ExtractionFailed {
                            archive,
                            error: e.to_string(),
                        })
                        .ok();
                    Err(TaskFailure {
                        name,
                        error: Error::Extraction(e),
                    })
                }
            }
        })
        .buffer_unordered(concurrency)
        .collect()
        .await;

    Ok(BatchReport::tally(results))
}

/// List archive files directly under `input_dir`, sorted by name
async fn enumerate_archives(input_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut archives = Vec::new();
    let mut entries = tokio::fs::read_dir(input_dir).await?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if entry.file_type().await?.is_file()
            && is_archive(&path)
            && extraction_output_path(&path).is_some()
        {
            archives.push(path);
        }
    }

    archives.sort();
    Ok(archives)
}

/// Run one streaming decompression on the blocking thread pool
async fn extract_one(
    archive: PathBuf,
    block_size: usize,
) -> std::result::Result<PathBuf, ExtractionError> {
    let archive_for_panic = archive.clone();
    spawn_blocking(move || decompress_file(&archive, block_size))
        .await
        .map_err(|e| ExtractionError::TaskPanicked {
            archive: archive_for_panic,
            reason: e.to_string(),
        })?
}

/// Decompress one archive into its suffix-stripped sibling
///
/// Reads decompressed output from the incremental decoder in `block_size`
/// chunks and writes each to the destination, opened truncate-create.
fn decompress_file(
    archive: &Path,
    block_size: usize,
) -> std::result::Result<PathBuf, ExtractionError> {
    let output_path =
        extraction_output_path(archive).ok_or_else(|| ExtractionError::Decompress {
            archive: archive.to_path_buf(),
            reason: format!("filename does not end with {}", ARCHIVE_SUFFIX),
        })?;

    let input = std::fs::File::open(archive).map_err(|e| ExtractionError::Read {
        archive: archive.to_path_buf(),
        source: e,
    })?;
    let mut decoder = MultiBzDecoder::new(input);

    let mut output = std::fs::File::create(&output_path).map_err(|e| ExtractionError::Write {
        path: output_path.clone(),
        source: e,
    })?;

    let mut block = vec![0u8; block_size.max(1)];
    loop {
        // Corrupt or truncated input surfaces here as a decoder error
        let n = decoder
            .read(&mut block)
            .map_err(|e| ExtractionError::Decompress {
                archive: archive.to_path_buf(),
                reason: e.to_string(),
            })?;
        if n == 0 {
            break;
        }
        output
            .write_all(&block[..n])
            .map_err(|e| ExtractionError::Write {
                path: output_path.clone(),
                source: e,
            })?;
    }

    Ok(output_path)
}
