//! Configuration types for wikidump-dl

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Download behavior configuration (directory, concurrency)
///
/// Groups settings related to how archives are fetched and stored.
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Download directory (default: "./data")
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,

    /// Maximum concurrent downloads (default: 3, floored to 1 at use)
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_downloads: usize,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            download_dir: default_download_dir(),
            max_concurrent_downloads: default_max_concurrent(),
        }
    }
}

/// Extraction behavior configuration (concurrency, block size)
///
/// Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Maximum concurrent extractions (default: 3, floored to 1 at use)
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent_extractions: usize,

    /// Block size in bytes for streaming decompression reads (default: 100 KiB)
    ///
    /// A tunable, not a correctness constraint: memory use per extraction
    /// task is bounded by this value regardless of archive size.
    #[serde(default = "default_read_block_size")]
    pub read_block_size: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_concurrent_extractions: default_max_concurrent(),
            read_block_size: default_read_block_size(),
        }
    }
}

/// Main configuration for [`WikiDownloader`](crate::WikiDownloader)
///
/// Sub-config fields are flattened for serialization, so the JSON/TOML
/// format stays flat (no nesting).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the dump mirror (default: "https://dumps.wikimedia.org")
    ///
    /// The per-language index URL is derived from this as
    /// `<dump_base_url>/<lang>wiki/<date>`.
    #[serde(default = "default_dump_base_url")]
    pub dump_base_url: String,

    /// Download behavior settings
    #[serde(flatten)]
    pub download: DownloadConfig,

    /// Extraction behavior settings
    #[serde(flatten)]
    pub extraction: ExtractionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dump_base_url: default_dump_base_url(),
            download: DownloadConfig::default(),
            extraction: ExtractionConfig::default(),
        }
    }
}

fn default_dump_base_url() -> String {
    "https://dumps.wikimedia.org".to_string()
}

fn default_download_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_max_concurrent() -> usize {
    3
}

fn default_read_block_size() -> usize {
    100 * 1024
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.dump_base_url, "https://dumps.wikimedia.org");
        assert_eq!(config.download.download_dir, PathBuf::from("./data"));
        assert_eq!(config.download.max_concurrent_downloads, 3);
        assert_eq!(config.extraction.max_concurrent_extractions, 3);
        assert_eq!(config.extraction.read_block_size, 100 * 1024);
    }

    #[test]
    fn test_empty_json_uses_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.dump_base_url, default_dump_base_url());
        assert_eq!(config.download.max_concurrent_downloads, 3);
    }

    #[test]
    fn test_flattened_serialization_round_trip() {
        let config = Config {
            dump_base_url: "https://mirror.example.org".to_string(),
            download: DownloadConfig {
                download_dir: PathBuf::from("/tmp/dumps"),
                max_concurrent_downloads: 8,
            },
            extraction: ExtractionConfig {
                max_concurrent_extractions: 2,
                read_block_size: 64 * 1024,
            },
        };

        let json = serde_json::to_value(&config).unwrap();
        // Sub-configs are flattened: fields appear at the top level
        assert_eq!(json["download_dir"], "/tmp/dumps");
        assert_eq!(json["max_concurrent_downloads"], 8);

        let parsed: Config = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.dump_base_url, "https://mirror.example.org");
        assert_eq!(parsed.extraction.read_block_size, 64 * 1024);
    }
}
