//! URL templating and output path helpers

use std::path::{Path, PathBuf};

/// Build the dump index URL for a language and date
///
/// # Examples
///
/// ```
/// use wikidump_dl::utils::dump_index_url;
///
/// let url = dump_index_url("https://dumps.wikimedia.org", "en", "latest");
/// assert_eq!(url, "https://dumps.wikimedia.org/enwiki/latest");
/// ```
#[must_use]
pub fn dump_index_url(base_url: &str, lang: &str, date: &str) -> String {
    format!("{}/{}wiki/{}", base_url.trim_end_matches('/'), lang, date)
}

/// Build the full URL of one archive from its href on the index page
#[must_use]
pub fn archive_url(index_url: &str, href: &str) -> String {
    format!("{}/{}", index_url.trim_end_matches('/'), href)
}

/// Build the destination path for a downloaded archive
///
/// Uses the filename component of the href, so hrefs with path segments
/// still land directly under `output_dir`.
#[must_use]
pub fn download_output_path(output_dir: &Path, href: &str) -> PathBuf {
    let filename = href.rsplit('/').next().unwrap_or(href);
    output_dir.join(filename)
}
