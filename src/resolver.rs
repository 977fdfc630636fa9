//! Index resolution
//!
//! Fetches a dump index page, extracts anchor hrefs, and filters them
//! against the archive filename patterns. Large wikis publish numbered
//! shards; wikis below the sharding threshold publish a single file, so
//! the single-part pattern is applied as a fallback only when the
//! multi-part pass matches nothing (exclusive, never additive).

use crate::error::{Error, Result};
use crate::patterns;
use scraper::{Html, Selector};
use tracing::{debug, warn};

/// Resolve the archive hrefs for a language/date from a dump index page
///
/// Returns the matching hrefs in document order. An unreachable index page
/// or a non-success status is fatal ([`Error::IndexFetch`]); an index page
/// with no matching anchors is not — it is logged and surfaced as an empty
/// list so the caller can decide whether to abort.
pub async fn resolve_archives(
    client: &reqwest::Client,
    index_url: &str,
    lang: &str,
    date: &str,
) -> Result<Vec<String>> {
    let response = client
        .get(index_url)
        .send()
        .await
        .map_err(|e| Error::IndexFetch {
            url: index_url.to_string(),
            reason: e.to_string(),
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::IndexFetch {
            url: index_url.to_string(),
            reason: format!("HTTP {}", status),
        });
    }

    let body = response.text().await.map_err(|e| Error::IndexFetch {
        url: index_url.to_string(),
        reason: e.to_string(),
    })?;

    let hrefs = collect_hrefs(&body)?;
    debug!(index_url, anchor_count = hrefs.len(), "scanned index page");

    let multi = patterns::multi_part_pattern(lang, date)?;
    let mut matches: Vec<String> = hrefs.iter().filter(|h| multi.is_match(h)).cloned().collect();

    if matches.is_empty() {
        let single = patterns::single_part_pattern(lang, date)?;
        matches = hrefs
            .iter()
            .filter(|h| single.is_match(h))
            .cloned()
            .collect();
    }

    if matches.is_empty() {
        warn!(index_url, lang, date, "no matching archives found on index page");
    }

    Ok(matches)
}

/// Extract the href of every anchor element, in document order
///
/// Anchors without an href attribute are skipped.
fn collect_hrefs(html: &str) -> Result<Vec<String>> {
    let document = Html::parse_document(html);
    let anchor = Selector::parse("a").map_err(|e| Error::Other(e.to_string()))?;

    Ok(document
        .select(&anchor)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect())
}
