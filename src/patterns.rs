//! Archive filename patterns
//!
//! A dump index page lists either numbered shards
//! (`enwiki-latest-pages-articles1.xml-p1p41242.bz2`, ...) or, for small
//! wikis below the sharding threshold, a single non-sharded file
//! (`cowiki-latest-pages-articles.xml.bz2`). The resolver tries the
//! multi-part pattern first and falls back to the single-part pattern only
//! when the first pass matches nothing.

use crate::error::Result;
use regex::Regex;

/// Build the pattern matching numbered multi-part archive shards
///
/// Matches hrefs containing `<lang>wiki-<date>-pages-articles` followed by
/// a numeric shard suffix, ending in `.bz2`. Matches anywhere in the
/// string (case-sensitive); only the archive extension is anchored.
///
/// Inputs are escaped before interpolation, so a malformed language code or
/// date token yields a pattern that matches nothing rather than an error.
pub fn multi_part_pattern(lang: &str, date: &str) -> Result<Regex> {
    let pattern = format!(
        r"{}wiki-{}-pages-articles[0-9]+\.xml.*\.bz2$",
        regex::escape(lang),
        regex::escape(date),
    );
    Ok(Regex::new(&pattern)?)
}

/// Build the pattern matching a single non-sharded dump archive
///
/// Same grammar as [`multi_part_pattern`] without the numeric shard.
pub fn single_part_pattern(lang: &str, date: &str) -> Result<Regex> {
    let pattern = format!(
        r"{}wiki-{}-pages-articles\.xml.*\.bz2$",
        regex::escape(lang),
        regex::escape(date),
    );
    Ok(Regex::new(&pattern)?)
}
