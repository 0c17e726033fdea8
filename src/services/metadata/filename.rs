//! Document Name Parsing
//!
//! Metadata schemas read their fields out of document file names: the
//! extension is stripped, the stem is split on a schema-specific separator,
//! and combined segments like `secret4` are broken into a level word and a
//! point index with a compiled regex.

use std::ffi::OsStr;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use crate::utils::error::{AppError, AppResult};

/// Matches a leading non-digit run followed by digits, e.g. `secret4`.
/// Anchored at the start only: trailing characters after the digits are
/// ignored, matching how combined segments are written in practice.
fn level_index_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^([^0-9]+)(\d+)").unwrap())
}

/// Strip the extension from a document name.
///
/// Names without an extension are returned unchanged.
pub fn doc_stem(doc_name: &str) -> &str {
    Path::new(doc_name)
        .file_stem()
        .and_then(OsStr::to_str)
        .unwrap_or(doc_name)
}

/// Split a document stem on a separator character.
pub fn split_stem(stem: &str, separator: char) -> Vec<&str> {
    stem.split(separator).collect()
}

/// Parse a combined `<level><index>` segment, e.g. `secret4` -> ("secret", 4).
pub fn parse_level_index(segment: &str) -> AppResult<(String, u32)> {
    let captures = level_index_pattern().captures(segment).ok_or_else(|| {
        AppError::parse(format!(
            "segment '{}' does not match '<level><index>'",
            segment
        ))
    })?;

    let level = captures[1].to_string();
    let index: u32 = captures[2]
        .parse()
        .map_err(|_| AppError::parse(format!("point index out of range in segment '{}'", segment)))?;

    Ok((level, index))
}
