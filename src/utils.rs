//! Utility functions for slugs, log previews, and file system checks.
//!
//! This module provides helper functions used throughout the crawler:
//! - Slug generation for article file names
//! - String truncation for logging
//! - File system validation for output directories

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};
use unicode_normalization::UnicodeNormalization;

static NON_SLUG_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s-]").unwrap());
static SEPARATOR_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[-\s]+").unwrap());

/// Convert a title to a filesystem-safe slug.
///
/// The title is NFKC-normalized and lowercased, everything except word
/// characters, whitespace and hyphens is removed, and each run of
/// whitespace/hyphens becomes a single `-`. The result never starts or ends
/// with a hyphen and `slug(&slug(s)) == slug(s)` for every input.
///
/// # Examples
///
/// ```
/// use archive_crawler::utils::slug;
///
/// assert_eq!(slug("Fed holds rates -- again!"), "fed-holds-rates-again");
/// assert_eq!(slug("?!"), "");
/// ```
pub fn slug(text: &str) -> String {
    let normalized = text.nfkc().collect::<String>().to_lowercase();
    let stripped = NON_SLUG_CHARS.replace_all(&normalized, "");
    let collapsed = SEPARATOR_RUNS.replace_all(stripped.trim(), "-");
    // Removing characters can leave combining marks next to a new base.
    collapsed.trim_matches('-').nfkc().collect()
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (on a char boundary) with an
/// ellipsis and byte count indicator appended.
///
/// # Examples
///
/// ```
/// use archive_crawler::utils::truncate_for_log;
///
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then writes and immediately
/// deletes a scratch file.
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - The directory is not writable (permission denied, read-only filesystem, etc.)
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    let scratch_path = format!("{}/..__write_check__", path.trim_end_matches('/'));
    match stdfs::File::create(&scratch_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&scratch_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}
