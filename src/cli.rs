//! Command-line interface definitions.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Every crawl setting can come from the YAML config file; flags given here
//! take precedence over it.

use crate::config::CrawlConfig;
use crate::pipeline::Phase;
use chrono::NaiveDate;
use clap::Parser;

/// Command-line arguments for the archive crawler.
///
/// # Examples
///
/// ```sh
/// # Full crawl with the built-in Federal Reserve defaults
/// archive_crawler --end-date 2007-02-01
///
/// # Only discover headlines, using a config file
/// archive_crawler -c crawl.yaml --phase discover
///
/// # Fetch articles for an existing link store, four at a time
/// archive_crawler --phase fetch --concurrency 4 --request-timeout-secs 30
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML config file
    #[arg(short, long, env = "ARCHIVE_CRAWLER_CONFIG")]
    pub config: Option<String>,

    /// Which phase to run
    #[arg(long, value_enum, default_value_t = Phase::All)]
    pub phase: Phase,

    /// Archive day URL template containing `{date}`
    #[arg(long)]
    pub base_url: Option<String>,

    /// First archive day (inclusive), YYYY-MM-DD
    #[arg(short, long)]
    pub start_date: Option<NaiveDate>,

    /// Last archive day (exclusive), YYYY-MM-DD; defaults to today
    #[arg(short, long)]
    pub end_date: Option<NaiveDate>,

    /// Pattern a headline must match
    #[arg(long)]
    pub include: Option<String>,

    /// Pattern a headline must not match
    #[arg(long)]
    pub exclude: Option<String>,

    /// Pattern an article body must match to be stored
    #[arg(long)]
    pub content: Option<String>,

    /// Path of the matched-link JSON store
    #[arg(short, long)]
    pub link_store: Option<String>,

    /// Directory that receives stored articles
    #[arg(short, long)]
    pub articles_dir: Option<String>,

    /// Maximum article fetches in flight
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub request_timeout_secs: Option<u64>,

    /// Continue discovery after the latest day in the link store
    #[arg(long)]
    pub resume: bool,

    /// Abort when an article page has no unique body container
    #[arg(long)]
    pub strict: bool,
}

impl Cli {
    /// Overlay the flags that were given onto `config`.
    pub fn apply(&self, config: &mut CrawlConfig) {
        if let Some(v) = &self.base_url {
            config.base_url = v.clone();
        }
        if let Some(v) = self.start_date {
            config.start_date = v;
        }
        if let Some(v) = self.end_date {
            config.end_date = Some(v);
        }
        if let Some(v) = &self.include {
            config.include = v.clone();
        }
        if let Some(v) = &self.exclude {
            config.exclude = v.clone();
        }
        if let Some(v) = &self.content {
            config.content = v.clone();
        }
        if let Some(v) = &self.link_store {
            config.link_store = v.clone();
        }
        if let Some(v) = &self.articles_dir {
            config.articles_dir = v.clone();
        }
        if let Some(v) = self.concurrency {
            config.concurrency = v;
        }
        if let Some(v) = self.request_timeout_secs {
            config.request_timeout_secs = Some(v);
        }
        config.resume |= self.resume;
        config.strict |= self.strict;
    }
}
