//! Crawl configuration.
//!
//! Settings come from an optional YAML file and are then overridden by CLI
//! flags (see [`crate::cli::Cli::apply`]). Every field has a default matching
//! the Federal Reserve crawl of the Reuters US archive,
//! so an empty file, or no file at all, is a valid configuration.
//!
//! ```yaml
//! base_url: "http://www.reuters.com/resources/archive/us/{date}.html"
//! start_date: 2007-01-01
//! end_date: 2008-01-01
//! include: '(?i)\bfed\b|\bfederal\sreserve\b'
//! exclude: '(?i)^update\s'
//! content: '(?i)\bfederal\sreserve\b'
//! concurrency: 1
//! ```

use crate::models::{DateRange, RangeError};
use crate::scrapers::article::ClassPrefixExtractor;
use chrono::{Local, NaiveDate};
use regex::Regex;
use scraper::Selector;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Placeholder replaced by the `YYYYMMDD` day in [`CrawlConfig::base_url`].
pub const DATE_PLACEHOLDER: &str = "{date}";

/// Errors raised while loading or validating a [`CrawlConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config file: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid {field} pattern: {source}")]
    Regex {
        field: &'static str,
        #[source]
        source: regex::Error,
    },
    #[error("invalid selector for {field}: {message}")]
    Selector { field: &'static str, message: String },
    #[error("base_url {0:?} has no {{date}} placeholder")]
    MissingPlaceholder(String),
    #[error("concurrency must be at least 1")]
    ZeroConcurrency,
    #[error(transparent)]
    Range(#[from] RangeError),
}

/// Everything a crawl needs to know, as loaded from YAML.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CrawlConfig {
    /// Archive day URL template containing [`DATE_PLACEHOLDER`].
    pub base_url: String,
    /// First archive day, inclusive.
    pub start_date: NaiveDate,
    /// Last archive day, exclusive. Defaults to today (local time).
    pub end_date: Option<NaiveDate>,
    /// Headline text must match this pattern.
    pub include: String,
    /// Headline text must not match this pattern.
    pub exclude: String,
    /// Article body must match this pattern to be stored.
    pub content: String,
    /// JSON file holding every matched link.
    pub link_store: String,
    /// Root directory for stored articles.
    pub articles_dir: String,
    /// Class marking headline rows on an archive day page.
    pub headline_class: String,
    /// Class prefix marking the article body container.
    pub body_class_prefix: String,
    /// Maximum number of article fetches in flight.
    pub concurrency: usize,
    /// Per-request timeout; `None` keeps the client default (no timeout).
    pub request_timeout_secs: Option<u64>,
    /// Continue discovery after the latest day already in the link store.
    pub resume: bool,
    /// Abort the whole run when an article page has no unique body container.
    pub strict: bool,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            base_url: "http://www.reuters.com/resources/archive/us/{date}.html".to_string(),
            start_date: NaiveDate::from_ymd_opt(2007, 1, 1).unwrap_or_default(),
            end_date: None,
            include: r"(?i)\bfed\b|\bfederal\sreserve\b".to_string(),
            exclude: r"(?i)^update\s".to_string(),
            content: r"(?i)\bfederal\sreserve\b".to_string(),
            link_store: "matched_titles.json".to_string(),
            articles_dir: "articles".to_string(),
            headline_class: "headlineMed".to_string(),
            body_class_prefix: "ArticleBody_container_".to_string(),
            concurrency: 1,
            request_timeout_secs: None,
            resume: false,
            strict: false,
        }
    }
}

impl CrawlConfig {
    /// Load a YAML config file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml(&raw)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, ConfigError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }

    /// Check the settings that are not validated by compiling [`Filters`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.base_url.contains(DATE_PLACEHOLDER) {
            return Err(ConfigError::MissingPlaceholder(self.base_url.clone()));
        }
        if self.concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        self.date_range()?;
        Ok(())
    }

    /// The `[start_date, end_date)` range, with `end_date` defaulting to today.
    pub fn date_range(&self) -> Result<DateRange, ConfigError> {
        let end = self.end_date.unwrap_or_else(|| Local::now().date_naive());
        Ok(DateRange::new(self.start_date, end)?)
    }

    /// Archive page URL for one day.
    pub fn day_url(&self, date: NaiveDate) -> String {
        self.base_url
            .replace(DATE_PLACEHOLDER, &date.format("%Y%m%d").to_string())
    }

    /// Compile the patterns and selectors used by both phases.
    pub fn filters(&self) -> Result<Filters, ConfigError> {
        let compile = |field: &'static str, pattern: &str| {
            Regex::new(pattern).map_err(|source| ConfigError::Regex { field, source })
        };
        let headline = Selector::parse(&format!("div.{}", self.headline_class)).map_err(|e| {
            ConfigError::Selector {
                field: "headline_class",
                message: e.to_string(),
            }
        })?;

        Ok(Filters {
            include: compile("include", &self.include)?,
            exclude: compile("exclude", &self.exclude)?,
            content: compile("content", &self.content)?,
            headline,
            extractor: ClassPrefixExtractor::new(&self.body_class_prefix)?,
        })
    }
}

/// Compiled patterns and selectors derived from a [`CrawlConfig`].
#[derive(Debug, Clone)]
pub struct Filters {
    pub include: Regex,
    pub exclude: Regex,
    pub content: Regex,
    /// Selects the headline rows of an archive day page.
    pub headline: Selector,
    pub extractor: ClassPrefixExtractor,
}

impl Filters {
    /// True when a headline's text passes the include and exclude patterns.
    pub fn keeps(&self, text: &str) -> bool {
        self.include.is_match(text) && !self.exclude.is_match(text)
    }
}
