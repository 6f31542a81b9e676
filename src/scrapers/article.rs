//! Article fetching: matched links to stored article bodies.
//!
//! [`fetch_article`] handles one link and reports why it did not store
//! anything through [`SkipReason`]. [`fetch_all`] shuffles the full link
//! list, so requests do not walk the archive in order, and processes it with
//! at most `concurrency` fetches in flight.
//!
//! # Storage layout
//!
//! ```text
//! articles/
//! └── 2007-01-01/
//!     └── federal-reserve-holds-rates-steady
//! ```
//!
//! The existence of a file is the only record that an article was fetched.

use crate::config::{ConfigError, CrawlConfig, Filters};
use crate::models::{MatchedLink, StoredArticle};
use crate::outputs::json;
use crate::scrapers::fetch_html;
use crate::utils::{slug, truncate_for_log};
use futures::stream::{self, StreamExt};
use itertools::Itertools;
use once_cell::sync::Lazy;
use rand::Rng;
use rand::seq::SliceRandom;
use regex::Regex;
use reqwest::Client;
use scraper::{Html, Selector};
use std::collections::BTreeMap;
use std::error::Error;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, error, info, instrument, warn};

static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());

/// Why an article page yielded no body text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("no article body container found")]
    NotFound,
    #[error("{0} article body containers found, expected exactly one")]
    Ambiguous(usize),
}

/// Pulls the body text out of an article page.
pub trait BodyExtractor {
    fn extract(&self, html: &str) -> Result<String, ExtractionError>;
}

/// Extracts paragraph text from the single `div` whose class attribute
/// starts with a given prefix, e.g. `ArticleBody_container_3kKz`.
#[derive(Debug, Clone)]
pub struct ClassPrefixExtractor {
    container: Selector,
}

impl ClassPrefixExtractor {
    pub fn new(prefix: &str) -> Result<Self, ConfigError> {
        let container = Selector::parse(&format!(r#"div[class^="{prefix}"]"#)).map_err(|e| {
            ConfigError::Selector {
                field: "body_class_prefix",
                message: e.to_string(),
            }
        })?;
        Ok(Self { container })
    }
}

impl BodyExtractor for ClassPrefixExtractor {
    fn extract(&self, html: &str) -> Result<String, ExtractionError> {
        let document = Html::parse_document(html);
        let containers: Vec<_> = document.select(&self.container).collect();
        let body = match containers.as_slice() {
            [] => return Err(ExtractionError::NotFound),
            [body] => body,
            many => return Err(ExtractionError::Ambiguous(many.len())),
        };

        Ok(body
            .select(&PARAGRAPH)
            .map(|p| p.text().collect::<String>())
            .filter_map(|t| {
                let t = t.trim();
                (!t.is_empty()).then(|| t.to_string())
            })
            .join(" "))
    }
}

/// Outcome of an article that was not stored.
#[derive(Debug, Error)]
pub enum SkipReason {
    #[error("video page")]
    Video,
    #[error("title has no slug characters")]
    EmptySlug,
    #[error("already stored")]
    AlreadyStored,
    #[error("fetch failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error("body does not match content filter")]
    ContentMismatch,
    #[error("storage error: {0}")]
    Io(#[from] io::Error),
}

impl SkipReason {
    /// Short name used for summary counts.
    pub fn label(&self) -> &'static str {
        match self {
            SkipReason::Video => "video",
            SkipReason::EmptySlug => "empty_slug",
            SkipReason::AlreadyStored => "already_stored",
            SkipReason::Transport(_) => "transport",
            SkipReason::Extraction(_) => "extraction",
            SkipReason::ContentMismatch => "content_mismatch",
            SkipReason::Io(_) => "io",
        }
    }
}

/// Counts reported at the end of the fetch phase.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FetchSummary {
    pub stored: usize,
    pub skipped: BTreeMap<&'static str, usize>,
}

impl FetchSummary {
    fn record(&mut self, reason: &SkipReason) {
        *self.skipped.entry(reason.label()).or_default() += 1;
    }

    pub fn skipped_total(&self) -> usize {
        self.skipped.values().sum()
    }
}

/// Target file for a link: `<articles_dir>/<date>/<slug(title)>`.
pub fn article_path(articles_dir: &Path, link: &MatchedLink) -> Option<PathBuf> {
    let slug = slug(&link.title);
    (!slug.is_empty()).then(|| articles_dir.join(&link.date).join(slug))
}

/// Fetch one article and store it if its body matches `content`.
///
/// Returns the path written. Already-stored articles are detected before
/// any request is made.
#[instrument(level = "info", skip_all, fields(url = %link.url, date = %link.date))]
pub async fn fetch_article(
    client: &Client,
    link: &MatchedLink,
    content: &Regex,
    articles_dir: &Path,
    extractor: &dyn BodyExtractor,
) -> Result<PathBuf, SkipReason> {
    if link.url.contains("/video/") {
        return Err(SkipReason::Video);
    }

    let path = article_path(articles_dir, link).ok_or(SkipReason::EmptySlug)?;
    if fs::try_exists(&path).await? {
        return Err(SkipReason::AlreadyStored);
    }

    let html = fetch_html(client, &link.url).await?;
    let text = extractor.extract(&html)?;

    if !content.is_match(&text) {
        debug!(title = %link.title, preview = %truncate_for_log(&text, 120), "Body does not match content filter");
        return Err(SkipReason::ContentMismatch);
    }

    let article = StoredArticle::from_link(link, text);
    match json::write_article(&path, &article).await {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            return Err(SkipReason::AlreadyStored);
        }
        Err(e) => return Err(e.into()),
    }

    info!(title = %link.title, date = %link.date, path = %path.display(), "Stored article");
    Ok(path)
}

/// Shuffle `links` and drop those resolving to a target file already taken
/// by an earlier link in the shuffled order.
pub fn fetch_order<R: Rng + ?Sized>(mut links: Vec<MatchedLink>, rng: &mut R) -> Vec<MatchedLink> {
    links.shuffle(rng);
    links
        .into_iter()
        .unique_by(|l| (l.date.clone(), slug(&l.title)))
        .collect()
}

/// Fetch every link in random order and store the matching articles.
///
/// Links resolving to the same target file are fetched once. With
/// `config.strict` an extraction failure aborts the run, mirroring a crawl
/// that must stop when the site layout changes; otherwise only that article
/// is skipped.
///
/// # Errors
///
/// Returns an error only in strict mode.
#[instrument(level = "info", skip_all, fields(links = links.len()))]
pub async fn fetch_all(
    client: &Client,
    links: Vec<MatchedLink>,
    config: &CrawlConfig,
    filters: &Filters,
) -> Result<FetchSummary, Box<dyn Error>> {
    let links = fetch_order(links, &mut rand::rng());

    let articles_dir = Path::new(&config.articles_dir);
    let extractor: &dyn BodyExtractor = &filters.extractor;
    let mut summary = FetchSummary::default();

    let mut outcomes = stream::iter(links)
        .map(|link| async move {
            let outcome =
                fetch_article(client, &link, &filters.content, articles_dir, extractor).await;
            (link, outcome)
        })
        .buffer_unordered(config.concurrency.max(1));

    while let Some((link, outcome)) = outcomes.next().await {
        let reason = match outcome {
            Ok(_) => {
                summary.stored += 1;
                continue;
            }
            Err(reason) => reason,
        };

        match &reason {
            SkipReason::Extraction(e) if config.strict => {
                error!(url = %link.url, title = %link.title, error = %e, "Article layout check failed; aborting");
                return Err(Box::new(reason));
            }
            SkipReason::Extraction(_) | SkipReason::Io(_) => {
                warn!(url = %link.url, title = %link.title, error = %reason, "Skipping article");
            }
            _ => {
                debug!(url = %link.url, reason = reason.label(), "Skipping article");
            }
        }
        summary.record(&reason);
    }

    info!(
        stored = summary.stored,
        skipped = summary.skipped_total(),
        breakdown = ?summary.skipped,
        "Article fetching complete"
    );
    Ok(summary)
}
