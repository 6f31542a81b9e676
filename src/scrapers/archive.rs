//! Archive discovery: day pages to matched headline links.
//!
//! Each archive day page lists headlines as rows such as:
//!
//! ```html
//! <div class="headlineMed"><a href="http://www.reuters.com/article/idUSN0112345">Fed holds rates</a> 3:12pm EST</div>
//! ```
//!
//! [`match_titles`] turns one such page into [`MatchedLink`]s and
//! [`discover`] drives it across a date range, rewriting the link store
//! after every day so an interrupted crawl keeps everything up to the last
//! finished day.

use crate::config::{CrawlConfig, Filters};
use crate::models::{DateRange, MatchedLink};
use crate::outputs::json;
use crate::scrapers::fetch_html;
use crate::time_parser::TimeParser;
use chrono::{Days, NaiveDate};
use itertools::Itertools;
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::error::Error;
use std::path::Path;
use tracing::{debug, info, instrument, warn};
use url::Url;

static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

/// One headline row before filtering.
struct Headline {
    text: String,
    anchor_text: String,
    href: String,
}

impl Headline {
    fn from_element(row: ElementRef<'_>) -> Option<Self> {
        let anchor = row.select(&ANCHOR).next()?;
        Some(Self {
            text: row.text().collect(),
            anchor_text: anchor.text().collect(),
            href: anchor.value().attr("href")?.to_string(),
        })
    }

    fn title(&self) -> &str {
        self.anchor_text.trim()
    }

    /// Row text with the anchor text removed, usually just the time.
    fn remainder(&self) -> String {
        self.text.replacen(&self.anchor_text, "", 1)
    }
}

/// Fetch one archive day page and return its matching headlines.
///
/// A page that cannot be fetched yields no links.
#[instrument(level = "info", skip_all, fields(%day_url, %date))]
pub async fn match_titles(
    client: &Client,
    day_url: &str,
    filters: &Filters,
    date: NaiveDate,
) -> Vec<MatchedLink> {
    let html = match fetch_html(client, day_url).await {
        Ok(html) => html,
        Err(e) => {
            debug!(%day_url, error = %e, "Archive day unavailable; skipping");
            return Vec::new();
        }
    };
    extract_matches(&html, day_url, filters, &TimeParser::default(), date)
}

/// Extract matching headlines from an archive day page already in memory.
///
/// Rows are kept when their full text passes [`Filters::keeps`], then
/// deduplicated by title (first occurrence wins). A row whose time cannot be
/// parsed is dropped without affecting the others. Output is in document
/// order.
pub fn extract_matches(
    html: &str,
    day_url: &str,
    filters: &Filters,
    parser: &TimeParser<'_>,
    date: NaiveDate,
) -> Vec<MatchedLink> {
    let document = Html::parse_document(html);
    let base = Url::parse(day_url).ok();
    let date_str = date.to_string();

    document
        .select(&filters.headline)
        .filter_map(Headline::from_element)
        .filter(|h| filters.keeps(h.text.trim()))
        .unique_by(|h| h.title().to_string())
        .filter_map(|h| {
            let time = match parser.parse(&h.remainder()) {
                Ok(time) => time,
                Err(e) => {
                    warn!(title = %h.title(), date = %date_str, error = %e, "Unparseable headline time; dropping entry");
                    return None;
                }
            };
            let url = base
                .as_ref()
                .and_then(|b| b.join(&h.href).ok())
                .map(|u| u.to_string())
                .unwrap_or_else(|| h.href.clone());

            info!(title = %h.title(), date = %date_str, "Matched headline");
            Some(MatchedLink {
                url,
                title: h.title().to_string(),
                date: date_str.clone(),
                time,
            })
        })
        .collect()
}

/// Where discovery should pick up given links already stored.
///
/// Returns `None` when the stored links already reach the end of `range`.
pub fn resume_range(range: DateRange, stored: &[MatchedLink]) -> Option<DateRange> {
    let latest = stored
        .iter()
        .filter_map(|l| l.date.parse::<NaiveDate>().ok())
        .max();
    let Some(latest) = latest else {
        return Some(range);
    };
    let next = latest.checked_add_days(Days::new(1))?;
    DateRange::new(next.max(range.start()), range.end()).ok()
}

/// Walk the configured date range and collect every matching headline.
///
/// After each day the link store is rewritten with everything matched so
/// far. With `resume` set, links already in the store are kept and the walk
/// starts after the latest stored day; otherwise the store is replaced.
///
/// # Errors
///
/// Returns an error if the config is invalid or the link store cannot be
/// read or written. Unreachable archive pages are not errors.
#[instrument(level = "info", skip_all)]
pub async fn discover(
    client: &Client,
    config: &CrawlConfig,
    filters: &Filters,
) -> Result<Vec<MatchedLink>, Box<dyn Error>> {
    let store = Path::new(&config.link_store);
    let full_range = config.date_range()?;

    let (mut links, range) = if config.resume && store.exists() {
        let stored = json::read_link_store(store).await?;
        let range = resume_range(full_range, &stored);
        info!(stored = stored.len(), from = ?range.map(|r| r.start()), "Resuming discovery");
        (stored, range)
    } else {
        (Vec::new(), Some(full_range))
    };

    let Some(range) = range else {
        info!(count = links.len(), "Link store already covers the date range");
        return Ok(links);
    };

    info!(start = %range.start(), end = %range.end(), "Starting discovery");
    for date in range.days() {
        let day_url = config.day_url(date);
        let matched = match_titles(client, &day_url, filters, date).await;
        debug!(%date, count = matched.len(), "Processed archive day");
        links.extend(matched);
        json::write_link_store(store, &links).await?;
    }

    info!(count = links.len(), path = %store.display(), "Discovery complete");
    Ok(links)
}
