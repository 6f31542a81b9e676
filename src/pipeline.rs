//! Two-phase crawl driver.
//!
//! Discovery writes the link store; fetching reads it back. Running them
//! separately is supported, the store being the only handoff between them.

use crate::config::CrawlConfig;
use crate::outputs::json;
use crate::scrapers::article::{FetchSummary, fetch_all};
use crate::scrapers::{archive, build_client};
use crate::utils::ensure_writable_dir;
use clap::ValueEnum;
use std::error::Error;
use std::path::Path;
use tracing::info;

/// Which part of the crawl to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Phase {
    /// Walk the archive and write the link store
    Discover,
    /// Fetch articles listed in the link store
    Fetch,
    /// Discovery followed by fetching
    All,
}

impl Phase {
    fn discovers(self) -> bool {
        matches!(self, Phase::Discover | Phase::All)
    }

    fn fetches(self) -> bool {
        matches!(self, Phase::Fetch | Phase::All)
    }
}

/// What a run did, per phase.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Links in the store after discovery.
    pub matched: Option<usize>,
    pub fetched: Option<FetchSummary>,
}

/// Validate `config` and run the requested phases.
///
/// # Errors
///
/// Fails on invalid configuration, link store I/O errors, an unwritable
/// articles directory, or a strict-mode extraction failure.
pub async fn run(config: &CrawlConfig, phase: Phase) -> Result<RunReport, Box<dyn Error>> {
    config.validate()?;
    let filters = config.filters()?;
    let client = build_client(config.request_timeout_secs)?;
    let mut report = RunReport::default();

    if phase.discovers() {
        let links = archive::discover(&client, config, &filters).await?;
        report.matched = Some(links.len());
    }

    if phase.fetches() {
        ensure_writable_dir(&config.articles_dir).await?;
        let links = json::read_link_store(Path::new(&config.link_store)).await?;
        info!(count = links.len(), path = %config.link_store, "Loaded link store");
        report.fetched = Some(fetch_all(&client, links, config, &filters).await?);
    }

    Ok(report)
}
