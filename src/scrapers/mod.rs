//! Archive and article scrapers.
//!
//! Crawling follows a two-phase pattern:
//!
//! 1. **Discovery** ([`archive`]): walk the archive day by day and keep the
//!    headline links whose text matches the topic filters
//! 2. **Fetching** ([`article`]): download each kept article, extract its
//!    body, and store it if the body matches the content filter
//!
//! Both phases treat an unreachable page as "no data": the failure is logged
//! at debug level and the crawl moves on. Nothing is retried.

use reqwest::Client;
use std::time::Duration;
use tracing::debug;

pub mod archive;
pub mod article;

/// Build the HTTP client shared by both phases.
///
/// Without `timeout_secs` the client keeps reqwest's default of no timeout.
pub fn build_client(timeout_secs: Option<u64>) -> reqwest::Result<Client> {
    let mut builder = Client::builder().user_agent(concat!(
        env!("CARGO_PKG_NAME"),
        "/",
        env!("CARGO_PKG_VERSION")
    ));
    if let Some(secs) = timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    builder.build()
}

/// GET a page and return its body, treating any non-2xx status as an error.
pub async fn fetch_html(client: &Client, url: &str) -> reqwest::Result<String> {
    let response = client.get(url).send().await?.error_for_status()?;
    let body = response.text().await?;
    debug!(%url, bytes = body.len(), "Fetched page");
    Ok(body)
}
