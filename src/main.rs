//! # Archive Crawler
//!
//! Batch job that crawls a dated news archive for one topic.
//!
//! ## Usage
//!
//! ```sh
//! archive_crawler -c crawl.yaml
//! archive_crawler --phase fetch --articles-dir ./articles
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

use archive_crawler::cli::Cli;
use archive_crawler::config::CrawlConfig;
use archive_crawler::pipeline;
use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("archive_crawler starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    let mut config = match &args.config {
        Some(path) => {
            let config = CrawlConfig::load(path)?;
            info!(config_path = %path, "Loaded configuration");
            config
        }
        None => CrawlConfig::default(),
    };
    args.apply(&mut config);
    debug!(?config, "Effective configuration");

    let report = match pipeline::run(&config, args.phase).await {
        Ok(report) => report,
        Err(e) => {
            error!(error = %e, "Crawl failed");
            return Err(e);
        }
    };

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        phase = ?args.phase,
        matched = ?report.matched,
        stored = ?report.fetched.as_ref().map(|s| s.stored),
        "Execution complete"
    );

    Ok(())
}
