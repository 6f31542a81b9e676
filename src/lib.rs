//! # Archive Crawler
//!
//! Crawls a dated news archive, keeps the headlines that match a topic, and
//! stores the bodies of the matching articles as JSON.
//!
//! ## Architecture
//!
//! The crawl runs in two phases joined by a JSON link store:
//! 1. **Discovery**: Walk the archive one day at a time, filter each day's
//!    headlines with include/exclude patterns, and record the kept links
//! 2. **Fetching**: Shuffle the stored links, fetch each article once, and
//!    keep those whose body matches the content pattern
//!
//! Supporting modules:
//! - [`utils::slug`] turns titles into article file names
//! - [`timezones`] and [`time_parser`] turn `3:12pm EST` into `15:12:00-05:00`
//! - [`config`] and [`cli`] assemble the crawl settings

pub mod cli;
pub mod config;
pub mod models;
pub mod outputs;
pub mod pipeline;
pub mod scrapers;
pub mod time_parser;
pub mod timezones;
pub mod utils;
