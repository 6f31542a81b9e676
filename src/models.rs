//! Data models shared by the discovery and fetch phases.
//!
//! This module defines the core data structures used throughout the crawler:
//! - [`DateRange`]: The half-open range of archive days to walk
//! - [`MatchedLink`]: A headline that passed the topic filters on one day
//! - [`StoredArticle`]: The JSON document written for each kept article
//!
//! [`MatchedLink`] is the record type of the link store, the JSON array that
//! hands work from discovery over to article fetching.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when building a [`DateRange`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RangeError {
    /// The start date is not strictly before the end date.
    #[error("empty date range: start {start} is not before end {end}")]
    Empty { start: NaiveDate, end: NaiveDate },
}

/// A half-open range of calendar days, `[start, end)`.
///
/// Construction enforces `start < end`, so every range yields at least one
/// day. The range is immutable; [`DateRange::days`] can be called any number
/// of times and always restarts from `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Build a range, rejecting `start >= end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, RangeError> {
        if start < end {
            Ok(Self { start, end })
        } else {
            Err(RangeError::Empty { start, end })
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Lazily yield every day from `start` (inclusive) to `end` (exclusive).
    pub fn days(self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        std::iter::successors(Some(self.start), |d| d.checked_add_days(Days::new(1)))
            .take_while(move |d| *d < end)
    }
}

/// A headline link kept by the title matcher.
///
/// # Fields
///
/// * `url` - Absolute URL of the article page
/// * `title` - The headline's anchor text, unique within its day
/// * `date` - Archive day in `YYYY-MM-DD` format
/// * `time` - Publication time in `HH:MM:SS±HH:MM` format
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MatchedLink {
    pub url: String,
    pub title: String,
    pub date: String,
    /// Stores written before times were recorded lack this field.
    #[serde(default)]
    pub time: String,
}

/// An article body persisted under `articles/<date>/<slug>`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct StoredArticle {
    /// Paragraph text of the article body, joined with single spaces.
    pub text: String,
    pub date: String,
    pub title: String,
    pub time: String,
}

impl StoredArticle {
    /// Pair extracted body text with the link it came from.
    pub fn from_link(link: &MatchedLink, text: String) -> Self {
        Self {
            text,
            date: link.date.clone(),
            title: link.title.clone(),
            time: link.time.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_days_end_exclusive() {
        let range = DateRange::new(date(2007, 1, 1), date(2007, 1, 4)).unwrap();
        let days: Vec<NaiveDate> = range.days().collect();
        assert_eq!(days, vec![date(2007, 1, 1), date(2007, 1, 2), date(2007, 1, 3)]);
    }

    #[test]
    fn test_days_is_restartable() {
        let range = DateRange::new(date(2007, 12, 30), date(2008, 1, 2)).unwrap();
        let first: Vec<NaiveDate> = range.days().collect();
        let second: Vec<NaiveDate> = range.days().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
        assert_eq!(first[2], date(2008, 1, 1));
    }

    #[test]
    fn test_single_day_range() {
        let range = DateRange::new(date(2008, 2, 29), date(2008, 3, 1)).unwrap();
        assert_eq!(range.days().collect::<Vec<_>>(), vec![date(2008, 2, 29)]);
    }

    #[test]
    fn test_empty_range_rejected() {
        let d = date(2007, 1, 1);
        assert_eq!(
            DateRange::new(d, d),
            Err(RangeError::Empty { start: d, end: d })
        );
        assert!(DateRange::new(date(2007, 1, 2), d).is_err());
    }

    #[test]
    fn test_matched_link_serialization() {
        let link = MatchedLink {
            url: "http://www.reuters.com/article/idUSN0112345".to_string(),
            title: "Federal Reserve holds rates".to_string(),
            date: "2007-01-01".to_string(),
            time: "15:12:00-05:00".to_string(),
        };

        let json = serde_json::to_string(&link).unwrap();
        assert!(json.contains("\"url\""));
        assert!(json.contains("15:12:00-05:00"));
        let back: MatchedLink = serde_json::from_str(&json).unwrap();
        assert_eq!(back, link);
    }

    #[test]
    fn test_matched_link_without_time() {
        let json = r#"{
            "url": "http://www.reuters.com/article/idUSN0112345",
            "title": "Fed minutes",
            "date": "2007-01-03"
        }"#;

        let link: MatchedLink = serde_json::from_str(json).unwrap();
        assert_eq!(link.title, "Fed minutes");
        assert_eq!(link.time, "");
    }

    #[test]
    fn test_stored_article_from_link() {
        let link = MatchedLink {
            url: "http://example.com/a".to_string(),
            title: "Title".to_string(),
            date: "2007-01-01".to_string(),
            time: "09:30:00+00:00".to_string(),
        };
        let article = StoredArticle::from_link(&link, "Body text".to_string());
        assert_eq!(article.title, "Title");
        assert_eq!(article.date, "2007-01-01");
        assert_eq!(article.time, "09:30:00+00:00");
        assert_eq!(article.text, "Body text");
    }
}
