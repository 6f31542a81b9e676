//! Parse the trailing publication time of an archive headline.
//!
//! Archive rows read like `Fed holds rates steady 3:12pm EST`. Once the
//! anchor text is removed the remainder is handed to [`TimeParser::parse`],
//! which finds the last clock time in it, resolves the abbreviation through a
//! [`TimezoneTable`], and renders `HH:MM:SS±HH:MM`.
//!
//! Unknown or missing abbreviations resolve to UTC.

use crate::timezones::TimezoneTable;
use chrono::{FixedOffset, NaiveTime};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use thiserror::Error;

static CLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(\d{1,2}):(\d{2})(?::(\d{2}))?(?:\s*([ap])\.?m(?:\.|\b))?(?:\s+([a-z]{1,5})\b)?",
    )
    .unwrap()
});

/// Errors raised by [`TimeParser::parse`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimeParseError {
    #[error("no clock time found in {0:?}")]
    NotFound(String),
    #[error("clock time out of range: {0:?}")]
    OutOfRange(String),
}

/// Turns free-form headline remainders into offset-qualified times.
#[derive(Debug, Clone, Copy)]
pub struct TimeParser<'a> {
    table: &'a TimezoneTable,
}

impl Default for TimeParser<'static> {
    fn default() -> Self {
        Self::new(TimezoneTable::global())
    }
}

impl<'a> TimeParser<'a> {
    pub fn new(table: &'a TimezoneTable) -> Self {
        Self { table }
    }

    /// Parse the last clock time in `raw` into `HH:MM:SS±HH:MM`.
    ///
    /// # Examples
    ///
    /// ```
    /// use archive_crawler::time_parser::TimeParser;
    ///
    /// let parser = TimeParser::default();
    /// assert_eq!(parser.parse("  3:12pm EST").unwrap(), "15:12:00-05:00");
    /// assert_eq!(parser.parse("09:05 GMT").unwrap(), "09:05:00+00:00");
    /// ```
    pub fn parse(&self, raw: &str) -> Result<String, TimeParseError> {
        let caps = CLOCK
            .captures_iter(raw)
            .last()
            .ok_or_else(|| TimeParseError::NotFound(raw.trim().to_string()))?;
        let matched = caps[0].to_string();
        let out_of_range = || TimeParseError::OutOfRange(matched.clone());

        let time = clock_time(&caps).ok_or_else(out_of_range)?;
        let seconds = caps
            .get(5)
            .and_then(|code| self.table.lookup(code.as_str()))
            .unwrap_or(0);
        let offset = FixedOffset::east_opt(seconds).ok_or_else(out_of_range)?;

        Ok(format!("{}{}", time.format("%H:%M:%S"), render_offset(offset)))
    }
}

fn clock_time(caps: &Captures<'_>) -> Option<NaiveTime> {
    let mut hour: u32 = caps[1].parse().ok()?;
    let minute: u32 = caps[2].parse().ok()?;
    let second: u32 = match caps.get(3) {
        Some(s) => s.as_str().parse().ok()?,
        None => 0,
    };

    if let Some(meridiem) = caps.get(4) {
        if !(1..=12).contains(&hour) {
            return None;
        }
        let pm = meridiem.as_str().eq_ignore_ascii_case("p");
        hour = match (pm, hour) {
            (false, 12) => 0,
            (true, 12) => 12,
            (true, h) => h + 12,
            (false, h) => h,
        };
    }

    NaiveTime::from_hms_opt(hour, minute, second)
}

fn render_offset(offset: FixedOffset) -> String {
    let total = offset.local_minus_utc();
    let sign = if total < 0 { '-' } else { '+' };
    let abs = total.unsigned_abs();
    format!("{}{:02}:{:02}", sign, abs / 3600, (abs % 3600) / 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> TimeParser<'static> {
        TimeParser::default()
    }

    #[test]
    fn test_afternoon_with_zone() {
        assert_eq!(parser().parse("  3:12pm EST").unwrap(), "15:12:00-05:00");
    }

    #[test]
    fn test_morning_and_midnight() {
        assert_eq!(parser().parse("9:05am EDT").unwrap(), "09:05:00-04:00");
        assert_eq!(parser().parse("12:30am GMT").unwrap(), "00:30:00+00:00");
        assert_eq!(parser().parse("12:30pm GMT").unwrap(), "12:30:00+00:00");
    }

    #[test]
    fn test_dotted_meridiem_and_spacing() {
        assert_eq!(parser().parse("4:00 p.m. ET").unwrap(), "16:00:00-05:00");
    }

    #[test]
    fn test_meridiem_must_end_a_word() {
        assert_eq!(parser().parse("13:00 amid talks").unwrap(), "13:00:00+00:00");
        assert_eq!(parser().parse("10:00 pmx").unwrap(), "10:00:00+00:00");
        assert_eq!(parser().parse("10:00 p.m.").unwrap(), "22:00:00+00:00");
        assert_eq!(parser().parse("10:00pm.").unwrap(), "22:00:00+00:00");
    }

    #[test]
    fn test_twenty_four_hour_with_seconds() {
        assert_eq!(parser().parse("21:45:30 CET").unwrap(), "21:45:30+01:00");
    }

    #[test]
    fn test_fractional_zone() {
        assert_eq!(parser().parse("6:15am NPT").unwrap(), "06:15:00+05:45");
        assert_eq!(parser().parse("6:15am NST").unwrap(), "06:15:00-03:30");
    }

    #[test]
    fn test_unknown_zone_falls_back_to_utc() {
        assert_eq!(parser().parse("3:12pm XYZ").unwrap(), "15:12:00+00:00");
        assert_eq!(parser().parse("3:12pm").unwrap(), "15:12:00+00:00");
    }

    #[test]
    fn test_lowercase_zone() {
        assert_eq!(parser().parse("3:12pm est").unwrap(), "15:12:00-05:00");
    }

    #[test]
    fn test_last_clock_wins() {
        assert_eq!(
            parser().parse("Dow at 1:00 then 2:30pm EST").unwrap(),
            "14:30:00-05:00"
        );
    }

    #[test]
    fn test_injected_table() {
        let table = TimezoneTable::parse("-5 EST").unwrap();
        let parser = TimeParser::new(&table);
        assert_eq!(parser.parse("10:00am EST").unwrap(), "10:00:00-05:00");
        assert_eq!(parser.parse("10:00am GMT").unwrap(), "10:00:00+00:00");
    }

    #[test]
    fn test_not_found() {
        assert_eq!(
            parser().parse("  no time here "),
            Err(TimeParseError::NotFound("no time here".to_string()))
        );
        assert!(matches!(parser().parse(""), Err(TimeParseError::NotFound(_))));
    }

    #[test]
    fn test_out_of_range() {
        assert!(matches!(
            parser().parse("13:00pm EST"),
            Err(TimeParseError::OutOfRange(_))
        ));
        assert!(matches!(
            parser().parse("9:75 EST"),
            Err(TimeParseError::OutOfRange(_))
        ));
        assert!(matches!(
            parser().parse("25:00"),
            Err(TimeParseError::OutOfRange(_))
        ));
    }
}
