//! Date token parsing
//!
//! Turns short tokens such as `5.2` into calendar dates, and resolves comment
//! timestamps to the date they were written on.

use crate::types::{CalendarDate, DateParseError, EngineError};
use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveDateTime, Utc};

/// Naive date-time layouts seen in forum timestamps
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y.%m.%d %H:%M:%S",
    "%Y.%m.%d %H:%M",
    "%Y.%m.%d. %H:%M:%S",
    "%Y.%m.%d. %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

/// Date-only layouts
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y.%m.%d", "%Y/%m/%d"];

/// Parses `<month><sep><day>` tokens against a fixed reference year.
///
/// The year is never advanced: a January token parsed in December stays in
/// the current year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateTokenParser {
    year: i32,
}

impl DateTokenParser {
    /// Parser bound to the current local calendar year
    pub fn current() -> Self {
        Self {
            year: Local::now().year(),
        }
    }

    /// Parser bound to a fixed year
    pub fn with_year(year: i32) -> Self {
        Self { year }
    }

    /// Parser for an optional pinned year
    pub fn for_year(year: Option<i32>) -> Self {
        year.map(Self::with_year).unwrap_or_else(Self::current)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Parse a token into a date.
    ///
    /// The first two integer runs are month and day. Month must be 1-12 and
    /// day 1-31.
    pub fn parse(&self, token: &str) -> Result<CalendarDate, DateParseError> {
        let mut numbers = integer_runs(token);
        let (Some(month), Some(day)) = (numbers.next(), numbers.next()) else {
            return Err(DateParseError::MissingComponents(token.to_string()));
        };

        // Overlong runs cannot be a month or a day
        let month = month.parse::<u32>().unwrap_or(u32::MAX);
        let day = day.parse::<u32>().unwrap_or(u32::MAX);

        CalendarDate::new(self.year, month, day)
    }

    /// Parse either a full `YYYY-MM-DD` date or a short token
    pub fn parse_any(&self, input: &str) -> Result<CalendarDate, EngineError> {
        let date = input.parse::<CalendarDate>().or_else(|_| self.parse(input))?;
        Ok(date)
    }
}

impl Default for DateTokenParser {
    fn default() -> Self {
        Self::current()
    }
}

/// Iterate over the maximal ASCII digit runs of a string
fn integer_runs(s: &str) -> impl Iterator<Item = &str> {
    s.split(|c: char| !c.is_ascii_digit())
        .filter(|run| !run.is_empty())
}

/// Resolve a comment timestamp to its calendar date.
///
/// Offset-carrying timestamps are converted to UTC first. Returns `None` when
/// no known layout matches.
pub fn resolve_comment_date(time: &str) -> Option<CalendarDate> {
    let trimmed = time.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc).date_naive().into());
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(trimmed) {
        return Some(dt.with_timezone(&Utc).date_naive().into());
    }

    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt.date().into());
        }
    }

    // Forum style dates often end with a dot: `2023.05.02.`
    let date_part = trimmed.trim_end_matches('.');
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(date_part, format) {
            return Some(date.into());
        }
    }

    None
}
