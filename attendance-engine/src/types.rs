//! Core types for the attendance engine
//!
//! This module defines the records flowing through the engine: the comments
//! handed in by the ingestion layer, the transient tags found in a comment,
//! and the resolved per-(name, date) attendance records.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// A single comment as produced by the ingestion layer.
///
/// Order within a batch matters: a later comment overrides an earlier one
/// for the same (name, date) key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Comment author
    pub name: String,
    /// Raw timestamp (ISO-8601 or a forum-style date string)
    pub time: String,
    /// Free text of the comment
    pub content: String,
}

impl Comment {
    pub fn new(
        name: impl Into<String>,
        time: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            time: time.into(),
            content: content.into(),
        }
    }
}

/// A calendar date normalized to `YYYY-MM-DD`.
///
/// Month is 1-12 and day is 1-31; the day is not checked against the
/// month length, so `2023-02-30` is representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CalendarDate {
    year: i32,
    month: u32,
    day: u32,
}

impl CalendarDate {
    /// Build a date, validating month and day ranges
    pub fn new(year: i32, month: u32, day: u32) -> std::result::Result<Self, DateParseError> {
        if !(1..=12).contains(&month) {
            return Err(DateParseError::MonthOutOfRange(month));
        }
        if !(1..=31).contains(&day) {
            return Err(DateParseError::DayOutOfRange(day));
        }
        Ok(Self { year, month, day })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    /// Compact display label, e.g. `5월 2일`
    pub fn short_label(&self) -> String {
        format!("{}월 {}일", self.month, self.day)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl FromStr for CalendarDate {
    type Err = DateParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut parts = trimmed.splitn(3, '-');
        let (Some(y), Some(m), Some(d)) = (parts.next(), parts.next(), parts.next()) else {
            return Err(DateParseError::Malformed(s.to_string()));
        };

        let all_digits = |p: &str| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit());
        if y.len() != 4 || m.len() != 2 || d.len() != 2 || ![y, m, d].into_iter().all(all_digits) {
            return Err(DateParseError::Malformed(s.to_string()));
        }

        let year = y
            .parse::<i32>()
            .map_err(|_| DateParseError::Malformed(s.to_string()))?;
        let month = m
            .parse::<u32>()
            .map_err(|_| DateParseError::Malformed(s.to_string()))?;
        let day = d
            .parse::<u32>()
            .map_err(|_| DateParseError::Malformed(s.to_string()))?;

        Self::new(year, month, day)
    }
}

impl TryFrom<String> for CalendarDate {
    type Error = DateParseError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CalendarDate> for String {
    fn from(date: CalendarDate) -> Self {
        date.to_string()
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        }
    }
}

/// What a tag declares for its names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceAction {
    Attend,
    Cancel,
}

impl fmt::Display for AttendanceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttendanceAction::Attend => write!(f, "attend"),
            AttendanceAction::Cancel => write!(f, "cancel"),
        }
    }
}

/// Where a tag's date comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagDate {
    /// Date token parsed successfully
    Explicit(CalendarDate),
    /// Date token matched the tag pattern but did not parse (e.g. `13.5`)
    Unparsed(String),
    /// Implicit attendance: use the comment's own timestamp
    CommentTime,
}

/// One attendance tag found in a comment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceTag {
    pub date: TagDate,
    pub action: AttendanceAction,
    /// Names in first-seen order, without duplicates
    pub names: Vec<String>,
    /// Byte offset of the tag within the comment content
    pub match_offset: usize,
}

impl AttendanceTag {
    /// The parsed date, if the tag carried a valid token
    pub fn explicit_date(&self) -> Option<&CalendarDate> {
        match &self.date {
            TagDate::Explicit(date) => Some(date),
            _ => None,
        }
    }

    /// True for the tag synthesized by the bare-keyword fallback
    pub fn is_implicit(&self) -> bool {
        self.date == TagDate::CommentTime
    }
}

/// Composite key of the resolved attendance state
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordKey {
    pub name: String,
    pub date: CalendarDate,
}

impl RecordKey {
    pub fn new(name: impl Into<String>, date: CalendarDate) -> Self {
        Self {
            name: name.into(),
            date,
        }
    }
}

/// Resolved attendance for one (name, date) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub name: String,
    pub date: CalendarDate,
    pub status: AttendanceAction,
    /// Resolved date of the tag that wrote this record, as `YYYY-MM-DD`
    pub source_time: String,
}

impl AttendanceRecord {
    pub fn key(&self) -> RecordKey {
        RecordKey::new(self.name.clone(), self.date)
    }

    pub fn is_attending(&self) -> bool {
        self.status == AttendanceAction::Attend
    }
}

/// Failure to turn a token or string into a [`CalendarDate`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateParseError {
    #[error("Date token has fewer than two numbers: {0:?}")]
    MissingComponents(String),

    #[error("Month out of range: {0}")]
    MonthOutOfRange(u32),

    #[error("Day out of range: {0}")]
    DayOutOfRange(u32),

    #[error("Not a YYYY-MM-DD date: {0:?}")]
    Malformed(String),
}

/// Errors that can occur in the engine
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Invalid date: {0}")]
    InvalidDate(#[from] DateParseError),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to build tag pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("State store error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calendar_date_display_pads() {
        let date = CalendarDate::new(2023, 5, 2).unwrap();
        assert_eq!(date.to_string(), "2023-05-02");
        assert_eq!(date.short_label(), "5월 2일");
    }

    #[test]
    fn test_calendar_date_from_str() {
        let date: CalendarDate = "2023-12-31".parse().unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2023, 12, 31));

        // No per-month day count check
        assert!("2023-02-30".parse::<CalendarDate>().is_ok());

        assert!("2023-13-01".parse::<CalendarDate>().is_err());
        assert!("2023-5-2".parse::<CalendarDate>().is_err());
        assert!("5.2".parse::<CalendarDate>().is_err());
        assert!("".parse::<CalendarDate>().is_err());
    }

    #[test]
    fn test_calendar_date_ordering_matches_iso() {
        let a: CalendarDate = "2023-05-10".parse().unwrap();
        let b: CalendarDate = "2023-11-02".parse().unwrap();
        assert!(a < b);
        assert!(a.to_string() < b.to_string());
    }

    #[test]
    fn test_calendar_date_serde_as_string() {
        let date = CalendarDate::new(2024, 1, 9).unwrap();
        let json = serde_json::to_string(&date).unwrap();
        assert_eq!(json, "\"2024-01-09\"");

        let back: CalendarDate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, date);
        assert!(serde_json::from_str::<CalendarDate>("\"garbage\"").is_err());
    }

    #[test]
    fn test_tag_helpers() {
        let date = CalendarDate::new(2023, 5, 2).unwrap();
        let tag = AttendanceTag {
            date: TagDate::Explicit(date),
            action: AttendanceAction::Attend,
            names: vec!["철수".to_string()],
            match_offset: 0,
        };
        assert_eq!(tag.explicit_date(), Some(&date));
        assert!(!tag.is_implicit());
    }
}
