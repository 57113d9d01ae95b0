//! Main analyzer API
//!
//! The [`Analyzer`] is the entry point of the library. Construct one per
//! session and pass it to whatever needs to run an analysis; it owns the tag
//! syntax and holds no per-run state, so a full resolve + summarize pass can
//! be repeated on every data refresh or filter change.

use crate::config::EngineConfig;
use crate::dates::DateTokenParser;
use crate::extract::TagExtractor;
use crate::filter::DateFilterState;
use crate::report::{summarize, AttendanceSummary};
use crate::resolver::{AttendanceBook, AttendanceResolver};
use crate::types::{AttendanceTag, Comment, Result};
use std::sync::atomic::{AtomicU64, Ordering};

/// The main analyzer struct - entry point for all analysis operations
#[derive(Debug, Clone)]
pub struct Analyzer {
    resolver: AttendanceResolver,
}

impl Analyzer {
    /// Create an analyzer for the given configuration
    ///
    /// # Example
    /// ```
    /// use attendance_engine::{Analyzer, Comment, DateFilterState, EngineConfig};
    ///
    /// let analyzer = Analyzer::new(EngineConfig::new().with_reference_year(2023)).unwrap();
    /// let comments = vec![Comment::new("민수", "2023-04-28", "5.2 @참석 철수, 영희.")];
    ///
    /// let filter: DateFilterState = ["2023-05-02".parse().unwrap()].into_iter().collect();
    /// let summary = analyzer.analyze(&comments, &filter);
    /// assert_eq!(summary.total_attending(), 2);
    /// ```
    pub fn new(config: EngineConfig) -> Result<Self> {
        let extractor = TagExtractor::new(config)?;
        log::debug!(
            "Analyzer ready, reference year {}",
            extractor.parser().year()
        );
        Ok(Self {
            resolver: AttendanceResolver::new(extractor),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        self.resolver.extractor().config()
    }

    /// Date parser bound to this analyzer's reference year
    pub fn date_parser(&self) -> &DateTokenParser {
        self.resolver.extractor().parser()
    }

    /// Tags found in one comment body
    pub fn extract(&self, content: &str, author: &str) -> Vec<AttendanceTag> {
        self.resolver.extractor().extract(content, author)
    }

    /// Resolve comments into per-(name, date) records, unfiltered
    pub fn resolve(&self, comments: &[Comment]) -> AttendanceBook {
        self.resolver.resolve(comments)
    }

    /// Aggregate a resolved book over the selected dates
    pub fn summarize(&self, book: &AttendanceBook, filter: &DateFilterState) -> AttendanceSummary {
        summarize(book, filter)
    }

    /// Full pass: resolve every comment, then summarize over `filter`
    pub fn analyze(&self, comments: &[Comment], filter: &DateFilterState) -> AttendanceSummary {
        let book = self.resolve(comments);
        self.summarize(&book, filter)
    }
}

/// Marker for one refresh started through a [`RefreshTracker`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RefreshTicket(u64);

/// Discards results of refreshes that were superseded by a newer one.
///
/// The analyzer itself has no notion of concurrent refreshes; callers that may
/// overlap them take a ticket before starting and hand the result back
/// through [`RefreshTracker::accept`].
#[derive(Debug, Default)]
pub struct RefreshTracker {
    latest: AtomicU64,
}

impl RefreshTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a refresh, superseding every earlier ticket
    pub fn begin(&self) -> RefreshTicket {
        RefreshTicket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// True if no refresh started after this ticket
    pub fn is_current(&self, ticket: RefreshTicket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }

    /// Keep `result` only if its refresh is still the latest
    pub fn accept<T>(&self, ticket: RefreshTicket, result: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(result)
        } else {
            log::debug!("Discarding result of superseded refresh {:?}", ticket);
            None
        }
    }
}
