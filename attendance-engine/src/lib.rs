//! Attendance Engine Library
//!
//! A stateless, reusable library for turning free-form comment threads into
//! per-date attendance counts and attendee lists.
//!
//! # Architecture
//!
//! This library is intentionally minimal and focused on analysis:
//! - Parses short date tokens (`5.2`) into calendar dates
//! - Scans comments for `<date> @참석|@취소 <names>.` tags
//! - Folds repeated mentions into one status per (name, date), last write wins
//! - Aggregates attending counts over a user-selected set of dates
//!
//! The library does NOT:
//! - Fetch or parse forum pages
//! - Persist state (it only defines the [`StateStore`] seam)
//! - Render tables or charts
//!
//! All of that lives in the application layer (attendance-cli).
//!
//! # Example Usage
//!
//! ```
//! use attendance_engine::{Analyzer, Comment, DateCatalog, EngineConfig};
//!
//! let analyzer = Analyzer::new(EngineConfig::new().with_reference_year(2023)).unwrap();
//!
//! let comments = vec![
//!     Comment::new("민수", "2023-04-28T09:00:00Z", "5.1 @참석 본인, 철수."),
//!     Comment::new("철수", "2023-04-29T10:00:00Z", "5.1 @취소 철수."),
//! ];
//!
//! let mut catalog = DateCatalog::new();
//! catalog.add_date("2023-05-01".parse().unwrap(), true);
//!
//! let summary = analyzer.analyze(&comments, catalog.filter());
//! assert_eq!(summary.export_text(), "2023-05-01 : 민수");
//! ```

// Public modules
pub mod analyzer;
pub mod config;
pub mod filter;
pub mod report;
pub mod types;

// Re-export main types for convenience
pub use analyzer::{Analyzer, RefreshTicket, RefreshTracker};
pub use config::EngineConfig;
pub use dates::{resolve_comment_date, DateTokenParser};
pub use extract::TagExtractor;
pub use filter::{DateCatalog, DateFilterState, FilterSnapshot, StateStore};
pub use report::{summarize, AttendanceSummary, Attendee, DateCount};
pub use resolver::{AttendanceBook, AttendanceResolver};
pub use types::{
    AttendanceAction, AttendanceRecord, AttendanceTag, CalendarDate, Comment,
    DateParseError, EngineError, RecordKey, Result, TagDate,
};

// Internal modules (exposed through the re-exports above)
mod dates;
mod extract;
mod resolver;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
