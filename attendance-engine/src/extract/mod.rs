//! Attendance tag extraction
//!
//! This module scans comment text for `<date> @<action> <names>.` tags and
//! splits the name segments that follow them.

pub mod names;
pub mod tags;

// Re-export key types for convenience
pub use names::NameSegment;
pub use tags::TagExtractor;
