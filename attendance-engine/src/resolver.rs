//! Attendance resolution
//!
//! Folds an ordered list of comments into one status per (name, date). The
//! last write in input order wins; comment timestamps play no part in the
//! ordering.

use crate::dates::resolve_comment_date;
use crate::extract::TagExtractor;
use crate::types::{AttendanceAction, AttendanceRecord, CalendarDate, Comment, RecordKey, TagDate};
use std::collections::HashMap;

/// Resolved attendance state.
///
/// Keys are unique. Iteration follows first-insertion order of each key; an
/// overwrite replaces the value in place without moving the key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttendanceBook {
    records: Vec<AttendanceRecord>,
    index: HashMap<RecordKey, usize>,
}

impl AttendanceBook {
    /// Create an empty book
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the record for its (name, date) key.
    ///
    /// Returns the status that was replaced, if the key existed.
    pub fn upsert(&mut self, record: AttendanceRecord) -> Option<AttendanceAction> {
        let key = record.key();
        match self.index.get(&key) {
            Some(&idx) => {
                let previous = self.records[idx].status;
                self.records[idx] = record;
                Some(previous)
            }
            None => {
                self.index.insert(key, self.records.len());
                self.records.push(record);
                None
            }
        }
    }

    /// Look up the record for a name on a date
    pub fn get(&self, name: &str, date: &CalendarDate) -> Option<&AttendanceRecord> {
        self.index
            .get(&RecordKey::new(name, *date))
            .map(|&idx| &self.records[idx])
    }

    /// Records in resolution order
    pub fn iter(&self) -> impl Iterator<Item = &AttendanceRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a AttendanceBook {
    type Item = &'a AttendanceRecord;
    type IntoIter = std::slice::Iter<'a, AttendanceRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Turns comments into an [`AttendanceBook`]
#[derive(Debug, Clone)]
pub struct AttendanceResolver {
    extractor: TagExtractor,
}

impl AttendanceResolver {
    pub fn new(extractor: TagExtractor) -> Self {
        Self { extractor }
    }

    pub fn extractor(&self) -> &TagExtractor {
        &self.extractor
    }

    /// Resolve a full comment list from an empty state.
    ///
    /// Records are produced for every date; date filtering happens when the
    /// book is summarized.
    pub fn resolve(&self, comments: &[Comment]) -> AttendanceBook {
        let mut book = AttendanceBook::new();
        self.resolve_into(&mut book, comments);
        book
    }

    /// Fold more comments into an existing book
    pub fn resolve_into(&self, book: &mut AttendanceBook, comments: &[Comment]) {
        let self_token = self.extractor.config().self_token.as_str();
        let mut written = 0usize;

        for comment in comments {
            for tag in self.extractor.extract(&comment.content, &comment.name) {
                let date = match &tag.date {
                    TagDate::Explicit(date) => *date,
                    TagDate::Unparsed(token) => {
                        log::debug!("Dropping tag with invalid date token {:?}", token);
                        continue;
                    }
                    TagDate::CommentTime => match resolve_comment_date(&comment.time) {
                        Some(date) => date,
                        None => {
                            log::debug!(
                                "Dropping implicit tag, unreadable comment time {:?}",
                                comment.time
                            );
                            continue;
                        }
                    },
                };

                if tag.names.is_empty() {
                    log::debug!("Dropping {} tag for {} with no names", tag.action, date);
                    continue;
                }

                for name in &tag.names {
                    let name = if name == self_token {
                        comment.name.as_str()
                    } else {
                        name.as_str()
                    };

                    let previous = book.upsert(AttendanceRecord {
                        name: name.to_string(),
                        date,
                        status: tag.action,
                        source_time: date.to_string(),
                    });
                    log::trace!(
                        "Upsert {} {} -> {} (was {:?})",
                        name,
                        date,
                        tag.action,
                        previous
                    );
                    written += 1;
                }
            }
        }

        log::info!(
            "Resolved {} comments: {} writes, {} records",
            comments.len(),
            written,
            book.len()
        );
    }
}
