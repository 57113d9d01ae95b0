//! Aggregation of resolved attendance
//!
//! Produces per-date attending counts and the attendee list for the dates the
//! user selected. Cancelled records never appear in a summary.

use crate::filter::DateFilterState;
use crate::resolver::AttendanceBook;
use crate::types::CalendarDate;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Per-date totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DateCount {
    pub attending: usize,
}

/// One person currently attending on one selected date
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attendee {
    pub name: String,
    pub date: CalendarDate,
}

/// Result of one aggregation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AttendanceSummary {
    /// One entry per selected date, zero when nobody attends
    pub counts: HashMap<CalendarDate, DateCount>,
    /// Attendees in resolution order
    pub attendees: Vec<Attendee>,
}

impl AttendanceSummary {
    /// True when the filter was empty.
    ///
    /// Selected dates with zero attendees still produce entries, so this is
    /// distinct from a summary where every count is zero.
    pub fn nothing_selected(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total_attending(&self) -> usize {
        self.attendees.len()
    }

    pub fn count_for(&self, date: &CalendarDate) -> Option<usize> {
        self.counts.get(date).map(|c| c.attending)
    }

    /// Counts in ascending date order
    pub fn sorted_counts(&self) -> Vec<(CalendarDate, usize)> {
        let mut counts: Vec<(CalendarDate, usize)> = self
            .counts
            .iter()
            .map(|(date, count)| (*date, count.attending))
            .collect();
        counts.sort_unstable_by_key(|(date, _)| *date);
        counts
    }

    /// Attendee names grouped by date, dates ascending
    pub fn names_by_date(&self) -> BTreeMap<CalendarDate, Vec<String>> {
        let mut grouped: BTreeMap<CalendarDate, Vec<String>> = BTreeMap::new();
        for attendee in &self.attendees {
            grouped
                .entry(attendee.date)
                .or_default()
                .push(attendee.name.clone());
        }
        grouped
    }

    /// Plain-text export: `<date> : <name1>, <name2>` per line
    pub fn export_text(&self) -> String {
        self.names_by_date()
            .iter()
            .map(|(date, names)| format!("{} : {}", date, names.join(", ")))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Aggregate a resolved book over the selected dates
pub fn summarize(book: &AttendanceBook, filter: &DateFilterState) -> AttendanceSummary {
    let mut summary = AttendanceSummary {
        counts: filter.iter().map(|date| (*date, DateCount::default())).collect(),
        attendees: Vec::new(),
    };

    if filter.is_empty() {
        log::info!("No dates selected");
        return summary;
    }

    for record in book.iter().filter(|r| r.is_attending()) {
        let Some(count) = summary.counts.get_mut(&record.date) else {
            continue;
        };
        count.attending += 1;
        summary.attendees.push(Attendee {
            name: record.name.clone(),
            date: record.date,
        });
    }

    log::info!(
        "Summary: {} attendees over {} dates",
        summary.attendees.len(),
        summary.counts.len()
    );
    summary
}
