//! Report rendering
//!
//! Text tables and a bar chart for the terminal, plus a JSON view with dates
//! in ascending order.

use attendance_engine::{AttendanceSummary, Attendee, CalendarDate, DateCatalog};
use serde::Serialize;
use std::io::{self, Write};

const BAR_WIDTH: usize = 30;

#[derive(Debug, Serialize)]
struct DateRow {
    date: CalendarDate,
    label: String,
    attending: usize,
}

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    nothing_selected: bool,
    dates: Vec<DateRow>,
    attendees: &'a [Attendee],
}

/// Render the summary as text tables and a bar chart
pub fn write_txt<W: Write>(out: &mut W, summary: &AttendanceSummary) -> io::Result<()> {
    if summary.nothing_selected() {
        writeln!(out, "No dates selected.")?;
        writeln!(out, "Select dates with `dates add <DATE>` or `dates check <DATE>`.")?;
        return Ok(());
    }

    let counts = summary.sorted_counts();
    let max = counts.iter().map(|(_, n)| *n).max().unwrap_or(0);

    writeln!(out, "═══════════════════════════════════════════════")?;
    writeln!(out, "  Attendance by date")?;
    writeln!(out, "═══════════════════════════════════════════════")?;
    for (date, count) in &counts {
        writeln!(
            out,
            "  {:<10}  {:>8}  {:<width$} {}",
            date.to_string(),
            date.short_label(),
            bar(*count, max),
            count,
            width = BAR_WIDTH
        )?;
    }
    writeln!(out, "───────────────────────────────────────────────")?;
    writeln!(out, "  Total attending: {}", summary.total_attending())?;

    writeln!(out)?;
    writeln!(out, "  Attendees")?;
    writeln!(out, "───────────────────────────────────────────────")?;
    let grouped = summary.names_by_date();
    if grouped.is_empty() {
        writeln!(out, "  (nobody yet)")?;
    }
    for (date, names) in &grouped {
        writeln!(out, "  {} ({}명)", date.short_label(), names.len())?;
        for name in names {
            writeln!(out, "    - {}", name)?;
        }
    }

    Ok(())
}

/// Render the summary as JSON
pub fn write_json<W: Write>(out: &mut W, summary: &AttendanceSummary) -> io::Result<()> {
    let report = JsonReport {
        nothing_selected: summary.nothing_selected(),
        dates: summary
            .sorted_counts()
            .into_iter()
            .map(|(date, attending)| DateRow {
                date,
                label: date.short_label(),
                attending,
            })
            .collect(),
        attendees: &summary.attendees,
    };

    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)
}

/// List known dates with their selection state
pub fn write_dates<W: Write>(out: &mut W, catalog: &DateCatalog) -> io::Result<()> {
    let dates = catalog.known_dates();
    if dates.is_empty() {
        writeln!(out, "No dates saved.")?;
        return Ok(());
    }

    for date in dates {
        let mark = if catalog.is_checked(&date) { "x" } else { " " };
        writeln!(out, "[{}] {}  {}", mark, date, date.short_label())?;
    }
    Ok(())
}

fn bar(count: usize, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let len = (count * BAR_WIDTH).div_ceil(max);
    "█".repeat(len)
}
