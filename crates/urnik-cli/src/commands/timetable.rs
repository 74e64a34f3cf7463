//! Timetable commands for `urnik school`, `urnik class` and `urnik classroom`.
//!
//! Prints the selected week either as a day-by-day listing of occupied
//! periods or as the full extracted timetable in JSON.

use std::fmt::{self, Write as _};
use std::io::Write;
use std::sync::Arc;

use anyhow::{Context, Result};
use urnik_core::{DocumentFetcher, EntryKind, ScheduleEntry, Slug, Timetable, Timetables};

const DATE_FORMAT: &str = "%-d. %-m. %Y";
const DAY_FORMAT: &str = "%A %-d. %-m.";
const TIME_FORMAT: &str = "%H:%M";

/// Which timetable to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    School,
    Class(Slug),
    Classroom(Slug),
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::School => f.write_str("school"),
            Self::Class(slug) => write!(f, "class {slug}"),
            Self::Classroom(slug) => write!(f, "classroom {slug}"),
        }
    }
}

// ========== Human-Readable Output ==========

/// One-line summary of an entry.
pub fn describe(entry: &ScheduleEntry) -> String {
    let mut parts: Vec<&str> = match &entry.kind {
        EntryKind::Class {
            subject_short,
            teacher,
            classroom,
            ..
        } => vec![subject_short.as_str(), teacher.short_name.as_str(), classroom.as_str()],
        EntryKind::Limited {
            class_name,
            teacher,
            ..
        } => vec![class_name.as_str(), teacher.short_name.as_str()],
        EntryKind::Event { title, .. } | EntryKind::LimitedEvent { title, .. } => {
            vec![title.as_str()]
        }
        EntryKind::OfficeHours {
            title,
            teacher,
            classroom,
            ..
        } => vec![title.as_str(), teacher.name.as_str(), classroom.as_str()],
    };
    parts.retain(|part| !part.is_empty());

    let mut line = parts.join(", ");
    let groups = entry.groups();
    if !groups.is_empty() {
        write!(line, " [{}]", groups.join(", ")).unwrap();
    }
    if let Some(event) = entry.event {
        write!(line, " ({event})").unwrap();
    }
    line
}

/// Format a timetable as a day-by-day listing.
pub fn format_timetable(timetable: &Timetable) -> String {
    let mut output = String::new();

    writeln!(
        output,
        "WEEK {} ({} - {})",
        timetable.week.week,
        timetable.week.start.format(DATE_FORMAT),
        timetable.week.end.format(DATE_FORMAT)
    )
    .unwrap();

    for (day, date) in timetable.dates.iter().enumerate() {
        writeln!(output).unwrap();
        writeln!(output, "{}", date.format(DAY_FORMAT)).unwrap();

        let mut free = true;
        for (period, slot) in timetable.periods.iter().enumerate() {
            for entry in timetable.days.slot(day, period).unwrap_or_default() {
                free = false;
                writeln!(
                    output,
                    "  {:<8}  {}-{}  {}",
                    slot.name,
                    slot.start.format(TIME_FORMAT),
                    slot.end.format(TIME_FORMAT),
                    describe(entry)
                )
                .unwrap();
            }
        }
        if free {
            writeln!(output, "  (no lessons)").unwrap();
        }
    }

    output
}

// ========== Public Interface ==========

/// Fetches the timetable for `target`.
pub fn fetch<F: DocumentFetcher>(
    timetables: &Timetables<F>,
    target: &Target,
    week: u32,
) -> Result<Arc<Timetable>> {
    let timetable = match target {
        Target::School => timetables.school(week, false),
        Target::Class(slug) => timetables.class(slug, week, false),
        Target::Classroom(slug) => timetables.classroom(slug, week, false),
    };
    timetable.with_context(|| format!("failed to fetch {target} timetable"))
}

/// Runs a timetable command.
pub fn run<W: Write, F: DocumentFetcher>(
    writer: &mut W,
    timetables: &Timetables<F>,
    target: &Target,
    week: u32,
    json: bool,
) -> Result<()> {
    let timetable = fetch(timetables, target, week)?;

    if json {
        let output = serde_json::to_string_pretty(timetable.as_ref())?;
        writeln!(writer, "{output}")?;
    } else {
        write!(writer, "{}", format_timetable(&timetable))?;
    }

    Ok(())
}
