//! Typed timetable model produced by the extraction pipeline.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::event_kind::EventKind;
use crate::types::{QueryKey, View};

/// One body row of the timetable: a period shared by every day of the week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Label as printed, e.g. `3. ura` or `predura`.
    pub name: String,
    /// Ordinal parsed from the label, `predura` being 0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// Week number and date range from the banner above the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekInfo {
    pub week: u32,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teacher {
    pub name: String,
    pub short_name: String,
}

/// A single occupied slot inside a period cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// Position inside the cell, 0 for non-block cells.
    pub hour_in_block: usize,
    /// Marker classification; `None` for an ordinary lesson.
    pub event: Option<EventKind>,
    #[serde(flatten)]
    pub kind: EntryKind,
}

/// Entry shape, keyed by view and event kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EntryKind {
    /// Lesson in a single-class view.
    Class {
        subject: String,
        subject_short: String,
        teacher: Teacher,
        classroom: String,
        groups: Vec<String>,
    },
    /// Lesson in a classroom or school-wide view.
    Limited {
        class_name: String,
        teacher: Teacher,
        groups: Vec<String>,
    },
    /// Generic event in a single-class view.
    Event { title: String, description: String },
    /// Generic event in a classroom or school-wide view.
    LimitedEvent { title: String, description: String },
    /// Teacher office hours, identical in both views.
    OfficeHours {
        title: String,
        description: String,
        teacher: Teacher,
        classroom: String,
    },
}

impl ScheduleEntry {
    pub const fn teacher(&self) -> Option<&Teacher> {
        match &self.kind {
            EntryKind::Class { teacher, .. }
            | EntryKind::Limited { teacher, .. }
            | EntryKind::OfficeHours { teacher, .. } => Some(teacher),
            EntryKind::Event { .. } | EntryKind::LimitedEvent { .. } => None,
        }
    }

    pub fn groups(&self) -> &[String] {
        match &self.kind {
            EntryKind::Class { groups, .. } | EntryKind::Limited { groups, .. } => groups,
            _ => &[],
        }
    }
}

/// Day-major schedule: `days[day][period]` holds the block entries of that slot.
///
/// An empty innermost vector is a free period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid(pub Vec<Vec<Vec<ScheduleEntry>>>);

impl Grid {
    pub fn day_count(&self) -> usize {
        self.0.len()
    }

    /// Entries of one slot, `None` when the indices are out of range.
    pub fn slot(&self, day: usize, period: usize) -> Option<&[ScheduleEntry]> {
        self.0.get(day)?.get(period).map(Vec::as_slice)
    }

    pub fn days(&self) -> impl Iterator<Item = &[Vec<ScheduleEntry>]> {
        self.0.iter().map(Vec::as_slice)
    }
}

/// Result of one extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timetable {
    pub view: View,
    pub query: QueryKey,
    pub week: WeekInfo,
    pub periods: Vec<TimeSlot>,
    pub dates: Vec<NaiveDate>,
    pub days: Grid,
    pub requested_at: DateTime<Utc>,
}

impl Timetable {
    /// Entries of the slot on `date` during the period named `period`.
    pub fn entries_on(&self, date: NaiveDate, period: &str) -> Option<&[ScheduleEntry]> {
        let day = self.dates.iter().position(|d| *d == date)?;
        let period = self.periods.iter().position(|p| p.name == period)?;
        self.days.slot(day, period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lesson(hour_in_block: usize) -> ScheduleEntry {
        ScheduleEntry {
            hour_in_block,
            event: None,
            kind: EntryKind::Limited {
                class_name: "3.A".into(),
                teacher: Teacher {
                    name: "Ana Kos".into(),
                    short_name: "KOS".into(),
                },
                groups: vec!["Skupina 1".into()],
            },
        }
    }

    #[test]
    fn capability_accessors() {
        let entry = lesson(0);
        assert_eq!(entry.teacher().unwrap().short_name, "KOS");
        assert_eq!(entry.groups(), ["Skupina 1".to_string()]);

        let event = ScheduleEntry {
            hour_in_block: 0,
            event: Some(EventKind::GenericEvent),
            kind: EntryKind::Event {
                title: "Športni dan".into(),
                description: String::new(),
            },
        };
        assert!(event.teacher().is_none());
        assert!(event.groups().is_empty());
    }

    #[test]
    fn entry_serializes_with_flat_tag() {
        let json = serde_json::to_value(lesson(1)).unwrap();
        assert_eq!(json["type"], "limited");
        assert_eq!(json["hour_in_block"], 1);
        assert_eq!(json["class_name"], "3.A");
        assert!(json["event"].is_null());

        let parsed: ScheduleEntry = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, lesson(1));
    }

    #[test]
    fn grid_slot_lookup() {
        let grid = Grid(vec![vec![vec![], vec![lesson(0)]]]);
        assert_eq!(grid.day_count(), 1);
        assert_eq!(grid.slot(0, 0), Some(&[][..]));
        assert_eq!(grid.slot(0, 1).map(<[ScheduleEntry]>::len), Some(1));
        assert!(grid.slot(1, 0).is_none());
    }
}
