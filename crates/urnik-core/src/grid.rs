//! Period-major to day-major conversion and final assembly.

use chrono::{DateTime, NaiveDate, Utc};

use crate::model::{Grid, ScheduleEntry, TimeSlot, Timetable, WeekInfo};
use crate::types::{QueryKey, View};

/// Swaps rows and columns of a rectangular matrix.
///
/// Applying it twice returns the input. Ragged input is cut to its shortest row.
pub fn transpose<T>(rows: Vec<Vec<T>>) -> Vec<Vec<T>> {
    let width = rows.iter().map(Vec::len).min().unwrap_or(0);
    let mut columns: Vec<Vec<T>> = (0..width).map(|_| Vec::with_capacity(rows.len())).collect();
    for row in rows {
        for (column, value) in columns.iter_mut().zip(row) {
            column.push(value);
        }
    }
    columns
}

/// Everything the assembler needs besides the period-major rows.
#[derive(Debug, Clone)]
pub struct Assembly {
    pub view: View,
    pub query: QueryKey,
    pub week: WeekInfo,
    pub periods: Vec<TimeSlot>,
    pub dates: Vec<NaiveDate>,
    pub requested_at: DateTime<Utc>,
}

/// Builds the timetable from `rows[period][day]`.
pub fn assemble(rows: Vec<Vec<Vec<ScheduleEntry>>>, parts: Assembly) -> Timetable {
    Timetable {
        view: parts.view,
        query: parts.query,
        week: parts.week,
        periods: parts.periods,
        dates: parts.dates,
        days: Grid(transpose(rows)),
        requested_at: parts.requested_at,
    }
}
