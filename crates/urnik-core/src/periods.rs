//! Period rows: the time slot label and the raw per-day cells.

use chrono::NaiveTime;

use crate::dom::{Node, normalize_ws};
use crate::error::FormatError;
use crate::model::TimeSlot;

const TIME_FORMAT: &str = "%H:%M";

/// Label of the period before the first numbered one.
const PRE_PERIOD: &str = "predura";

/// Parses `HH:MM - HH:MM`.
pub fn parse_time_range(text: &str) -> Result<(NaiveTime, NaiveTime), FormatError> {
    let invalid = || FormatError::TimeRange(text.to_string());
    let (start, end) = text.split_once('-').ok_or_else(invalid)?;
    let start = NaiveTime::parse_from_str(start.trim(), TIME_FORMAT).map_err(|_| invalid())?;
    let end = NaiveTime::parse_from_str(end.trim(), TIME_FORMAT).map_err(|_| invalid())?;
    Ok((start, end))
}

/// Ordinal of a period label: `predura` is 0, `<n>. ura` is n.
pub fn period_number(name: &str) -> Option<u32> {
    let name = name.trim();
    if name.eq_ignore_ascii_case(PRE_PERIOD) {
        return Some(0);
    }
    name.split_once('.')
        .and_then(|(number, _)| number.trim().parse().ok())
}

/// Parses the label cell: period name and time range in two `div`s.
pub fn parse_period_label<N: Node>(cell: &N, row: usize) -> Result<TimeSlot, FormatError> {
    let lines = cell.find_all_tag("div");
    let [name, range, ..] = lines.as_slice() else {
        return Err(FormatError::MissingPeriodLabel { row });
    };
    let name = normalize_ws(&name.text());
    let (start, end) = parse_time_range(&normalize_ws(&range.text()))?;
    Ok(TimeSlot {
        number: period_number(&name),
        name,
        start,
        end,
    })
}

/// One body row split into its time slot and day cells.
#[derive(Debug, Clone)]
pub struct PeriodRow<N> {
    pub slot: TimeSlot,
    /// One entry per day; `None` marks a free period.
    pub cells: Vec<Option<N>>,
}

/// Splits a body row; cell `i` after the label belongs to day `i - 1`.
///
/// A cell without a `style` attribute is a free period.
pub fn parse_period_row<N: Node>(
    row: &N,
    index: usize,
    day_count: usize,
) -> Result<PeriodRow<N>, FormatError> {
    let cells = row.children();
    let (label, days) = cells
        .split_first()
        .ok_or(FormatError::MissingPeriodLabel { row: index })?;
    let slot = parse_period_label(label, index)?;

    if days.len() != day_count {
        return Err(FormatError::RowWidth {
            period: slot.name,
            expected: day_count,
            found: days.len(),
        });
    }

    let cells = days
        .iter()
        .map(|cell| cell.attr("style").map(|_| cell.clone()))
        .collect();
    Ok(PeriodRow { slot, cells })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Element;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn label(name: &str, range: &str) -> Element {
        Element::new("td")
            .with_child(Element::new("div").with_attr("class", "text14").with_text(name))
            .with_child(Element::new("div").with_attr("class", "text10").with_text(range))
    }

    #[test]
    fn time_range_parses() {
        assert_eq!(
            parse_time_range("07:30 - 08:15").unwrap(),
            (time(7, 30), time(8, 15))
        );
        assert_eq!(parse_time_range("8:20-9:05").unwrap(), (time(8, 20), time(9, 5)));
        assert!(matches!(
            parse_time_range("08:20"),
            Err(FormatError::TimeRange(_))
        ));
        assert!(parse_time_range("25:00 - 26:00").is_err());
    }

    #[test]
    fn period_numbers() {
        assert_eq!(period_number("predura"), Some(0));
        assert_eq!(period_number("3. ura"), Some(3));
        assert_eq!(period_number("odmor"), None);
    }

    #[test]
    fn row_with_free_and_styled_cells() {
        let row = Element::new("tr")
            .with_child(label("1. ura", "08:00 - 08:45"))
            .with_child(Element::new("td"))
            .with_child(Element::new("td").with_attr("style", "background: #fff"));

        let parsed = parse_period_row(&&row, 0, 2).unwrap();
        assert_eq!(parsed.slot.name, "1. ura");
        assert_eq!(parsed.slot.number, Some(1));
        assert_eq!(parsed.slot.start, time(8, 0));
        assert!(parsed.cells[0].is_none());
        assert!(parsed.cells[1].is_some());
    }

    #[test]
    fn row_width_must_match_header() {
        let row = Element::new("tr")
            .with_child(label("2. ura", "08:50 - 09:35"))
            .with_child(Element::new("td"));

        assert_eq!(
            parse_period_row(&&row, 1, 5).unwrap_err(),
            FormatError::RowWidth {
                period: "2. ura".into(),
                expected: 5,
                found: 1,
            }
        );
    }

    #[test]
    fn label_needs_two_lines() {
        let row = Element::new("tr")
            .with_child(Element::new("td").with_child(Element::new("div").with_text("1. ura")));

        assert_eq!(
            parse_period_row(&&row, 4, 0).unwrap_err(),
            FormatError::MissingPeriodLabel { row: 4 }
        );
    }
}
