//! Week banner and day header parsing.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

use crate::dom::Node;
use crate::error::FormatError;
use crate::model::WeekInfo;

/// Separator between the banner fields (ASCII unit separator).
pub const BANNER_SEPARATOR: char = '\u{1f}';

/// The academic year starts in this month.
const ACADEMIC_YEAR_START_MONTH: u32 = 7;

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("number pattern is valid"));

fn numeric_tokens(text: &str) -> Vec<u32> {
    NUMBER
        .find_iter(text)
        .filter_map(|m| m.as_str().parse().ok())
        .collect()
}

/// Parses a full `d. m. yyyy` date.
pub fn parse_full_date(text: &str) -> Result<NaiveDate, FormatError> {
    let tokens = numeric_tokens(text);
    let [day, month, year, ..] = tokens[..] else {
        return Err(FormatError::DateTokens {
            expected: 3,
            text: text.to_string(),
        });
    };
    let year = i32::try_from(year).map_err(|_| FormatError::Date(text.to_string()))?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| FormatError::Date(text.to_string()))
}

/// Parses the `week<US>start<US>end` banner.
pub fn parse_week_banner(text: &str) -> Result<WeekInfo, FormatError> {
    let fields: Vec<&str> = text.trim().split(BANNER_SEPARATOR).map(str::trim).collect();
    let [week, start, end] = fields[..] else {
        return Err(FormatError::BannerTokens {
            found: fields.len(),
            text: text.to_string(),
        });
    };

    Ok(WeekInfo {
        week: week
            .parse()
            .map_err(|_| FormatError::WeekNumber(week.to_string()))?,
        start: parse_full_date(start)?,
        end: parse_full_date(end)?,
    })
}

/// First calendar year of the academic year containing `today`.
pub fn academic_year_for(today: NaiveDate) -> i32 {
    if today.month() < ACADEMIC_YEAR_START_MONTH {
        today.year() - 1
    } else {
        today.year()
    }
}

/// Parses a yearless `d. m.` header date.
///
/// Months before July belong to the second calendar year of the academic year
/// containing `today`, the rest to its first year.
pub fn parse_day_date(text: &str, today: NaiveDate) -> Result<NaiveDate, FormatError> {
    let tokens = numeric_tokens(text);
    let [day, month, ..] = tokens[..] else {
        return Err(FormatError::DateTokens {
            expected: 2,
            text: text.to_string(),
        });
    };
    let start_year = academic_year_for(today);
    let year = if month < ACADEMIC_YEAR_START_MONTH {
        start_year + 1
    } else {
        start_year
    };
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| FormatError::Date(text.to_string()))
}

/// Parses the header row into the ordered day dates.
///
/// The first cell labels the period column and is skipped. Each day cell holds
/// the weekday name and the date in two `div`s.
pub fn parse_header_row<N: Node>(row: &N, today: NaiveDate) -> Result<Vec<NaiveDate>, FormatError> {
    let mut dates: Vec<NaiveDate> = Vec::new();
    for (index, cell) in row.children().iter().enumerate().skip(1) {
        let lines = cell.find_all_tag("div");
        let date_line = lines
            .get(1)
            .ok_or(FormatError::MissingDateLine { index })?;
        let date = parse_day_date(&date_line.text(), today)?;
        if let Some(&previous) = dates.last() {
            if date <= previous {
                return Err(FormatError::DatesNotIncreasing {
                    previous,
                    next: date,
                });
            }
        }
        dates.push(date);
    }
    Ok(dates)
}
