//! Whole-document extraction: banner, header, period rows and cells.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::cell::decompose;
use crate::dom::Node;
use crate::error::FormatError;
use crate::grid::{Assembly, assemble};
use crate::header::{parse_header_row, parse_week_banner};
use crate::html::HtmlDocument;
use crate::model::Timetable;
use crate::periods::parse_period_row;
use crate::types::{QueryKey, View};

/// Table rows in order, looking through row-group wrappers.
fn table_rows<N: Node>(table: &N) -> Vec<N> {
    let mut rows = Vec::new();
    for child in table.children() {
        match child.tag() {
            "tr" => rows.push(child),
            "thead" | "tbody" | "tfoot" => {
                rows.extend(child.children().into_iter().filter(|r| r.tag() == "tr"));
            }
            _ => {}
        }
    }
    rows
}

/// Extracts a timetable from an already parsed document.
///
/// `requested_at` stamps the result and anchors the academic year of the
/// yearless header dates. The anchor is its UTC calendar date, so a request
/// just after midnight local time on 1 July may still count as the
/// previous academic year.
pub fn extract_document<N: Node>(
    root: &N,
    view: View,
    query: QueryKey,
    requested_at: DateTime<Utc>,
) -> Result<Timetable, FormatError> {
    let banner = root.first_text().ok_or(FormatError::MissingBanner)?;
    let week = parse_week_banner(&banner)?;

    let table = root.find_tag("table").ok_or(FormatError::MissingTable)?;
    let rows = table_rows(&table);
    let (header, body) = rows.split_first().ok_or(FormatError::EmptyTable("header row"))?;

    let dates = parse_header_row(header, requested_at.date_naive())?;
    if dates.is_empty() {
        return Err(FormatError::EmptyTable("days"));
    }
    if body.is_empty() {
        return Err(FormatError::EmptyTable("periods"));
    }

    let mut seen = HashSet::new();
    let mut periods = Vec::with_capacity(body.len());
    let mut grid_rows = Vec::with_capacity(body.len());
    for (index, row) in body.iter().enumerate() {
        let parsed = parse_period_row(row, index, dates.len())?;
        if !seen.insert(parsed.slot.name.clone()) {
            return Err(FormatError::DuplicatePeriod(parsed.slot.name));
        }
        let cells = parsed
            .cells
            .iter()
            .map(|cell| cell.as_ref().map_or_else(Vec::new, |cell| decompose(cell, view)))
            .collect();
        periods.push(parsed.slot);
        grid_rows.push(cells);
    }

    tracing::debug!(
        week = week.week,
        days = dates.len(),
        periods = periods.len(),
        "extracted timetable"
    );

    Ok(assemble(
        grid_rows,
        Assembly {
            view,
            query,
            week,
            periods,
            dates,
            requested_at,
        },
    ))
}

/// Parses `text` as HTML and extracts the timetable from it.
pub fn extract_html(
    text: &str,
    view: View,
    query: QueryKey,
    requested_at: DateTime<Utc>,
) -> Result<Timetable, FormatError> {
    let document = HtmlDocument::parse(text);
    extract_document(&document.root(), view, query, requested_at)
}
