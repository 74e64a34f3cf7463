//! Error taxonomy for extraction, resolution and transport.

use thiserror::Error;

/// Top-level error returned by the extraction pipeline and the facade.
#[derive(Debug, Error)]
pub enum Error {
    /// The upstream service rejected the school (not valid or not selected).
    #[error("invalid school: {message}")]
    InvalidSchool { message: String },
    /// The document could not be fetched.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The document does not have the expected weekly-grid shape.
    #[error("unexpected timetable format: {0}")]
    Format(#[from] FormatError),
    /// A slug could not be turned into numeric identifiers.
    #[error("identifier resolution failed: {0}")]
    Resolution(#[from] ResolutionError),
}

/// Failure reported by a [`DocumentFetcher`](crate::DocumentFetcher).
#[derive(Debug, Error)]
pub enum TransportError {
    /// The server answered with a non-success status.
    #[error("{url} returned status {status}")]
    Status { url: String, status: u16 },
    /// The request itself failed (connection, timeout, body decoding).
    #[error("request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Structural problems with the header or the period rows.
///
/// These abort the whole extraction since the grid would be corrupt.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("timetable table not found")]
    MissingTable,
    #[error("week banner not found")]
    MissingBanner,
    #[error("week banner must hold 3 fields, found {found}: {text:?}")]
    BannerTokens { found: usize, text: String },
    #[error("invalid week number: {0:?}")]
    WeekNumber(String),
    #[error("expected at least {expected} numeric tokens in date {text:?}")]
    DateTokens { expected: usize, text: String },
    #[error("invalid calendar date: {0:?}")]
    Date(String),
    #[error("header cell {index} has no date line")]
    MissingDateLine { index: usize },
    #[error("header dates must strictly increase ({previous} then {next})")]
    DatesNotIncreasing {
        previous: chrono::NaiveDate,
        next: chrono::NaiveDate,
    },
    #[error("invalid time range: {0:?}")]
    TimeRange(String),
    #[error("period row {row} has no label cell")]
    MissingPeriodLabel { row: usize },
    #[error("duplicate period name: {0:?}")]
    DuplicatePeriod(String),
    #[error("period {period:?} has {found} day cells, header has {expected}")]
    RowWidth {
        period: String,
        expected: usize,
        found: usize,
    },
    #[error("timetable has no {0}")]
    EmptyTable(&'static str),
}

/// Failures while turning a slug page into a [`QueryKey`](crate::QueryKey).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// An expected `var <name> = '...'` marker is missing from the page.
    #[error("page variable {marker} not found")]
    MissingMarker { marker: &'static str },
    /// The marker was present but its value is not a number.
    #[error("page variable {marker} is not numeric: {value:?}")]
    InvalidNumber { marker: &'static str, value: String },
    /// The slug path does not follow `<school>[/razredi/<class> | /ucilnice/<room>]`.
    #[error("invalid timetable path: {0:?}")]
    InvalidPath(String),
}

/// Failure of a single sub-entry; recovered by dropping that sub-entry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EntryError {
    #[error("sub-entry has no primary text cell")]
    MissingPrimaryCell,
    #[error("office hours entry has no teacher line")]
    MissingOfficeHoursLine,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
