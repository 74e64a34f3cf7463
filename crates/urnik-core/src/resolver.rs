//! Slug paths and the numeric identifiers embedded in timetable pages.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, ResolutionError};
use crate::types::{QueryKey, SchoolSlug, Slug};

/// Bodies the service returns instead of a page for a bad school.
pub const INVALID_SCHOOL_PHRASES: [&str; 2] = ["Šola ni veljavna!", "Šola ni izbrana!"];

/// Sentinel for "all interest activities".
const ALL_ACTIVITIES: &str = "vse";

/// A public timetable page: a school, one of its classes, or one of its classrooms.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResolvePath {
    School(SchoolSlug),
    Class { school: SchoolSlug, class: Slug },
    Classroom { school: SchoolSlug, classroom: Slug },
}

impl ResolvePath {
    pub const fn school(&self) -> &SchoolSlug {
        match self {
            Self::School(school)
            | Self::Class { school, .. }
            | Self::Classroom { school, .. } => school,
        }
    }

    /// Path below the `urniki/` prefix.
    pub fn to_path(&self) -> String {
        match self {
            Self::School(school) => school.to_string(),
            Self::Class { school, class } => format!("{school}/razredi/{class}"),
            Self::Classroom { school, classroom } => format!("{school}/ucilnice/{classroom}"),
        }
    }
}

impl fmt::Display for ResolvePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_path())
    }
}

impl FromStr for ResolvePath {
    type Err = ResolutionError;

    /// Accepts full URLs or bare paths; only the trailing segments matter.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ResolutionError::InvalidPath(s.to_string());
        let path = s.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|seg| !seg.is_empty()).collect();

        let school_at = |index: usize| {
            segments
                .get(index)
                .and_then(|seg| SchoolSlug::new(*seg).ok())
                .ok_or_else(invalid)
        };
        let slug_at = |index: usize| {
            segments
                .get(index)
                .and_then(|seg| Slug::new(*seg).ok())
                .ok_or_else(invalid)
        };

        match segments.as_slice() {
            [] => Err(invalid()),
            [.., _, "razredi", _] => Ok(Self::Class {
                school: school_at(segments.len() - 3)?,
                class: slug_at(segments.len() - 1)?,
            }),
            [.., _, "ucilnice", _] => Ok(Self::Classroom {
                school: school_at(segments.len() - 3)?,
                classroom: slug_at(segments.len() - 1)?,
            }),
            [.., "razredi" | "ucilnice"] => Err(invalid()),
            [.., last] => Ok(Self::School(SchoolSlug::new(*last).map_err(|_| invalid())?)),
        }
    }
}

/// Fails with [`Error::InvalidSchool`] when the body is one of the service's
/// rejection phrases.
pub fn check_school_response(body: &str) -> Result<(), Error> {
    let trimmed = body.trim();
    if INVALID_SCHOOL_PHRASES.contains(&trimmed) {
        return Err(Error::InvalidSchool {
            message: trimmed.to_string(),
        });
    }
    Ok(())
}

struct Marker {
    name: &'static str,
    pattern: LazyLock<Regex>,
}

macro_rules! marker {
    ($name:literal, $value:literal) => {
        Marker {
            name: $name,
            pattern: LazyLock::new(|| {
                Regex::new(concat!(r"var\s+", $name, r"\s*=\s*'(", $value, r")'"))
                    .expect("marker pattern is valid")
            }),
        }
    };
}

static SCHOOL_ID: Marker = marker!("id_sola", r"\d+");
static CLASS_ID: Marker = marker!("id_razred", r"\d+");
static PROFESSOR_ID: Marker = marker!("id_profesor", r"\d+");
static CLASSROOM_ID: Marker = marker!("id_ucilnica", r"\d+");
static STUDENT_ID: Marker = marker!("id_dijak", r"\d+");
static INTEREST_ACTIVITY: Marker = marker!("id_interesna_dejavnost", r"\d+|vse");
static WEEK: Marker = marker!("teden", r"\d+");

fn marker_value<'t>(marker: &Marker, text: &'t str) -> Result<&'t str, ResolutionError> {
    marker
        .pattern
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .ok_or(ResolutionError::MissingMarker {
            marker: marker.name,
        })
}

fn parse_number<T: FromStr>(marker: &Marker, value: &str) -> Result<T, ResolutionError> {
    value.parse().map_err(|_| ResolutionError::InvalidNumber {
        marker: marker.name,
        value: value.to_string(),
    })
}

fn numeric<T: FromStr>(marker: &Marker, text: &str) -> Result<T, ResolutionError> {
    parse_number(marker, marker_value(marker, text)?)
}

/// Extracts the query identifiers a timetable page embeds as script variables.
///
/// Every marker must be present; a missing one means the page layout changed.
pub fn parse_page_variables(text: &str) -> Result<QueryKey, ResolutionError> {
    let interest_activity = match marker_value(&INTEREST_ACTIVITY, text)? {
        ALL_ACTIVITIES => 0,
        value => parse_number(&INTEREST_ACTIVITY, value)?,
    };

    Ok(QueryKey {
        school_id: numeric(&SCHOOL_ID, text)?,
        class_id: numeric(&CLASS_ID, text)?,
        professor_id: numeric(&PROFESSOR_ID, text)?,
        classroom_id: numeric(&CLASSROOM_ID, text)?,
        interest_activity,
        week: numeric(&WEEK, text)?,
        student_id: numeric(&STUDENT_ID, text)?,
    })
}
