//! Event kinds carried by the marker icons of timetable cells.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Classification of a timetable entry beyond an ordinary lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Substitution,
    Cancelled,
    HalfPeriod,
    GenericEvent,
    Activity,
    Occupation,
    UnfinishedPeriod,
    OfficeHours,
    VideoConference,
    Exam,
    MultipleGroups,
    Unknown,
}

impl EventKind {
    /// Maps a marker `title` attribute to its kind.
    ///
    /// Titles missing from the table map to [`EventKind::Unknown`] and log a
    /// warning; this never fails.
    pub fn from_marker_title(title: &str) -> Self {
        match title.trim() {
            "Nadomeščanje" => Self::Substitution,
            "Odpadla ura" => Self::Cancelled,
            "Polovična ura" => Self::HalfPeriod,
            "Dogodek" => Self::GenericEvent,
            "Interesna dejavnost" => Self::Activity,
            "Zaposlitev" => Self::Occupation,
            "Neopravljena ura" => Self::UnfinishedPeriod,
            "Govorilne ure" => Self::OfficeHours,
            "Videokonferenca" => Self::VideoConference,
            "Izpiti" => Self::Exam,
            "Več skupin" => Self::MultipleGroups,
            other => {
                tracing::warn!(title = other, "unknown event marker");
                Self::Unknown
            }
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Substitution => "substitution",
            Self::Cancelled => "cancelled",
            Self::HalfPeriod => "half_period",
            Self::GenericEvent => "generic_event",
            Self::Activity => "activity",
            Self::Occupation => "occupation",
            Self::UnfinishedPeriod => "unfinished_period",
            Self::OfficeHours => "office_hours",
            Self::VideoConference => "video_conference",
            Self::Exam => "exam",
            Self::MultipleGroups => "multiple_groups",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = UnknownEventKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "substitution" => Ok(Self::Substitution),
            "cancelled" => Ok(Self::Cancelled),
            "half_period" => Ok(Self::HalfPeriod),
            "generic_event" => Ok(Self::GenericEvent),
            "activity" => Ok(Self::Activity),
            "occupation" => Ok(Self::Occupation),
            "unfinished_period" => Ok(Self::UnfinishedPeriod),
            "office_hours" => Ok(Self::OfficeHours),
            "video_conference" => Ok(Self::VideoConference),
            "exam" => Ok(Self::Exam),
            "multiple_groups" => Ok(Self::MultipleGroups),
            "unknown" => Ok(Self::Unknown),
            _ => Err(UnknownEventKind(s.to_string())),
        }
    }
}

impl Serialize for EventKind {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventKind {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Error type for unknown serialized event kind strings.
#[derive(Debug, Clone)]
pub struct UnknownEventKind(String);

impl fmt::Display for UnknownEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown event kind: {}", self.0)
    }
}

impl std::error::Error for UnknownEventKind {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_marker_titles() {
        assert_eq!(
            EventKind::from_marker_title("Nadomeščanje"),
            EventKind::Substitution
        );
        assert_eq!(
            EventKind::from_marker_title("Odpadla ura"),
            EventKind::Cancelled
        );
        assert_eq!(
            EventKind::from_marker_title(" Govorilne ure "),
            EventKind::OfficeHours
        );
        assert_eq!(EventKind::from_marker_title("Izpiti"), EventKind::Exam);
    }

    #[test]
    fn unrecognized_marker_is_unknown() {
        assert_eq!(
            EventKind::from_marker_title("Šolski ples"),
            EventKind::Unknown
        );
        assert_eq!(EventKind::from_marker_title(""), EventKind::Unknown);
    }

    #[test]
    fn string_form_parses_back() {
        let variants = [
            EventKind::Substitution,
            EventKind::Cancelled,
            EventKind::HalfPeriod,
            EventKind::GenericEvent,
            EventKind::Activity,
            EventKind::Occupation,
            EventKind::UnfinishedPeriod,
            EventKind::OfficeHours,
            EventKind::VideoConference,
            EventKind::Exam,
            EventKind::MultipleGroups,
            EventKind::Unknown,
        ];

        for variant in &variants {
            let parsed: EventKind = variant.to_string().parse().expect("should parse");
            assert_eq!(parsed, *variant, "roundtrip failed for {variant:?}");
        }
    }

    #[test]
    fn serializes_as_snake_case() {
        let json = serde_json::to_string(&EventKind::VideoConference).unwrap();
        assert_eq!(json, "\"video_conference\"");
        let err = serde_json::from_str::<EventKind>("\"party\"").unwrap_err();
        assert!(err.to_string().contains("unknown event kind: party"));
    }
}
