//! Identifier types with validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for identifier types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// The value would escape its URL path segment.
    #[error("{field} cannot contain '/': {value}")]
    PathSeparator { field: &'static str, value: String },
}

/// Generates a validated slug newtype with common trait implementations.
macro_rules! define_slug {
    (
        $(#[$meta:meta])*
        $name:ident, $field_name:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new slug after validation.
            pub fn new(slug: impl Into<String>) -> Result<Self, ValidationError> {
                let slug = slug.into();
                let trimmed = slug.trim();
                if trimmed.is_empty() {
                    return Err(ValidationError::Empty { field: $field_name });
                }
                if trimmed.contains('/') {
                    return Err(ValidationError::PathSeparator {
                        field: $field_name,
                        value: slug,
                    });
                }
                Ok(Self(trimmed.to_string()))
            }

            /// Returns the slug as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(slug: $name) -> Self {
                slug.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_slug!(
    /// Public identifier of a school as it appears in timetable URLs.
    SchoolSlug, "school slug"
);

define_slug!(
    /// Public identifier of a class (or classroom) below a school URL.
    Slug, "slug"
);

/// Numeric query parameters of the timetable endpoint.
///
/// Every field defaults to 0, which the service reads as "all" or "current".
/// Two keys are equal iff all parameters are equal, so the key doubles as the
/// cache fingerprint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryKey {
    pub school_id: u64,
    pub class_id: u64,
    pub professor_id: u64,
    pub classroom_id: u64,
    pub interest_activity: u64,
    pub week: u32,
    pub student_id: u64,
}

impl QueryKey {
    /// A school-wide query for the current week.
    pub fn school(school_id: u64) -> Self {
        Self {
            school_id,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_week(mut self, week: u32) -> Self {
        self.week = week;
        self
    }

    /// Form fields in the order the endpoint expects them.
    pub fn form_fields(&self) -> [(&'static str, String); 7] {
        [
            ("id_sola", self.school_id.to_string()),
            ("id_razred", self.class_id.to_string()),
            ("id_profesor", self.professor_id.to_string()),
            ("id_dijak", self.student_id.to_string()),
            ("id_ucilnica", self.classroom_id.to_string()),
            ("teden", self.week.to_string()),
            ("id_interesna_dejavnost", self.interest_activity.to_string()),
        ]
    }
}

/// Cache partition a query belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheCategory {
    Class,
    Classroom,
    School,
}

/// Which entry shape the builder emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    /// A single selected class: subject, teacher and classroom per entry.
    Class,
    /// Classroom or school-wide: the class name replaces subject detail.
    Limited,
}

impl CacheCategory {
    pub const fn view(self) -> View {
        match self {
            Self::Class => View::Class,
            Self::Classroom | Self::School => View::Limited,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn slug_rejects_empty_and_separators() {
        assert!(SchoolSlug::new("").is_err());
        assert!(SchoolSlug::new("   ").is_err());
        assert!(matches!(
            Slug::new("a/b"),
            Err(ValidationError::PathSeparator { .. })
        ));
        assert_eq!(Slug::new(" 1a ").unwrap().as_str(), "1a");
    }

    #[test]
    fn slug_serde_rejects_empty() {
        let parsed: Result<Slug, _> = serde_json::from_str("\"\"");
        assert!(parsed.is_err());
        let slug: SchoolSlug = serde_json::from_str("\"abc123\"").unwrap();
        assert_eq!(slug.as_ref(), "abc123");
    }

    #[test]
    fn query_keys_compare_structurally() {
        let a = QueryKey::school(42).with_week(3);
        let b = QueryKey {
            school_id: 42,
            week: 3,
            ..QueryKey::default()
        };
        let c = QueryKey::school(42);

        let set: HashSet<QueryKey> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn form_fields_use_endpoint_names() {
        let key = QueryKey {
            school_id: 182,
            class_id: 7,
            week: 12,
            ..QueryKey::default()
        };
        let fields = key.form_fields();
        assert_eq!(fields[0], ("id_sola", "182".to_string()));
        assert_eq!(fields[1], ("id_razred", "7".to_string()));
        assert_eq!(fields[5], ("teden", "12".to_string()));
        assert_eq!(fields[6], ("id_interesna_dejavnost", "0".to_string()));
    }

    #[test]
    fn categories_select_views() {
        assert_eq!(CacheCategory::Class.view(), View::Class);
        assert_eq!(CacheCategory::Classroom.view(), View::Limited);
        assert_eq!(CacheCategory::School.view(), View::Limited);
    }
}
