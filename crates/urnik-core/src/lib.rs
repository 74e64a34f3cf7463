//! Timetable extraction, normalization and caching for eAsistent weekly grids.
//!
//! This crate contains:
//! - Resolution: turning school, class and classroom slugs into query ids
//! - Extraction: header, period rows, block cells and entries into a day-major grid
//! - Caching: per-query results kept for a configurable number of seconds

pub mod cache;
pub mod cell;
pub mod dom;
pub mod entry;
pub mod error;
pub mod event_kind;
pub mod extract;
pub mod grid;
pub mod header;
pub mod html;
pub mod model;
pub mod periods;
pub mod resolver;
mod timetables;
pub mod types;

pub use cache::{Clock, QueryCache, SystemClock};
pub use error::{EntryError, Error, FormatError, ResolutionError, Result, TransportError};
pub use event_kind::{EventKind, UnknownEventKind};
pub use extract::{extract_document, extract_html};
pub use model::{EntryKind, Grid, ScheduleEntry, Teacher, TimeSlot, Timetable, WeekInfo};
pub use resolver::{ResolvePath, parse_page_variables};
pub use timetables::{DocumentFetcher, Timetables, resolve};
pub use types::{CacheCategory, QueryKey, SchoolSlug, Slug, ValidationError, View};
