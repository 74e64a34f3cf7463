//! Cached access to one school's timetables.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::TimeDelta;
use parking_lot::RwLock;

use crate::cache::{Clock, QueryCache, SystemClock, ttl_from_secs};
use crate::error::{Result, TransportError};
use crate::extract::extract_html;
use crate::model::Timetable;
use crate::resolver::{ResolvePath, check_school_response, parse_page_variables};
use crate::types::{CacheCategory, QueryKey, SchoolSlug, Slug, View};

/// Retrieves raw documents from the timetable service.
pub trait DocumentFetcher {
    /// Public page below `urniki/`, e.g. `abc123/razredi/4402`.
    fn fetch_page(&self, path: &str) -> std::result::Result<String, TransportError>;

    /// The timetable fragment for `query`.
    fn fetch_timetable(&self, query: &QueryKey) -> std::result::Result<String, TransportError>;
}

impl<F: DocumentFetcher + ?Sized> DocumentFetcher for &F {
    fn fetch_page(&self, path: &str) -> std::result::Result<String, TransportError> {
        (**self).fetch_page(path)
    }

    fn fetch_timetable(&self, query: &QueryKey) -> std::result::Result<String, TransportError> {
        (**self).fetch_timetable(query)
    }
}

/// Fetches the page at `path` and reads the identifiers it embeds.
pub fn resolve<F: DocumentFetcher + ?Sized>(fetcher: &F, path: &ResolvePath) -> Result<QueryKey> {
    let page = fetcher.fetch_page(&path.to_path())?;
    check_school_response(&page)?;
    let key = parse_page_variables(&page)?;
    tracing::debug!(%path, ?key, "resolved page variables");
    Ok(key)
}

/// Timetables of a single school, cached per query.
///
/// Each instance owns its cache and its memo of resolved slug pages.
pub struct Timetables<F> {
    fetcher: F,
    school: SchoolSlug,
    school_id: u64,
    cache: QueryCache<Timetable>,
    resolved: RwLock<HashMap<ResolvePath, QueryKey>>,
    clock: Arc<dyn Clock>,
}

impl<F: DocumentFetcher> Timetables<F> {
    /// Resolves the school's numeric id; fails if the service rejects the school.
    pub fn new(fetcher: F, school: SchoolSlug, cache_seconds: u64) -> Result<Self> {
        Self::with_clock(fetcher, school, ttl_from_secs(cache_seconds), Arc::new(SystemClock))
    }

    pub fn with_clock(
        fetcher: F,
        school: SchoolSlug,
        ttl: TimeDelta,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let mut timetables = Self {
            fetcher,
            school: school.clone(),
            school_id: 0,
            cache: QueryCache::with_clock(ttl, Arc::clone(&clock)),
            resolved: RwLock::new(HashMap::new()),
            clock,
        };
        timetables.school_id = timetables.resolve(&ResolvePath::School(school))?.school_id;
        tracing::debug!(school = %timetables.school, id = timetables.school_id, "resolved school");
        Ok(timetables)
    }

    pub const fn school_slug(&self) -> &SchoolSlug {
        &self.school
    }

    pub const fn school_id(&self) -> u64 {
        self.school_id
    }

    pub const fn cache(&self) -> &QueryCache<Timetable> {
        &self.cache
    }

    /// Numeric identifiers embedded in the page at `path`, memoized.
    pub fn resolve(&self, path: &ResolvePath) -> Result<QueryKey> {
        if let Some(key) = self.resolved.read().get(path) {
            return Ok(*key);
        }

        let key = resolve(&self.fetcher, path)?;
        self.resolved.write().insert(path.clone(), key);
        Ok(key)
    }

    /// School-wide timetable; week 0 is the current week.
    pub fn school(&self, week: u32, recache: bool) -> Result<Arc<Timetable>> {
        let query = QueryKey::school(self.school_id).with_week(week);
        self.fetch(CacheCategory::School, query, View::Limited, recache)
    }

    pub fn class(&self, class: &Slug, week: u32, recache: bool) -> Result<Arc<Timetable>> {
        let path = ResolvePath::Class {
            school: self.school.clone(),
            class: class.clone(),
        };
        let query = QueryKey {
            class_id: self.resolve(&path)?.class_id,
            ..QueryKey::school(self.school_id).with_week(week)
        };
        self.fetch(CacheCategory::Class, query, View::Class, recache)
    }

    pub fn classroom(&self, classroom: &Slug, week: u32, recache: bool) -> Result<Arc<Timetable>> {
        let path = ResolvePath::Classroom {
            school: self.school.clone(),
            classroom: classroom.clone(),
        };
        let query = QueryKey {
            classroom_id: self.resolve(&path)?.classroom_id,
            ..QueryKey::school(self.school_id).with_week(week)
        };
        self.fetch(CacheCategory::Classroom, query, View::Limited, recache)
    }

    /// Fetches and extracts `query`, or returns the fresh cached result.
    pub fn fetch(
        &self,
        category: CacheCategory,
        query: QueryKey,
        view: View,
        recache: bool,
    ) -> Result<Arc<Timetable>> {
        self.cache.get_or_try_insert(category, query, recache, || -> Result<Timetable> {
            let requested_at = self.clock.now();
            let body = self.fetcher.fetch_timetable(&query)?;
            check_school_response(&body)?;
            Ok(extract_html(&body, view, query, requested_at)?)
        })
    }
}

impl<F> std::fmt::Debug for Timetables<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timetables")
            .field("school", &self.school)
            .field("school_id", &self.school_id)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
