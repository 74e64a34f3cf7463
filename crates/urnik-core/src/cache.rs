//! Time-boxed result cache keyed by query parameters.
//!
//! Entries are partitioned by [`CacheCategory`] and checked for staleness only
//! when read; nothing runs in the background.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::RwLock;

use crate::types::{CacheCategory, QueryKey};

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// TTL from a number of seconds, saturating at the largest representable span.
pub fn ttl_from_secs(secs: u64) -> TimeDelta {
    i64::try_from(secs)
        .ok()
        .and_then(TimeDelta::try_seconds)
        .unwrap_or(TimeDelta::MAX)
}

#[derive(Debug)]
struct CacheEntry<T> {
    captured_at: DateTime<Utc>,
    value: Arc<T>,
}

/// Per-instance query cache.
pub struct QueryCache<T> {
    ttl: TimeDelta,
    clock: Arc<dyn Clock>,
    entries: RwLock<HashMap<(CacheCategory, QueryKey), CacheEntry<T>>>,
}

impl<T> QueryCache<T> {
    pub fn new(ttl: TimeDelta) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: TimeDelta, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub const fn ttl(&self) -> TimeDelta {
        self.ttl
    }

    /// Returns the fresh value for `key`, or computes and stores a new one.
    ///
    /// `force` skips the lookup. A failing `compute` leaves the cache untouched.
    /// The computation runs without holding the lock, so concurrent misses on
    /// the same key may both compute; the last store wins.
    pub fn get_or_try_insert<E>(
        &self,
        category: CacheCategory,
        key: QueryKey,
        force: bool,
        compute: impl FnOnce() -> Result<T, E>,
    ) -> Result<Arc<T>, E> {
        if !force {
            if let Some(value) = self.get(category, key) {
                tracing::debug!(?category, ?key, "cache hit");
                return Ok(value);
            }
        }

        tracing::debug!(?category, ?key, force, "cache miss");
        let value = Arc::new(compute()?);
        let entry = CacheEntry {
            captured_at: self.clock.now(),
            value: Arc::clone(&value),
        };
        self.entries.write().insert((category, key), entry);
        Ok(value)
    }

    /// The stored value if it is still fresh.
    pub fn get(&self, category: CacheCategory, key: QueryKey) -> Option<Arc<T>> {
        let now = self.clock.now();
        let entries = self.entries.read();
        let entry = entries.get(&(category, key))?;
        (now - entry.captured_at < self.ttl).then(|| Arc::clone(&entry.value))
    }

    /// Number of stored entries, stale ones included.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }
}

impl<T> std::fmt::Debug for QueryCache<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCache")
            .field("ttl", &self.ttl)
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use chrono::TimeZone;
    use parking_lot::Mutex;

    use super::*;

    struct ManualClock(Mutex<DateTime<Utc>>);

    impl ManualClock {
        fn new() -> Arc<Self> {
            Arc::new(Self(Mutex::new(
                Utc.with_ymd_and_hms(2024, 5, 6, 8, 0, 0).unwrap(),
            )))
        }

        fn advance(&self, secs: i64) {
            *self.0.lock() += TimeDelta::seconds(secs);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock()
        }
    }

    fn cache(clock: &Arc<ManualClock>) -> QueryCache<u32> {
        QueryCache::with_clock(TimeDelta::seconds(300), clock.clone())
    }

    fn ok(value: u32) -> impl FnOnce() -> Result<u32, Infallible> {
        move || Ok(value)
    }

    #[test]
    fn fresh_hit_returns_the_same_value() {
        let clock = ManualClock::new();
        let cache = cache(&clock);
        let key = QueryKey::school(1);

        let first = cache.get_or_try_insert(CacheCategory::School, key, false, ok(1)).unwrap();
        clock.advance(299);
        let second = cache
            .get_or_try_insert(CacheCategory::School, key, false, || -> Result<u32, Infallible> {
                panic!("fresh entry must not recompute")
            })
            .unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn stale_entry_is_recomputed() {
        let clock = ManualClock::new();
        let cache = cache(&clock);
        let key = QueryKey::school(1);

        cache.get_or_try_insert(CacheCategory::Class, key, false, ok(1)).unwrap();
        clock.advance(300);
        let value = cache.get_or_try_insert(CacheCategory::Class, key, false, ok(2)).unwrap();

        assert_eq!(*value, 2);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn force_bypasses_a_fresh_entry() {
        let clock = ManualClock::new();
        let cache = cache(&clock);
        let key = QueryKey::school(1);

        cache.get_or_try_insert(CacheCategory::Class, key, false, ok(1)).unwrap();
        let value = cache.get_or_try_insert(CacheCategory::Class, key, true, ok(2)).unwrap();
        assert_eq!(*value, 2);
        assert_eq!(cache.get(CacheCategory::Class, key).as_deref(), Some(&2));
    }

    #[test]
    fn categories_and_keys_are_separate() {
        let clock = ManualClock::new();
        let cache = cache(&clock);
        let key = QueryKey::school(1);

        cache.get_or_try_insert(CacheCategory::Class, key, false, ok(1)).unwrap();
        cache.get_or_try_insert(CacheCategory::Classroom, key, false, ok(2)).unwrap();
        cache
            .get_or_try_insert(CacheCategory::Class, key.with_week(4), false, ok(3))
            .unwrap();

        assert_eq!(cache.len(), 3);
        assert_eq!(cache.get(CacheCategory::Classroom, key).as_deref(), Some(&2));
    }

    #[test]
    fn errors_store_nothing() {
        let cache: QueryCache<u32> = QueryCache::new(TimeDelta::seconds(300));
        let result = cache.get_or_try_insert(CacheCategory::School, QueryKey::default(), false, || {
            Err::<u32, _>("boom")
        });
        assert_eq!(result.unwrap_err(), "boom");
        assert!(cache.is_empty());
    }

    #[test]
    fn zero_ttl_never_hits() {
        let clock = ManualClock::new();
        let cache = QueryCache::with_clock(TimeDelta::zero(), clock);
        cache.get_or_try_insert(CacheCategory::School, QueryKey::default(), false, ok(1)).unwrap();
        assert!(cache.get(CacheCategory::School, QueryKey::default()).is_none());
    }

    #[test]
    fn ttl_saturates() {
        assert_eq!(ttl_from_secs(300), TimeDelta::seconds(300));
        assert_eq!(ttl_from_secs(u64::MAX), TimeDelta::MAX);
    }
}
