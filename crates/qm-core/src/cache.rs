use std::sync::Mutex;
use std::time::{Duration, Instant};

/// A single-value cache with an explicit TTL policy and explicit
/// invalidation.
///
/// The schema index is rebuilt from the catalog store through one of
/// these, so report computations never silently run on stale catalogs:
/// staleness is bounded by the constructor-supplied TTL, and writes to
/// the catalog store call `invalidate` to force a rebuild.
pub struct TtlCache<T> {
    slot: Mutex<Option<(Instant, T)>>,
    ttl: Duration,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            slot: Mutex::new(None),
            ttl,
        }
    }

    /// Returns the cached value if present and fresh, otherwise rebuilds
    /// it with `build` and caches the result.
    pub fn get_or_insert_with<F>(&self, build: F) -> T
    where
        F: FnOnce() -> T,
    {
        let mut slot = self.slot.lock().expect("cache mutex poisoned");
        if let Some((stored_at, value)) = slot.as_ref() {
            if stored_at.elapsed() < self.ttl {
                return value.clone();
            }
        }
        let value = build();
        *slot = Some((Instant::now(), value.clone()));
        value
    }

    /// Drops the cached value; the next read rebuilds.
    pub fn invalidate(&self) {
        let mut slot = self.slot.lock().expect("cache mutex poisoned");
        *slot = None;
    }
}
