//! In-memory TTL cache for raw API responses.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use pokedex_core::constants::{DEFAULT_CACHE_TTL_MS, MIN_REAP_INTERVAL_MS};

use crate::reaper::Reaper;

/// Cache entry stamped with its insertion time.
#[derive(Clone)]
struct CacheEntry {
    payload: Bytes,
    created_at: Instant,
}

impl CacheEntry {
    fn new(payload: Bytes) -> Self {
        Self {
            payload,
            created_at: Instant::now(),
        }
    }

    fn is_expired_at(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.created_at) > ttl
    }
}

/// Cache configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Entry TTL in milliseconds
    pub ttl_ms: u64,
    /// Reaper period in milliseconds; `None` reaps once per TTL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reap_interval_ms: Option<u64>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_ms: DEFAULT_CACHE_TTL_MS,
            reap_interval_ms: None,
        }
    }
}

impl CacheConfig {
    /// Creates a config with the given TTL, reaping once per TTL.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl_ms: ttl.as_millis().try_into().unwrap_or(u64::MAX),
            reap_interval_ms: None,
        }
    }

    /// Overrides the reaper period.
    pub fn reap_every(mut self, interval: Duration) -> Self {
        self.reap_interval_ms = Some(interval.as_millis().try_into().unwrap_or(u64::MAX));
        self
    }

    /// Entry TTL.
    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }

    /// Effective reaper period, never shorter than one millisecond.
    pub fn reap_interval(&self) -> Duration {
        let ms = self.reap_interval_ms.unwrap_or(self.ttl_ms);
        Duration::from_millis(ms.max(MIN_REAP_INTERVAL_MS))
    }
}

/// State shared between the cache handle and its reaper thread.
///
/// One exclusive lock guards the map; `add`, `get` and `reap` all take it.
pub(crate) struct Shared {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
    hits: AtomicU64,
    misses: AtomicU64,
    reaped: AtomicU64,
}

impl Shared {
    /// Removes every entry older than the TTL as of `now`.
    ///
    /// Returns the number of entries removed.
    pub(crate) fn reap(&self, now: Instant) -> usize {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, e| !e.is_expired_at(now, self.ttl));
        let removed = before - entries.len();
        drop(entries);

        if removed > 0 {
            self.reaped.fetch_add(removed as u64, Ordering::Relaxed);
            debug!(removed, "Reaped expired cache entries");
        } else {
            trace!("Reap pass found nothing to remove");
        }
        removed
    }
}

/// Thread-safe cache of byte payloads keyed by string (usually a request URL).
///
/// Entries are never expired on read. A background thread wakes once per
/// reap interval and removes entries older than the TTL, so an entry lives
/// at least `ttl` and at most `ttl + reap_interval`.
///
/// The reaper stops when [`close`](Self::close) is called or the cache is
/// dropped.
pub struct ExpiringCache {
    shared: Arc<Shared>,
    reaper: Mutex<Option<Reaper>>,
    reap_interval: Duration,
}

impl ExpiringCache {
    /// Creates a cache whose reaper runs once per `ttl`.
    ///
    /// The TTL is kept at full `Duration` precision.
    pub fn new(ttl: Duration) -> Self {
        Self::start(ttl, ttl.max(Duration::from_millis(MIN_REAP_INTERVAL_MS)))
    }

    /// Creates a cache with custom configuration.
    pub fn with_config(config: CacheConfig) -> Self {
        Self::start(config.ttl(), config.reap_interval())
    }

    fn start(ttl: Duration, reap_interval: Duration) -> Self {
        let shared = Arc::new(Shared {
            entries: Mutex::new(HashMap::new()),
            ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            reaped: AtomicU64::new(0),
        });
        let reaper = Reaper::spawn(Arc::clone(&shared), reap_interval);

        debug!(?ttl, ?reap_interval, "Created expiring cache");

        Self {
            shared,
            reaper: Mutex::new(reaper),
            reap_interval,
        }
    }

    /// Stores `payload` under `key`, replacing any previous entry and its timestamp.
    pub fn add(&self, key: impl Into<String>, payload: impl Into<Bytes>) {
        let entry = CacheEntry::new(payload.into());
        self.shared.entries.lock().insert(key.into(), entry);
    }

    /// Returns the payload stored under `key`, if any.
    ///
    /// Age is not checked here; only the reaper removes entries.
    pub fn get(&self, key: &str) -> Option<Bytes> {
        let found = self.shared.entries.lock().get(key).map(|e| e.payload.clone());
        let counter = if found.is_some() {
            &self.shared.hits
        } else {
            &self.shared.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    /// Stops the reaper thread and waits for it to exit.
    ///
    /// The cache stays usable afterwards but entries are no longer reaped.
    /// Calling this more than once is a no-op.
    pub fn close(&self) {
        // Take the handle out first so the join runs without the mutex held.
        let reaper = self.reaper.lock().take();
        if let Some(reaper) = reaper {
            reaper.stop();
        }
    }

    /// Returns true while the reaper thread is running.
    pub fn is_reaping(&self) -> bool {
        self.reaper.lock().is_some()
    }

    /// Entry TTL.
    pub fn ttl(&self) -> Duration {
        self.shared.ttl
    }

    /// Period of the reaper.
    pub fn reap_interval(&self) -> Duration {
        self.reap_interval
    }

    /// Returns the number of cached entries.
    pub fn len(&self) -> usize {
        self.shared.entries.lock().len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.shared.entries.lock().is_empty()
    }

    /// Returns cache statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.len(),
            hits: self.shared.hits.load(Ordering::Relaxed),
            misses: self.shared.misses.load(Ordering::Relaxed),
            reaped: self.shared.reaped.load(Ordering::Relaxed),
            ttl: self.shared.ttl,
        }
    }
}

impl Drop for ExpiringCache {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for ExpiringCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpiringCache")
            .field("entries", &self.len())
            .field("ttl", &self.shared.ttl)
            .field("reap_interval", &self.reap_interval)
            .finish()
    }
}

/// Cache statistics.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub reaped: u64,
    pub ttl: Duration,
}

impl CacheStats {
    /// Fraction of lookups that were hits, or `0.0` before any lookup.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::thread::sleep;

    const LONG_TTL: Duration = Duration::from_secs(5);

    fn created_at(cache: &ExpiringCache, key: &str) -> Instant {
        cache.shared.entries.lock()[key].created_at
    }

    #[test]
    fn test_cache_add_get() {
        let cases = [
            ("http://www.example.com", "Some test data"),
            ("http://www.example.com/path", "Some test data for path"),
        ];
        for (key, val) in cases {
            let cache = ExpiringCache::new(LONG_TTL);
            cache.add(key, val.as_bytes().to_vec());
            assert_eq!(cache.get(key).as_deref(), Some(val.as_bytes()));
        }
    }

    #[test]
    fn test_cache_miss() {
        let cache = ExpiringCache::new(LONG_TTL);
        assert!(cache.get("https://pokeapi.co/api/v2/pokemon/missingno").is_none());
    }

    #[test]
    fn test_cache_replace_refreshes_timestamp() {
        let cache = ExpiringCache::new(LONG_TTL);
        cache.add("k", Bytes::from_static(b"first"));
        let first = created_at(&cache, "k");
        sleep(Duration::from_millis(2));
        cache.add("k", Bytes::from_static(b"second"));

        assert_eq!(cache.get("k").unwrap(), Bytes::from_static(b"second"));
        assert!(created_at(&cache, "k") > first);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_reap_keeps_entries_within_ttl() {
        let cache = ExpiringCache::new(LONG_TTL);
        cache.add("k", Bytes::from_static(b"v"));
        let t0 = created_at(&cache, "k");

        assert_eq!(cache.shared.reap(t0 + LONG_TTL / 2), 0);
        // Age equal to the TTL is not yet expired.
        assert_eq!(cache.shared.reap(t0 + LONG_TTL), 0);
        assert!(cache.get("k").is_some());
    }

    #[test]
    fn test_reap_removes_only_expired() {
        let cache = ExpiringCache::new(LONG_TTL);
        cache.add("old", Bytes::from_static(b"v"));
        let t0 = created_at(&cache, "old");
        sleep(Duration::from_millis(5));
        cache.add("new", Bytes::from_static(b"v"));

        let now = t0 + LONG_TTL + Duration::from_millis(1);
        assert_eq!(cache.shared.reap(now), 1);
        assert!(cache.get("old").is_none());
        assert!(cache.get("new").is_some());
        assert_eq!(cache.stats().reaped, 1);
    }

    #[test]
    fn test_reap_with_clock_before_insert_is_noop() {
        let cache = ExpiringCache::new(LONG_TTL);
        let before = Instant::now();
        cache.add("k", Bytes::from_static(b"v"));
        assert_eq!(cache.shared.reap(before), 0);
    }

    #[test]
    fn test_get_does_not_expire_lazily() {
        let cache = ExpiringCache::new(Duration::from_millis(1));
        cache.close();
        cache.add("k", Bytes::from_static(b"v"));
        sleep(Duration::from_millis(10));
        assert!(cache.get("k").is_some());
    }

    #[test]
    fn test_reap_loop() {
        let base = Duration::from_millis(5);
        let cache = ExpiringCache::new(base);
        cache.add("https://example.com", b"testdata".to_vec());
        assert!(cache.get("https://example.com").is_some());

        sleep(base * 2 + Duration::from_millis(10));
        assert!(cache.get("https://example.com").is_none());
    }

    #[test]
    fn test_sub_millisecond_ttl_is_kept_exact() {
        let ttl = Duration::from_micros(1_900);
        let cache = ExpiringCache::new(ttl);
        cache.close();
        assert_eq!(cache.ttl(), ttl);

        cache.add("k", Bytes::from_static(b"v"));
        let t0 = created_at(&cache, "k");
        assert_eq!(cache.shared.reap(t0 + Duration::from_micros(1_500)), 0);
        assert!(cache.get("k").is_some());
        assert_eq!(cache.shared.reap(t0 + Duration::from_micros(1_901)), 1);
    }

    #[test]
    fn test_get_waits_for_exclusive_lock() {
        let cache = Arc::new(ExpiringCache::new(LONG_TTL));
        cache.add("k", Bytes::from_static(b"v"));

        let guard = cache.shared.entries.lock();
        let (tx, rx) = std::sync::mpsc::channel();
        let reader = {
            let cache = Arc::clone(&cache);
            std::thread::spawn(move || {
                let got = cache.get("k");
                tx.send(got).unwrap();
            })
        };

        // Blocked while another holder owns the map.
        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
        drop(guard);
        assert_eq!(
            rx.recv_timeout(Duration::from_secs(5)).unwrap(),
            Some(Bytes::from_static(b"v"))
        );
        reader.join().unwrap();
    }

    #[test]
    fn test_close_from_another_thread_releases_handle() {
        let cache = Arc::new(ExpiringCache::new(LONG_TTL));
        let closer = {
            let cache = Arc::clone(&cache);
            std::thread::spawn(move || cache.close())
        };
        closer.join().unwrap();
        assert!(!cache.is_reaping());
        // A second close finds nothing left to join.
        cache.close();
    }

    #[test]
    fn test_close_stops_reaper() {
        let cache = ExpiringCache::new(Duration::from_millis(1));
        assert!(cache.is_reaping());
        cache.close();
        assert!(!cache.is_reaping());
        cache.close();
    }

    #[test]
    fn test_zero_ttl_reap_interval_is_clamped() {
        let cache = ExpiringCache::new(Duration::ZERO);
        assert_eq!(cache.reap_interval(), Duration::from_millis(MIN_REAP_INTERVAL_MS));
    }

    #[test]
    fn test_config_reap_interval() {
        let config = CacheConfig::with_ttl(Duration::from_secs(30));
        assert_eq!(config.reap_interval(), Duration::from_secs(30));

        let config = config.reap_every(Duration::from_secs(1));
        assert_eq!(config.ttl(), Duration::from_secs(30));
        assert_eq!(config.reap_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_config_deserialize_defaults() {
        let config: CacheConfig = serde_json::from_str(r#"{"ttl_ms": 250}"#).unwrap();
        assert_eq!(config.ttl(), Duration::from_millis(250));
        assert_eq!(config.reap_interval_ms, None);
    }

    #[test]
    fn test_cache_stats() {
        let cache = ExpiringCache::new(LONG_TTL);
        cache.add("a", Bytes::from_static(b"1"));
        cache.add("b", Bytes::from_static(b"2"));
        cache.get("a");
        cache.get("a");
        cache.get("c");

        let stats = cache.stats();
        assert_eq!(stats.entries, 2);
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.ttl, LONG_TTL);
        assert!((stats.hit_rate() - 2.0 / 3.0).abs() < f64::EPSILON);
    }

    proptest! {
        #[test]
        fn prop_add_then_get_returns_payload(key in ".*", payload in proptest::collection::vec(any::<u8>(), 0..256)) {
            let cache = ExpiringCache::new(LONG_TTL);
            cache.add(key.clone(), payload.clone());
            let got = cache.get(&key);
            prop_assert_eq!(got.as_deref(), Some(payload.as_slice()));
        }

        #[test]
        fn prop_second_add_supersedes_first(
            key in "[a-z/:.]{1,32}",
            first in proptest::collection::vec(any::<u8>(), 0..64),
            second in proptest::collection::vec(any::<u8>(), 0..64),
        ) {
            let cache = ExpiringCache::new(LONG_TTL);
            cache.add(key.clone(), first);
            cache.add(key.clone(), second.clone());
            let got = cache.get(&key);
            prop_assert_eq!(got.as_deref(), Some(second.as_slice()));
            prop_assert_eq!(cache.len(), 1);
        }
    }
}
