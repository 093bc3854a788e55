use super::{CacheEntry, CacheKey, CacheLookup, CacheStore};
use crate::Result;
use crate::metrics::MetricResult;
use chrono::{DateTime, Utc};
use core::sync::atomic::{AtomicU64, Ordering};
use core::time::Duration;
use serde::Serialize;

const LOG_TARGET: &str = "     cache";

/// Snapshot of the cache configuration, contents, and counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub enabled: bool,

    #[serde(with = "humantime_serde")]
    pub ttl: Duration,

    pub entry_count: u64,
    pub hit_count: u64,
    pub miss_count: u64,
    pub expired_count: u64,
    pub corrupt_count: u64,
    pub total_size_bytes: u64,

    /// Entries that can no longer be served and wait to be pruned.
    pub stale_count: u64,
    pub stale_size_bytes: u64,
}

/// TTL-bounded store of computed metric results.
///
/// Expired and corrupt entries count as misses and are tallied separately as well.
/// A disabled cache misses every read and ignores every write.
#[derive(Debug)]
pub struct ComputationCache {
    store: Box<dyn CacheStore>,
    ttl: Duration,
    enabled: bool,
    hits: AtomicU64,
    misses: AtomicU64,
    expired: AtomicU64,
    corrupt: AtomicU64,
}

impl ComputationCache {
    #[must_use]
    pub fn new(store: Box<dyn CacheStore>, ttl: Duration, enabled: bool) -> Self {
        Self {
            store,
            ttl,
            enabled,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            expired: AtomicU64::new(0),
            corrupt: AtomicU64::new(0),
        }
    }

    /// A cache that never stores anything.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(Box::new(super::MemoryCacheStore::new()), Duration::ZERO, false)
    }

    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    #[must_use]
    pub fn get(&self, key: &CacheKey) -> Option<MetricResult> {
        self.get_at(key, Utc::now())
    }

    /// Reads `key` as of `now`.
    #[must_use]
    pub fn get_at(&self, key: &CacheKey, now: DateTime<Utc>) -> Option<MetricResult> {
        if !self.enabled {
            let _ = self.misses.fetch_add(1, Ordering::Relaxed);
            return None;
        }

        match self.store.load(key, now, self.ttl) {
            CacheLookup::Hit(result) => {
                let _ = self.hits.fetch_add(1, Ordering::Relaxed);
                return Some(result);
            }
            CacheLookup::Miss => {}
            CacheLookup::Expired => {
                let _ = self.expired.fetch_add(1, Ordering::Relaxed);
            }
            CacheLookup::Corrupt => {
                let _ = self.corrupt.fetch_add(1, Ordering::Relaxed);
            }
        }

        let _ = self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    pub fn put(&self, key: &CacheKey, result: &MetricResult) -> Result<()> {
        self.put_at(key, result, Utc::now())
    }

    /// Stores `result` under `key`, stamped with `now`.
    pub fn put_at(&self, key: &CacheKey, result: &MetricResult, now: DateTime<Utc>) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let entry = CacheEntry {
            timestamp: now,
            key: key.inputs().clone(),
            result: result.clone(),
        };
        self.store.save(key, &entry)
    }

    /// Removes all entries, or only those of `metric`, returning how many were removed.
    pub fn clear(&self, metric: Option<&str>) -> Result<u64> {
        let removed = self.store.clear(metric)?;
        log::info!(target: LOG_TARGET, "Cleared {removed} cache entries");
        Ok(removed)
    }

    /// Removes entries that can no longer be served for `dataset_version`: expired ones,
    /// unreadable ones, and those recorded for any other dataset version.
    pub fn prune(&self, dataset_version: &str) -> Result<u64> {
        if !self.enabled {
            return Ok(0);
        }

        let removed = self.store.prune(dataset_version, Utc::now(), self.ttl)?;
        if removed > 0 {
            log::info!(target: LOG_TARGET, "Pruned {removed} stale cache entries");
        }
        Ok(removed)
    }

    /// Counters plus the contents as seen by a dataset at `dataset_version`.
    pub fn stats(&self, dataset_version: &str) -> Result<CacheStats> {
        self.stats_at(dataset_version, Utc::now())
    }

    pub fn stats_at(&self, dataset_version: &str, now: DateTime<Utc>) -> Result<CacheStats> {
        let usage = self.store.usage(dataset_version, now, self.ttl)?;
        Ok(CacheStats {
            enabled: self.enabled,
            ttl: self.ttl,
            entry_count: usage.entries,
            hit_count: self.hits.load(Ordering::Relaxed),
            miss_count: self.misses.load(Ordering::Relaxed),
            expired_count: self.expired.load(Ordering::Relaxed),
            corrupt_count: self.corrupt.load(Ordering::Relaxed),
            total_size_bytes: usage.bytes,
            stale_count: usage.stale_entries,
            stale_size_bytes: usage.stale_bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCacheStore;
    use crate::metrics::{Direction, Measurement, Subject, Unit};
    use crate::tables::{DriverId, SeasonFilter};

    const TTL: Duration = Duration::from_secs(600);

    fn sample() -> (CacheKey, MetricResult) {
        let subject = Subject::Driver(DriverId(1));
        let season = SeasonFilter::Season(2019);
        let key = CacheKey::new("average_finish_position", subject, season, "v1");
        let result = MetricResult::new(
            "average_finish_position",
            subject,
            season,
            Unit::Position,
            Direction::LowerIsBetter,
            Measurement::float(2.35, 20),
        );
        (key, result)
    }

    #[test]
    fn test_put_then_get() {
        let cache = ComputationCache::new(Box::new(MemoryCacheStore::new()), TTL, true);
        let (key, result) = sample();

        assert!(cache.get(&key).is_none());
        cache.put(&key, &result).unwrap();
        assert_eq!(cache.get(&key), Some(result));

        let stats = cache.stats("v1").unwrap();
        assert_eq!(stats.hit_count, 1);
        assert_eq!(stats.miss_count, 1);
        assert_eq!(stats.entry_count, 1);
        assert!(stats.total_size_bytes > 0);
    }

    #[test]
    fn test_expiry_counts_as_miss() {
        let cache = ComputationCache::new(Box::new(MemoryCacheStore::new()), TTL, true);
        let (key, result) = sample();
        let written = Utc::now();
        cache.put_at(&key, &result, written).unwrap();

        assert!(cache.get_at(&key, written + chrono::TimeDelta::seconds(599)).is_some());
        assert!(cache.get_at(&key, written + chrono::TimeDelta::seconds(600)).is_none());

        let stats = cache.stats("v1").unwrap();
        assert_eq!(stats.expired_count, 1);
        assert_eq!(stats.miss_count, 1);
        assert_eq!(stats.entry_count, 0);
    }

    #[test]
    fn test_entries_of_an_old_dataset_are_stale() {
        let cache = ComputationCache::new(Box::new(MemoryCacheStore::new()), TTL, true);
        let (key, result) = sample();
        cache.put(&key, &result).unwrap();

        let stats = cache.stats("v2").unwrap();
        assert_eq!(stats.entry_count, 0);
        assert_eq!(stats.total_size_bytes, 0);
        assert_eq!(stats.stale_count, 1);
        assert!(stats.stale_size_bytes > 0);

        assert_eq!(cache.prune("v1").unwrap(), 0);
        assert_eq!(cache.prune("v2").unwrap(), 1);
        assert_eq!(cache.stats("v2").unwrap().stale_count, 0);
    }

    #[test]
    fn test_disabled_cache_never_stores() {
        let cache = ComputationCache::disabled();
        let (key, result) = sample();
        cache.put(&key, &result).unwrap();

        assert!(cache.get(&key).is_none());
        let stats = cache.stats("v1").unwrap();
        assert!(!stats.enabled);
        assert_eq!(stats.entry_count, 0);
        assert_eq!(stats.miss_count, 1);
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn test_corrupt_file_counts_as_miss() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = ComputationCache::new(Box::new(crate::cache::FileCacheStore::new(tmp.path())), TTL, true);
        let (key, result) = sample();
        std::fs::write(tmp.path().join(key.file_name()), b"\x00\x01").unwrap();

        assert!(cache.get(&key).is_none());
        cache.put(&key, &result).unwrap();
        assert_eq!(cache.get(&key), Some(result));

        let stats = cache.stats("v1").unwrap();
        assert_eq!(stats.corrupt_count, 1);
        assert_eq!(stats.miss_count, 1);
        assert_eq!(stats.hit_count, 1);
    }

    #[test]
    fn test_stats_serialize_ttl_as_humantime() {
        let cache = ComputationCache::new(Box::new(MemoryCacheStore::new()), Duration::from_secs(3600), true);
        let json = serde_json::to_value(cache.stats("v1").unwrap()).unwrap();
        assert_eq!(json["ttl"], "1h");
        assert_eq!(json["enabled"], true);
    }
}
