use super::{CacheEntry, CacheKey, CacheLookup, CacheStore, StoreUsage};
use crate::{HashMap, Result};
use chrono::{DateTime, Utc};
use compact_str::CompactString;
use core::time::Duration;
use ohno::IntoAppError;
use std::sync::{Mutex, MutexGuard, PoisonError};

const LOG_TARGET: &str = "     cache";

/// Keeps entries in a map for the life of the process.
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    entries: Mutex<HashMap<CompactString, CacheEntry>>,
}

impl MemoryCacheStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<CompactString, CacheEntry>> {
        // entries are replaced whole, so a panicking writer cannot leave one half-written
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CacheStore for MemoryCacheStore {
    fn load(&self, key: &CacheKey, now: DateTime<Utc>, ttl: Duration) -> CacheLookup {
        let mut entries = self.entries();
        let Some(entry) = entries.get(key.digest()) else {
            log::debug!(target: LOG_TARGET, "Cache miss for {}", key.digest());
            return CacheLookup::Miss;
        };

        if entry.key != *key.inputs() {
            return CacheLookup::Miss;
        }

        if !entry.is_fresh(now, ttl) {
            log::debug!(target: LOG_TARGET, "Cache expired for {}", key.digest());
            let _ = entries.remove(key.digest());
            return CacheLookup::Expired;
        }

        log::debug!(target: LOG_TARGET, "Cache hit for {}", key.digest());
        CacheLookup::Hit(entry.result.clone())
    }

    fn save(&self, key: &CacheKey, entry: &CacheEntry) -> Result<()> {
        let _ = self.entries().insert(key.digest().into(), entry.clone());
        Ok(())
    }

    fn clear(&self, metric: Option<&str>) -> Result<u64> {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|_, entry| metric.is_some_and(|m| entry.key.metric != m));
        Ok((before - entries.len()) as u64)
    }

    fn prune(&self, dataset_version: &str, now: DateTime<Utc>, ttl: Duration) -> Result<u64> {
        let mut entries = self.entries();
        let before = entries.len();
        entries.retain(|_, entry| entry.is_live(dataset_version, now, ttl));
        Ok((before - entries.len()) as u64)
    }

    fn usage(&self, dataset_version: &str, now: DateTime<Utc>, ttl: Duration) -> Result<StoreUsage> {
        let mut usage = StoreUsage::default();
        for entry in self.entries().values() {
            let bytes = serde_json::to_vec(entry).into_app_err("measuring a cache entry")?.len() as u64;
            usage.add(entry.is_live(dataset_version, now, ttl), bytes);
        }

        Ok(usage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{Direction, Measurement, MetricResult, Subject, Unit};
    use crate::tables::{ConstructorId, SeasonFilter};

    const TTL: Duration = Duration::from_secs(60);

    fn put(store: &MemoryCacheStore, metric: &str, timestamp: DateTime<Utc>) -> CacheKey {
        put_version(store, metric, timestamp, "v1")
    }

    fn put_version(store: &MemoryCacheStore, metric: &str, timestamp: DateTime<Utc>, version: &str) -> CacheKey {
        let subject = Subject::Constructor(ConstructorId(9));
        let key = CacheKey::new(metric, subject, SeasonFilter::Career, version);
        let entry = CacheEntry {
            timestamp,
            key: key.inputs().clone(),
            result: MetricResult::new(metric, subject, SeasonFilter::Career, Unit::Count, Direction::HigherIsBetter, Measurement::count(3, 10)),
        };
        store.save(&key, &entry).unwrap();
        key
    }

    #[test]
    fn test_round_trip() {
        let store = MemoryCacheStore::new();
        let now = Utc::now();
        let key = put(&store, "constructor_win_streak", now);

        let CacheLookup::Hit(result) = store.load(&key, now, TTL) else {
            panic!("expected a hit");
        };
        assert_eq!(result.metric, "constructor_win_streak");
        assert_eq!(result.sample_size, 10);
    }

    #[test]
    fn test_expired_entry_is_dropped() {
        let store = MemoryCacheStore::new();
        let now = Utc::now();
        let key = put(&store, "constructor_win_streak", now - chrono::TimeDelta::minutes(5));

        assert_eq!(store.load(&key, now, TTL), CacheLookup::Expired);
        assert_eq!(store.load(&key, now, TTL), CacheLookup::Miss);
        assert_eq!(store.usage("v1", now, TTL).unwrap(), StoreUsage::default());
    }

    #[test]
    fn test_clear() {
        let store = MemoryCacheStore::new();
        let now = Utc::now();
        let _ = put(&store, "constructor_win_streak", now);
        let _ = put(&store, "constructor_win_rate", now);
        let _ = put(&store, "constructor_dnf_rate", now);

        assert_eq!(store.clear(Some("constructor_win_rate")).unwrap(), 1);
        assert_eq!(store.clear(Some("constructor_win_rate")).unwrap(), 0);
        assert_eq!(store.usage("v1", now, TTL).unwrap().entries, 2);
        assert_eq!(store.clear(None).unwrap(), 2);
    }

    #[test]
    fn test_prune_drops_other_versions_and_expired_entries() {
        let store = MemoryCacheStore::new();
        let now = Utc::now();
        let live = put(&store, "constructor_win_rate", now);
        let _ = put_version(&store, "constructor_win_rate", now, "v0");
        let _ = put(&store, "constructor_dnf_rate", now - chrono::TimeDelta::minutes(5));

        let usage = store.usage("v1", now, TTL).unwrap();
        assert_eq!((usage.entries, usage.stale_entries), (1, 2));

        assert_eq!(store.prune("v1", now, TTL).unwrap(), 2);
        assert!(matches!(store.load(&live, now, TTL), CacheLookup::Hit(_)));
        assert_eq!(store.usage("v1", now, TTL).unwrap().stale_entries, 0);
    }
}
