use super::{CacheKey, CacheKeyInputs};
use crate::Result;
use crate::metrics::MetricResult;
use chrono::{DateTime, Utc};
use core::time::Duration;
use serde::{Deserialize, Serialize};

/// What is persisted for one cache key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub timestamp: DateTime<Utc>,
    pub key: CacheKeyInputs,
    pub result: MetricResult,
}

impl CacheEntry {
    /// Whether the entry is still usable at `now`.
    ///
    /// Entries stamped in the future (clock skew) are fresh.
    #[must_use]
    pub fn is_fresh(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        let age = now.signed_duration_since(self.timestamp);
        if age.num_milliseconds() < 0 {
            return true;
        }

        age.to_std().unwrap_or(Duration::MAX) < ttl
    }

    /// Whether the entry can still be served for a dataset at `dataset_version`.
    #[must_use]
    pub fn is_live(&self, dataset_version: &str, now: DateTime<Utc>, ttl: Duration) -> bool {
        self.key.dataset_version == dataset_version && self.is_fresh(now, ttl)
    }
}

/// Outcome of reading a key from a backend.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup {
    Hit(MetricResult),

    /// No entry, or one recorded for different key inputs.
    Miss,

    /// An entry existed but had reached the TTL; it has been discarded.
    Expired,

    /// An entry existed but could not be decoded; it has been discarded.
    Corrupt,
}

/// Space used by a backend.
///
/// Live entries can still be served. Stale ones are expired, recorded for another dataset
/// version, or unreadable; they are never read again and only wait to be pruned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreUsage {
    pub entries: u64,
    pub bytes: u64,
    pub stale_entries: u64,
    pub stale_bytes: u64,
}

impl StoreUsage {
    pub(crate) const fn add(&mut self, live: bool, bytes: u64) {
        if live {
            self.entries += 1;
            self.bytes += bytes;
        } else {
            self.stale_entries += 1;
            self.stale_bytes += bytes;
        }
    }
}

/// Storage behind the computation cache.
pub trait CacheStore: Send + Sync + core::fmt::Debug {
    fn load(&self, key: &CacheKey, now: DateTime<Utc>, ttl: Duration) -> CacheLookup;

    /// Writes an entry, replacing whatever the key held.
    fn save(&self, key: &CacheKey, entry: &CacheEntry) -> Result<()>;

    /// Removes every entry, or only those of one metric, and returns how many went.
    fn clear(&self, metric: Option<&str>) -> Result<u64>;

    /// Removes every entry that is not live for `dataset_version`, and returns how many went.
    fn prune(&self, dataset_version: &str, now: DateTime<Utc>, ttl: Duration) -> Result<u64>;

    fn usage(&self, dataset_version: &str, now: DateTime<Utc>, ttl: Duration) -> Result<StoreUsage>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{Direction, Measurement, Subject, Unit};
    use crate::tables::{DriverId, SeasonFilter};

    fn entry(timestamp: DateTime<Utc>) -> CacheEntry {
        let key = CacheKey::new("win_rate", Subject::Driver(DriverId(1)), SeasonFilter::Career, "v1");
        let result = MetricResult::new(
            "win_rate",
            Subject::Driver(DriverId(1)),
            SeasonFilter::Career,
            Unit::Fraction,
            Direction::HigherIsBetter,
            Measurement::float(0.25, 8),
        );

        CacheEntry {
            timestamp,
            key: key.inputs().clone(),
            result,
        }
    }

    #[test]
    fn test_fresh_within_ttl() {
        let now = Utc::now();
        let e = entry(now - chrono::TimeDelta::seconds(30));
        assert!(e.is_fresh(now, Duration::from_secs(60)));
    }

    #[test]
    fn test_expired_at_ttl() {
        let now = Utc::now();
        let e = entry(now - chrono::TimeDelta::seconds(60));
        assert!(!e.is_fresh(now, Duration::from_secs(60)));
        assert!(!e.is_fresh(now, Duration::from_secs(59)));
    }

    #[test]
    fn test_live_needs_current_version() {
        let now = Utc::now();
        let e = entry(now);
        assert!(e.is_live("v1", now, Duration::from_secs(60)));
        assert!(!e.is_live("v2", now, Duration::from_secs(60)));
        assert!(!e.is_live("v1", now + chrono::TimeDelta::minutes(2), Duration::from_secs(60)));
    }

    #[test]
    fn test_future_timestamp_is_fresh() {
        let now = Utc::now();
        let e = entry(now + chrono::TimeDelta::hours(2));
        assert!(e.is_fresh(now, Duration::from_secs(1)));
    }
}
