use super::{CacheEntry, CacheKey, CacheLookup, CacheStore, StoreUsage};
use crate::Result;
use chrono::{DateTime, Utc};
use core::sync::atomic::{AtomicU64, Ordering};
use core::time::Duration;
use ohno::IntoAppError;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

const LOG_TARGET: &str = "     cache";

/// Distinguishes temporary files written concurrently by this process.
static WRITE_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// One pretty-printed (debug builds) or compact JSON file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileCacheStore {
    dir: PathBuf,
}

impl FileCacheStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read_entry(path: &Path) -> Result<CacheEntry> {
        let file = File::open(path).into_app_err_with(|| format!("opening cache file '{}'", path.display()))?;
        serde_json::from_reader(BufReader::new(file)).into_app_err_with(|| format!("decoding cache file '{}'", path.display()))
    }

    fn remove(path: &Path) {
        if let Err(e) = fs::remove_file(path) {
            log::debug!(target: LOG_TARGET, "Could not remove '{}': {e:#}", path.display());
        }
    }

    /// Paths of every entry file, skipping in-flight temporary files.
    fn entry_paths(&self) -> Result<Vec<PathBuf>> {
        let dir = match fs::read_dir(&self.dir) {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e).into_app_err_with(|| format!("reading cache directory '{}'", self.dir.display())),
        };

        let mut paths = Vec::new();
        for item in dir {
            let path = item.into_app_err_with(|| format!("reading cache directory '{}'", self.dir.display()))?.path();
            let is_entry = path.extension().is_some_and(|ext| ext == "json")
                && path.file_name().and_then(|n| n.to_str()).is_some_and(|n| !n.starts_with('.'));
            if is_entry {
                paths.push(path);
            }
        }

        Ok(paths)
    }

    /// Every entry file with its size and whether it is live for `dataset_version`.
    fn survey(&self, dataset_version: &str, now: DateTime<Utc>, ttl: Duration) -> Result<Vec<(PathBuf, bool, u64)>> {
        let mut survey = Vec::new();
        for path in self.entry_paths()? {
            let metadata = match fs::metadata(&path) {
                Ok(metadata) => metadata,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(e).into_app_err_with(|| format!("reading metadata of '{}'", path.display())),
            };

            let live = Self::read_entry(&path).is_ok_and(|entry| entry.is_live(dataset_version, now, ttl));
            survey.push((path, live, metadata.len()));
        }

        Ok(survey)
    }
}

impl CacheStore for FileCacheStore {
    fn load(&self, key: &CacheKey, now: DateTime<Utc>, ttl: Duration) -> CacheLookup {
        let filename = key.file_name();
        let path = self.dir.join(&filename);

        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) => {
                log::debug!(target: LOG_TARGET, "Cache miss for {filename}: {e:#}");
                return CacheLookup::Miss;
            }
        };

        let entry: CacheEntry = match serde_json::from_reader(BufReader::new(file)) {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!(target: LOG_TARGET, "Discarding corrupt cache entry {filename}: {e:#}");
                Self::remove(&path);
                return CacheLookup::Corrupt;
            }
        };

        if entry.key != *key.inputs() {
            log::debug!(target: LOG_TARGET, "Cache miss for {filename}: entry was recorded for {:?}", entry.key);
            return CacheLookup::Miss;
        }

        if !entry.is_fresh(now, ttl) {
            log::debug!(target: LOG_TARGET, "Cache expired for {filename} (written {})", entry.timestamp);
            Self::remove(&path);
            return CacheLookup::Expired;
        }

        log::debug!(target: LOG_TARGET, "Cache hit for {filename}");
        CacheLookup::Hit(entry.result)
    }

    fn save(&self, key: &CacheKey, entry: &CacheEntry) -> Result<()> {
        fs::create_dir_all(&self.dir).into_app_err_with(|| format!("creating directory '{}'", self.dir.display()))?;

        let filename = key.file_name();
        let path = self.dir.join(&filename);
        let sequence = WRITE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        let temp = self.dir.join(format!(".{filename}.{}.{sequence}.tmp", std::process::id()));

        let file = File::create(&temp).into_app_err_with(|| format!("creating cache file '{}'", temp.display()))?;
        let mut writer = BufWriter::new(file);

        #[cfg(debug_assertions)]
        let result = serde_json::to_writer_pretty(&mut writer, entry);
        #[cfg(not(debug_assertions))]
        let result = serde_json::to_writer(&mut writer, entry);

        let written = result
            .into_app_err_with(|| format!("writing cache file '{}'", temp.display()))
            .and_then(|()| writer.flush().into_app_err_with(|| format!("flushing cache file '{}'", temp.display())));
        drop(writer);

        if let Err(e) = written {
            Self::remove(&temp);
            return Err(e);
        }

        fs::rename(&temp, &path).into_app_err_with(|| format!("moving cache file into place at '{}'", path.display()))
    }

    fn clear(&self, metric: Option<&str>) -> Result<u64> {
        let mut removed = 0;
        for path in self.entry_paths()? {
            if let Some(metric) = metric {
                match Self::read_entry(&path) {
                    Ok(entry) if entry.key.metric == metric => {}
                    Ok(_) => continue,
                    Err(e) => {
                        log::debug!(target: LOG_TARGET, "Skipping unreadable entry while clearing '{metric}': {e:#}");
                        continue;
                    }
                }
            }

            fs::remove_file(&path).into_app_err_with(|| format!("removing cache file '{}'", path.display()))?;
            removed += 1;
        }

        log::debug!(target: LOG_TARGET, "Removed {removed} cache entries from '{}'", self.dir.display());
        Ok(removed)
    }

    fn prune(&self, dataset_version: &str, now: DateTime<Utc>, ttl: Duration) -> Result<u64> {
        let mut removed = 0;
        for (path, live, _) in self.survey(dataset_version, now, ttl)? {
            if live {
                continue;
            }

            match fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e).into_app_err_with(|| format!("removing cache file '{}'", path.display())),
            }
        }

        log::debug!(target: LOG_TARGET, "Pruned {removed} stale cache entries from '{}'", self.dir.display());
        Ok(removed)
    }

    fn usage(&self, dataset_version: &str, now: DateTime<Utc>, ttl: Duration) -> Result<StoreUsage> {
        let mut usage = StoreUsage::default();
        for (_, live, bytes) in self.survey(dataset_version, now, ttl)? {
            usage.add(live, bytes);
        }

        Ok(usage)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::metrics::{Direction, Measurement, MetricResult, Subject, Unit};
    use crate::tables::{DriverId, SeasonFilter};

    const TTL: Duration = Duration::from_secs(3600);

    fn key(metric: &str) -> CacheKey {
        CacheKey::new(metric, Subject::Driver(DriverId(44)), SeasonFilter::Season(2020), "v1")
    }

    fn entry(key: &CacheKey, timestamp: DateTime<Utc>) -> CacheEntry {
        let inputs = key.inputs();
        CacheEntry {
            timestamp,
            key: inputs.clone(),
            result: MetricResult::new(
                &inputs.metric,
                inputs.subject,
                inputs.season,
                Unit::Fraction,
                Direction::HigherIsBetter,
                Measurement::float(0.8125, 16).with("count", 13_u64),
            ),
        }
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn save_and_load() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileCacheStore::new(tmp.path());
        let now = Utc::now();
        let key = key("podium_rate");
        let entry = entry(&key, now);

        store.save(&key, &entry).unwrap();
        assert_eq!(store.load(&key, now, TTL), CacheLookup::Hit(entry.result));
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn missing_entry_is_miss() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileCacheStore::new(tmp.path().join("not-created-yet"));
        assert_eq!(store.load(&key("podium_rate"), Utc::now(), TTL), CacheLookup::Miss);
        assert_eq!(store.usage("v1", Utc::now(), TTL).unwrap(), StoreUsage::default());
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn expired_entry_is_removed() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileCacheStore::new(tmp.path());
        let now = Utc::now();
        let key = key("podium_rate");

        store.save(&key, &entry(&key, now - chrono::TimeDelta::hours(2))).unwrap();
        assert_eq!(store.load(&key, now, TTL), CacheLookup::Expired);
        assert!(!tmp.path().join(key.file_name()).exists());
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn corrupt_entry_is_removed() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileCacheStore::new(tmp.path());
        let key = key("podium_rate");
        let path = tmp.path().join(key.file_name());
        fs::write(&path, "{ not json").unwrap();

        assert_eq!(store.load(&key, Utc::now(), TTL), CacheLookup::Corrupt);
        assert!(!path.exists());
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn mismatched_inputs_are_a_miss() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileCacheStore::new(tmp.path());
        let now = Utc::now();
        let requested = key("podium_rate");
        let other = key("win_rate");

        // plant another key's entry under the requested file name
        let path = tmp.path().join(requested.file_name());
        fs::write(&path, serde_json::to_string(&entry(&other, now)).unwrap()).unwrap();

        assert_eq!(store.load(&requested, now, TTL), CacheLookup::Miss);
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn clear_by_metric() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileCacheStore::new(tmp.path());
        let now = Utc::now();

        for metric in ["podium_rate", "win_rate", "dnf_rate"] {
            let key = key(metric);
            store.save(&key, &entry(&key, now)).unwrap();
        }

        let usage = store.usage("v1", now, TTL).unwrap();
        assert_eq!(usage.entries, 3);
        assert!(usage.bytes > 0);

        assert_eq!(store.clear(Some("win_rate")).unwrap(), 1);
        assert_eq!(store.load(&key("win_rate"), now, TTL), CacheLookup::Miss);
        assert!(matches!(store.load(&key("dnf_rate"), now, TTL), CacheLookup::Hit(_)));

        assert_eq!(store.clear(None).unwrap(), 2);
        assert_eq!(store.usage("v1", now, TTL).unwrap().entries, 0);
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn stale_entries_are_reported_apart_and_pruned() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileCacheStore::new(tmp.path());
        let now = Utc::now();

        let current = key("podium_rate");
        store.save(&current, &entry(&current, now)).unwrap();

        let old_version = CacheKey::new("podium_rate", Subject::Driver(DriverId(44)), SeasonFilter::Season(2020), "v0");
        store.save(&old_version, &entry(&old_version, now)).unwrap();

        let expired = key("win_rate");
        store.save(&expired, &entry(&expired, now - chrono::TimeDelta::hours(2))).unwrap();

        fs::write(tmp.path().join(key("dnf_rate").file_name()), "{ not json").unwrap();

        let usage = store.usage("v1", now, TTL).unwrap();
        assert_eq!(usage.entries, 1);
        assert_eq!(usage.stale_entries, 3);
        assert!(usage.stale_bytes > 0);

        assert_eq!(store.prune("v1", now, TTL).unwrap(), 3);
        assert!(matches!(store.load(&current, now, TTL), CacheLookup::Hit(_)));

        let usage = store.usage("v1", now, TTL).unwrap();
        assert_eq!(usage.entries, 1);
        assert_eq!(usage.stale_entries, 0);
    }

    #[test]
    #[cfg_attr(miri, ignore = "Miri cannot call GetTempPathW")]
    fn save_leaves_no_temporary_files() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileCacheStore::new(tmp.path());
        let key = key("podium_rate");
        store.save(&key, &entry(&key, Utc::now())).unwrap();
        store.save(&key, &entry(&key, Utc::now())).unwrap();

        let names: Vec<_> = fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, [key.file_name()]);
    }
}
