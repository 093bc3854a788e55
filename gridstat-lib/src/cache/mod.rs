//! TTL-bounded storage of computed results
//!
//! Results are content addressed: a [`CacheKey`] is the SHA-256 digest of every input
//! that affects a result, including the dataset version, so a new dataset never serves
//! stale values. [`ComputationCache`] layers TTL handling, enablement, and hit/miss
//! counters over a [`CacheStore`] backend, either [`FileCacheStore`] (one JSON file per
//! key) or [`MemoryCacheStore`].

mod cache_key;
mod cache_store;
mod computation_cache;
mod file_store;
mod memory_store;

pub use cache_key::{CacheKey, CacheKeyInputs};
pub use cache_store::{CacheEntry, CacheLookup, CacheStore, StoreUsage};
pub use computation_cache::{CacheStats, ComputationCache};
pub use file_store::FileCacheStore;
pub use memory_store::MemoryCacheStore;
