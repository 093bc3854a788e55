#![doc(hidden)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core library for gridstat
//!
//! This library consolidates all functionality for the gridstat tool, which derives
//! driver and constructor statistics from a historical motorsport dataset, caches
//! them, and compares subjects on a normalized scale.
//!
//! # Module Organization
//!
//! - [`tables`]: Dataset loading, integrity checks, and indexed lookups
//! - [`metrics`]: The metric contract and the built-in metric catalog
//! - [`registry`]: Name-based metric lookup
//! - [`cache`]: TTL-bounded storage of computed results
//! - [`normalize`]: Cross-subject rescaling for comparisons
//! - [`engine`]: Orchestration of lookups, caching, and computation
//! - [`commands`]: Command-line interface
//! - [`reports`]: Console and JSON rendering

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

pub type HashMap<K, V> = std::collections::HashMap<K, V, rustc_hash::FxBuildHasher>;
pub type HashSet<T> = std::collections::HashSet<T, rustc_hash::FxBuildHasher>;

#[must_use]
pub fn hash_map_with_capacity<K, V>(capacity: usize) -> HashMap<K, V> {
    HashMap::with_capacity_and_hasher(capacity, rustc_hash::FxBuildHasher)
}

#[cfg(any(debug_assertions, test))]
pub mod cache;
#[cfg(not(any(debug_assertions, test)))]
mod cache;

#[cfg(any(debug_assertions, test))]
pub mod commands;
#[cfg(not(any(debug_assertions, test)))]
mod commands;

#[cfg(any(debug_assertions, test))]
pub mod engine;
#[cfg(not(any(debug_assertions, test)))]
mod engine;

#[cfg(any(debug_assertions, test))]
pub mod metrics;
#[cfg(not(any(debug_assertions, test)))]
mod metrics;

#[cfg(any(debug_assertions, test))]
pub mod normalize;
#[cfg(not(any(debug_assertions, test)))]
mod normalize;

#[cfg(any(debug_assertions, test))]
pub mod registry;
#[cfg(not(any(debug_assertions, test)))]
mod registry;

#[cfg(any(debug_assertions, test))]
pub mod reports;
#[cfg(not(any(debug_assertions, test)))]
mod reports;

#[cfg(any(debug_assertions, test))]
pub mod tables;
#[cfg(not(any(debug_assertions, test)))]
mod tables;

pub use crate::commands::{Host, run};
