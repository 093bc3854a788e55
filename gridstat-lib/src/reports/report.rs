use crate::cache::CacheStats;
use crate::engine::{Comparison, EngineResult, SubjectInfo};
use crate::metrics::MetricResult;
use crate::registry::MetricInfo;
use crate::tables::SeasonFilter;
use compact_str::CompactString;

/// Everything a command can hand to a report generator.
#[derive(Debug, Clone, Copy)]
pub enum Report<'a> {
    /// Metric catalog listing.
    Catalog(&'a [MetricInfo]),

    /// Metrics for one subject, in request order.
    Results {
        subject: &'a SubjectInfo,
        season: SeasonFilter,
        outcomes: &'a [(CompactString, EngineResult<MetricResult>)],
    },

    Comparison(&'a Comparison),

    CacheStats(&'a CacheStats),

    /// Outcome of clearing the cache, optionally for one metric only.
    CacheCleared { metric: Option<&'a str>, removed: u64 },
}
