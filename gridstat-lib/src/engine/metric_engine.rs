use super::{Comparison, ComparisonEntry, EngineResult, MetricComparison, SubjectInfo};
use crate::Result;
use crate::cache::{CacheKey, CacheStats, ComputationCache};
use crate::metrics::stats::mean;
use crate::metrics::{Metric, MetricCategory, MetricResult, Subject, SubjectType};
use crate::normalize::{ComparisonNormalizer, Scale};
use crate::registry::{MetricInfo, MetricRegistry, UnknownMetric};
use crate::tables::{SeasonFilter, TableStore};
use compact_str::{CompactString, format_compact};
use futures::future::join_all;
use ohno::{app_err, bail};
use std::sync::Arc;
use std::time::Instant;
use tokio::task::spawn_blocking;

const LOG_TARGET: &str = "    engine";

/// Prefix shared by every constructor metric name.
const CONSTRUCTOR_PREFIX: &str = "constructor_";

/// Serves metric requests against one dataset.
///
/// Requests are validated up front (metric name, subject, required tables), then served
/// from the cache or computed on the blocking pool and stored. Independent computations of
/// a bulk request run concurrently and are reported in request order.
#[derive(Debug, Clone)]
pub struct MetricEngine {
    tables: Arc<TableStore>,
    registry: Arc<MetricRegistry>,
    cache: Arc<ComputationCache>,
}

impl MetricEngine {
    #[must_use]
    pub const fn new(tables: Arc<TableStore>, registry: Arc<MetricRegistry>, cache: Arc<ComputationCache>) -> Self {
        Self { tables, registry, cache }
    }

    #[must_use]
    pub fn tables(&self) -> &TableStore {
        &self.tables
    }

    #[must_use]
    pub fn list_metrics(&self, subject_type: SubjectType, category: Option<MetricCategory>) -> Vec<MetricInfo> {
        self.registry
            .list(subject_type, category)
            .iter()
            .map(|m| MetricInfo::of(m.as_ref()))
            .collect()
    }

    pub async fn get_metric(&self, name: &str, subject: Subject, season: SeasonFilter) -> EngineResult<MetricResult> {
        match self.resolve(name, subject) {
            EngineResult::Found(metric) => self.compute(metric, subject, season).await,
            failure => failure.cast(),
        }
    }

    /// Several metrics for one subject, in request order.
    pub async fn get_many<S: AsRef<str>>(
        &self,
        names: &[S],
        subject: Subject,
        season: SeasonFilter,
    ) -> Vec<(CompactString, EngineResult<MetricResult>)> {
        join_all(names.iter().map(|name| async move {
            let name = name.as_ref();
            (CompactString::new(name), self.get_metric(name, subject, season).await)
        }))
        .await
    }

    /// Computes every metric for every subject and scores each metric across the subjects.
    ///
    /// The first request-level failure (unknown metric or subject, missing table) is
    /// returned instead of a partial comparison.
    pub async fn compare<S: AsRef<str>>(
        &self,
        names: &[S],
        subjects: &[Subject],
        season: SeasonFilter,
        scale: Scale,
    ) -> EngineResult<Comparison> {
        if names.is_empty() {
            return EngineResult::Error(Arc::new(app_err!("a comparison needs at least one metric")));
        }

        let Some(first) = subjects.first() else {
            return EngineResult::Error(Arc::new(app_err!("a comparison needs at least two subjects")));
        };

        if subjects.len() < 2 {
            return EngineResult::Error(Arc::new(app_err!("a comparison needs at least two subjects")));
        }

        if subjects.iter().any(|s| s.subject_type() != first.subject_type()) {
            return EngineResult::Error(Arc::new(app_err!("drivers and constructors cannot be compared with each other")));
        }

        let mut metrics = Vec::with_capacity(names.len());
        for name in names {
            let mut resolved = None;
            for subject in subjects {
                match self.resolve(name.as_ref(), *subject) {
                    EngineResult::Found(metric) => {
                        let _ = resolved.get_or_insert(metric);
                    }
                    failure => return failure.cast(),
                }
            }
            metrics.extend(resolved);
        }

        let pairs = metrics
            .iter()
            .flat_map(|metric| subjects.iter().map(move |subject| (Arc::clone(metric), *subject)));
        let outcomes = join_all(pairs.map(|(metric, subject)| self.compute(metric, subject, season))).await;

        let mut results = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            match outcome {
                EngineResult::Found(result) => results.push(result),
                failure => return failure.cast(),
            }
        }

        let normalizer = ComparisonNormalizer::new(scale);
        let metrics: Vec<MetricComparison> = metrics
            .iter()
            .zip(results.chunks(subjects.len()))
            .map(|(metric, results)| MetricComparison {
                metric: metric.name().into(),
                unit: metric.unit(),
                direction: metric.direction(),
                entries: results
                    .iter()
                    .cloned()
                    .zip(normalizer.normalize(results))
                    .map(|(result, score)| ComparisonEntry { result, score })
                    .collect(),
            })
            .collect();

        let overall = (0..subjects.len())
            .map(|i| {
                let scores: Vec<f64> = metrics.iter().filter_map(|m| m.entries.get(i).and_then(|e| e.score)).collect();
                mean(&scores)
            })
            .collect();

        EngineResult::Found(Comparison {
            season,
            scale,
            subjects: subjects
                .iter()
                .map(|s| SubjectInfo {
                    subject: *s,
                    name: self.subject_name(*s).unwrap_or_default(),
                })
                .collect(),
            metrics,
            overall,
        })
    }

    /// Cache counters, with entries for the loaded dataset counted apart from stale ones.
    pub fn cache_stats(&self) -> Result<CacheStats> {
        self.cache.stats(self.tables.version())
    }

    /// Removes cached results, all of them or those of one metric, and returns how many
    /// went. Stale entries of any metric are swept along the way but not counted.
    pub fn cache_clear(&self, metric: Option<&str>) -> Result<u64> {
        if let Some(name) = metric
            && let Err(e) = self.registry.get(name)
        {
            bail!("{e}");
        }

        let removed = self.cache.clear(metric)?;
        let _ = self.cache.prune(self.tables.version())?;
        Ok(removed)
    }

    /// Display name of a subject, if it is in the dataset.
    #[must_use]
    pub fn subject_name(&self, subject: Subject) -> Option<CompactString> {
        match subject {
            Subject::Driver(id) => self.tables.driver(id).map(|d| d.full_name().into()),
            Subject::Constructor(id) => self.tables.constructor(id).map(|c| c.name.clone()),
        }
    }

    /// Everything that can be checked without computing.
    fn resolve(&self, name: &str, subject: Subject) -> EngineResult<Arc<dyn Metric>> {
        let metric = match self.registry.get(name) {
            Ok(metric) => metric,
            Err(unknown) => return EngineResult::UnknownMetric(unknown),
        };

        if metric.subject_type() != subject.subject_type() {
            return EngineResult::UnknownMetric(self.wrong_subject_type(name, subject.subject_type()));
        }

        let exists = match subject {
            Subject::Driver(id) => self.tables.driver(id).is_some(),
            Subject::Constructor(id) => self.tables.constructor(id).is_some(),
        };
        if !exists {
            return EngineResult::UnknownSubject(subject);
        }

        if let Some(table) = metric.required_tables().iter().find(|t| !self.tables.is_loaded(**t)) {
            return EngineResult::TableUnavailable {
                metric: name.into(),
                table: *table,
            };
        }

        EngineResult::Found(metric)
    }

    /// A metric exists but not for this kind of subject; point at its counterpart.
    fn wrong_subject_type(&self, name: &str, subject_type: SubjectType) -> UnknownMetric {
        let counterpart: CompactString = match subject_type {
            SubjectType::Constructor => format_compact!("{CONSTRUCTOR_PREFIX}{name}"),
            SubjectType::Driver => name.strip_prefix(CONSTRUCTOR_PREFIX).unwrap_or(name).into(),
        };

        let mut suggestions: Vec<CompactString> = self
            .registry
            .get(&counterpart)
            .ok()
            .filter(|m| m.subject_type() == subject_type)
            .map(|m| m.name().into())
            .into_iter()
            .collect();

        for candidate in self.registry.suggest(name) {
            let applies = self.registry.get(&candidate).is_ok_and(|m| m.subject_type() == subject_type);
            if applies && !suggestions.contains(&candidate) {
                suggestions.push(candidate);
            }
        }

        UnknownMetric {
            name: name.into(),
            suggestions,
        }
    }

    async fn compute(&self, metric: Arc<dyn Metric>, subject: Subject, season: SeasonFilter) -> EngineResult<MetricResult> {
        let tables = Arc::clone(&self.tables);
        let cache = Arc::clone(&self.cache);

        match spawn_blocking(move || compute_cached(&tables, &cache, metric.as_ref(), subject, season)).await {
            Ok(result) => EngineResult::Found(result),
            Err(e) => EngineResult::Error(Arc::new(app_err!("metric computation did not complete: {e}"))),
        }
    }
}

fn compute_cached(tables: &TableStore, cache: &ComputationCache, metric: &dyn Metric, subject: Subject, season: SeasonFilter) -> MetricResult {
    let key = CacheKey::new(metric.name(), subject, season, tables.version());
    if let Some(result) = cache.get(&key) {
        return result;
    }

    let start = Instant::now();
    let result = metric.compute(tables, subject, season);
    log::debug!(
        target: LOG_TARGET,
        "Computed '{}' for {subject} ({season}) in {:.3}ms",
        metric.name(),
        start.elapsed().as_secs_f64() * 1000.0
    );

    if let Err(e) = cache.put(&key, &result) {
        log::warn!(target: LOG_TARGET, "Could not cache '{}' for {subject}: {e:#}", metric.name());
    }

    result
}
