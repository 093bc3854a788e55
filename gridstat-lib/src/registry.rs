//! Name-based metric lookup
//!
//! The registry maps metric names to trait objects. Built-in metrics are registered from
//! their static definitions; callers may register their own implementations, replacing any
//! metric of the same name.

use crate::Result;
use crate::metrics::{Direction, Metric, MetricCategory, SubjectType, Unit, builtin_metrics};
use crate::tables::TableId;
use compact_str::CompactString;
use core::fmt::{Display, Formatter};
use ohno::bail;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use strsim::normalized_damerau_levenshtein;

const LOG_TARGET: &str = "   metrics";

// Suggestion matching parameters
const MAX_NAME_SUGGESTIONS: usize = 3;
const MIN_SUGGESTION_SCORE: f64 = 0.7;

/// A metric name that is not registered, with the closest registered names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnknownMetric {
    pub name: CompactString,
    pub suggestions: Vec<CompactString>,
}

impl Display for UnknownMetric {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "unknown metric '{}'", self.name)?;
        if !self.suggestions.is_empty() {
            write!(f, " (did you mean {}?)", self.suggestions.join(", "))?;
        }
        Ok(())
    }
}

impl core::error::Error for UnknownMetric {}

/// Catalog entry describing a metric without computing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricInfo {
    pub name: CompactString,
    pub description: CompactString,
    pub category: MetricCategory,
    pub subject_type: SubjectType,
    pub unit: Unit,
    pub direction: Direction,
    pub required_tables: Vec<TableId>,
}

impl MetricInfo {
    #[must_use]
    pub fn of(metric: &dyn Metric) -> Self {
        Self {
            name: metric.name().into(),
            description: metric.description().into(),
            category: metric.category(),
            subject_type: metric.subject_type(),
            unit: metric.unit(),
            direction: metric.direction(),
            required_tables: metric.required_tables().to_vec(),
        }
    }
}

#[derive(Debug, Default)]
pub struct MetricRegistry {
    metrics: BTreeMap<CompactString, Arc<dyn Metric>>,
}

impl MetricRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every built-in metric.
    #[must_use]
    pub fn with_builtin_metrics() -> Self {
        let mut registry = Self::new();
        for def in builtin_metrics() {
            if let Err(e) = registry.register(Arc::new(*def)) {
                log::error!(target: LOG_TARGET, "Skipping built-in metric: {e:#}");
            }
        }

        log::info!(
            target: LOG_TARGET,
            "Registered {} metrics ({} driver, {} constructor)",
            registry.len(),
            registry.count(SubjectType::Driver),
            registry.count(SubjectType::Constructor)
        );

        registry
    }

    /// Adds a metric, replacing and returning any metric already registered under its name.
    ///
    /// # Errors
    ///
    /// Names must be non-empty and free of whitespace and control characters, since they
    /// are part of the canonical cache key encoding.
    pub fn register(&mut self, metric: Arc<dyn Metric>) -> Result<Option<Arc<dyn Metric>>> {
        let name = metric.name();
        if name.is_empty() || name.chars().any(|c| c.is_control() || c.is_whitespace()) {
            bail!("invalid metric name {name:?}: names must be non-empty and free of whitespace and control characters");
        }

        let replaced = self.metrics.insert(name.into(), metric);
        if let Some(old) = &replaced {
            log::debug!(target: LOG_TARGET, "Replaced metric '{}'", old.name());
        }
        Ok(replaced)
    }

    /// Looks up a metric by name.
    pub fn get(&self, name: &str) -> Result<Arc<dyn Metric>, UnknownMetric> {
        self.metrics.get(name).cloned().ok_or_else(|| UnknownMetric {
            name: name.into(),
            suggestions: self.suggest(name),
        })
    }

    /// Metrics for a subject type, optionally limited to one category, ordered by
    /// category and then by name.
    #[must_use]
    pub fn list(&self, subject_type: SubjectType, category: Option<MetricCategory>) -> Vec<Arc<dyn Metric>> {
        let mut metrics: Vec<_> = self
            .metrics
            .values()
            .filter(|m| m.subject_type() == subject_type)
            .filter(|m| category.is_none_or(|c| m.category() == c))
            .cloned()
            .collect();

        metrics.sort_by(|a, b| a.category().cmp(&b.category()).then_with(|| a.name().cmp(b.name())));
        metrics
    }

    /// Registered names closest to `name`, best match first.
    #[must_use]
    pub fn suggest(&self, name: &str) -> Vec<CompactString> {
        let requested = name.to_ascii_lowercase();
        let mut scored: Vec<(f64, &CompactString)> = self
            .metrics
            .keys()
            .map(|candidate| (normalized_damerau_levenshtein(&requested, candidate), candidate))
            .filter(|(score, _)| *score >= MIN_SUGGESTION_SCORE)
            .collect();

        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
        scored.into_iter().take(MAX_NAME_SUGGESTIONS).map(|(_, n)| n.clone()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    fn count(&self, subject_type: SubjectType) -> usize {
        self.metrics.values().filter(|m| m.subject_type() == subject_type).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{Measurement, MetricResult, Subject};
    use crate::tables::{SeasonFilter, TableStore};

    #[derive(Debug)]
    struct Fixed(&'static str);

    impl Metric for Fixed {
        fn name(&self) -> &str {
            self.0
        }

        fn description(&self) -> &str {
            "Always seven"
        }

        fn category(&self) -> MetricCategory {
            MetricCategory::Race
        }

        fn subject_type(&self) -> SubjectType {
            SubjectType::Driver
        }

        fn unit(&self) -> Unit {
            Unit::Count
        }

        fn direction(&self) -> Direction {
            Direction::HigherIsBetter
        }

        fn required_tables(&self) -> &[TableId] {
            &[TableId::Results]
        }

        fn compute(&self, _tables: &TableStore, subject: Subject, season: SeasonFilter) -> MetricResult {
            MetricResult::new(self.0, subject, season, Unit::Count, Direction::HigherIsBetter, Measurement::count(7, 1))
        }
    }

    #[test]
    fn test_builtin_catalog() {
        let registry = MetricRegistry::with_builtin_metrics();
        assert_eq!(registry.len(), 72);
        assert_eq!(registry.list(SubjectType::Driver, None).len(), 23);
        assert_eq!(registry.list(SubjectType::Constructor, None).len(), 49);
        assert!(registry.get("podium_rate").is_ok());
        assert!(registry.get("constructor_pit_stop_efficiency").is_ok());
    }

    #[test]
    fn test_list_is_ordered_by_category_then_name() {
        let registry = MetricRegistry::with_builtin_metrics();
        let listed = registry.list(SubjectType::Constructor, None);
        let keys: Vec<_> = listed.iter().map(|m| (m.category(), m.name().to_string())).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }

    #[test]
    fn test_list_by_category() {
        let registry = MetricRegistry::with_builtin_metrics();
        let reliability = registry.list(SubjectType::Driver, Some(MetricCategory::Reliability));
        let names: Vec<_> = reliability.iter().map(|m| m.name()).collect();
        assert_eq!(names, ["dnf_rate", "finish_rate", "mechanical_failure_rate"]);

        assert!(registry.list(SubjectType::Driver, Some(MetricCategory::PitStops)).is_empty());
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = MetricRegistry::with_builtin_metrics();
        let before = registry.len();

        let old = registry.register(Arc::new(Fixed("podium_rate"))).unwrap();
        assert!(old.is_some());
        assert_eq!(registry.len(), before);
        assert_eq!(registry.get("podium_rate").unwrap().description(), "Always seven");

        assert!(registry.register(Arc::new(Fixed("lucky_number"))).unwrap().is_none());
        assert_eq!(registry.len(), before + 1);
    }

    #[test]
    fn test_register_rejects_names_that_cannot_be_keyed() {
        let mut registry = MetricRegistry::new();
        for name in ["", "win\x1frate", "win rate", "win_rate\n"] {
            let err = registry.register(Arc::new(Fixed(name))).unwrap_err();
            assert!(err.to_string().contains("invalid metric name"), "{err}");
        }
        assert!(registry.is_empty());

        for def in builtin_metrics() {
            assert!(registry.register(Arc::new(*def)).is_ok(), "{}", def.name());
        }
    }

    #[test]
    fn test_unknown_metric_suggests_close_names() {
        let registry = MetricRegistry::with_builtin_metrics();
        let err = registry.get("podium_rat").unwrap_err();
        assert_eq!(err.name, "podium_rat");
        assert_eq!(err.suggestions.first().map(CompactString::as_str), Some("podium_rate"));
        assert!(err.suggestions.len() <= MAX_NAME_SUGGESTIONS);
        assert!(err.to_string().contains("did you mean podium_rate"));
    }

    #[test]
    fn test_unknown_metric_without_suggestions() {
        let registry = MetricRegistry::with_builtin_metrics();
        let err = registry.get("zzzzzzzzzzzz").unwrap_err();
        assert!(err.suggestions.is_empty());
        assert_eq!(err.to_string(), "unknown metric 'zzzzzzzzzzzz'");
    }

    #[test]
    fn test_metric_info() {
        let registry = MetricRegistry::with_builtin_metrics();
        let info = MetricInfo::of(registry.get("dnf_rate").unwrap().as_ref());
        assert_eq!(info.category, MetricCategory::Reliability);
        assert_eq!(info.unit, Unit::Fraction);
        assert_eq!(info.direction, Direction::LowerIsBetter);
        assert_eq!(info.subject_type, SubjectType::Driver);
    }
}
