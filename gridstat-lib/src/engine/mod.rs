//! Orchestration of lookups, caching, and computation
//!
//! [`MetricEngine`] is the single entry point for the operations the command-line front
//! end exposes: listing the catalog, computing a metric, comparing subjects, and
//! inspecting or clearing the cache.

mod comparison;
mod engine_result;
mod metric_engine;

pub use comparison::{Comparison, ComparisonEntry, MetricComparison, SubjectInfo};
pub use engine_result::EngineResult;
pub use metric_engine::MetricEngine;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{ComputationCache, MemoryCacheStore};
    use crate::metrics::{MetricCategory, MetricValue, Subject, SubjectType};
    use crate::normalize::Scale;
    use crate::registry::MetricRegistry;
    use crate::tables::{ConstructorId, DriverId, SeasonFilter, TableId, TableStore, TableStoreBuilder};
    use core::time::Duration;
    use std::sync::Arc;

    const ALPHA: Subject = Subject::Driver(DriverId(1));
    const BRAVO: Subject = Subject::Driver(DriverId(2));
    const S2021: SeasonFilter = SeasonFilter::Season(2021);

    /// One season, two drivers in two teams, one DNF each.
    fn store(version: &str) -> TableStore {
        TableStoreBuilder::new(version)
            .race(1, 2021, 1)
            .race(2, 2021, 2)
            .race(3, 2021, 3)
            .race(4, 2021, 4)
            .driver(1, "ALP", "Alpha")
            .driver(2, "BRA", "Bravo")
            .constructor(1, "Red")
            .constructor(2, "Blue")
            .result(1, 1, 1, Some(1), Some(1), 25.0, 1)
            .result(1, 2, 2, Some(2), Some(4), 12.0, 1)
            .result(2, 1, 1, Some(1), Some(1), 25.0, 1)
            .result(2, 2, 2, Some(2), Some(2), 18.0, 1)
            .result(3, 1, 1, Some(2), None, 0.0, 5)
            .result(3, 2, 2, Some(1), Some(1), 25.0, 1)
            .result(4, 1, 1, Some(1), Some(1), 25.0, 1)
            .result(4, 2, 2, Some(2), None, 0.0, 3)
            .build()
    }

    /// One season of five races for two drivers of two constructors, one DNF each.
    fn five_race_season() -> MetricEngine {
        let tables = TableStoreBuilder::new("v1")
            .race(1, 2021, 1)
            .race(2, 2021, 2)
            .race(3, 2021, 3)
            .race(4, 2021, 4)
            .race(5, 2021, 5)
            .driver(1, "ALP", "Alpha")
            .driver(2, "BRA", "Bravo")
            .constructor(1, "Red")
            .constructor(2, "Blue")
            .result(1, 1, 1, Some(1), Some(1), 25.0, 1)
            .result(1, 2, 2, Some(2), Some(2), 18.0, 1)
            .result(2, 1, 1, Some(1), Some(4), 12.0, 1)
            .result(2, 2, 2, Some(2), Some(1), 25.0, 1)
            .result(3, 1, 1, Some(2), None, 0.0, 5)
            .result(3, 2, 2, Some(1), Some(2), 18.0, 1)
            .result(4, 1, 1, Some(1), Some(3), 15.0, 1)
            .result(4, 2, 2, Some(2), None, 0.0, 3)
            .result(5, 1, 1, Some(2), Some(5), 10.0, 1)
            .result(5, 2, 2, Some(1), Some(4), 12.0, 1)
            .build();

        MetricEngine::new(Arc::new(tables), Arc::new(MetricRegistry::with_builtin_metrics()), cache())
    }

    fn cache() -> Arc<ComputationCache> {
        Arc::new(ComputationCache::new(Box::new(MemoryCacheStore::new()), Duration::from_secs(3600), true))
    }

    fn engine_with(version: &str, cache: Arc<ComputationCache>) -> MetricEngine {
        MetricEngine::new(Arc::new(store(version)), Arc::new(MetricRegistry::with_builtin_metrics()), cache)
    }

    fn engine() -> MetricEngine {
        engine_with("v1", cache())
    }

    fn value(result: &EngineResult<crate::metrics::MetricResult>) -> f64 {
        result.as_ref().and_then(crate::metrics::MetricResult::as_f64).unwrap()
    }

    #[tokio::test]
    async fn test_podium_rate_divides_by_classified_finishes() {
        let engine = engine();
        let result = engine.get_metric("podium_rate", BRAVO, S2021).await;
        assert!((value(&result) - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(result.as_ref().unwrap().sample_size, 3);
    }

    #[tokio::test]
    async fn test_dnf_rate_divides_by_all_entries() {
        let engine = engine();
        let result = engine.get_metric("dnf_rate", BRAVO, S2021).await;
        assert!((value(&result) - 0.25).abs() < 1e-9);
        assert_eq!(result.as_ref().unwrap().sample_size, 4);
    }

    #[tokio::test]
    async fn test_second_request_is_served_from_cache() {
        let engine = engine();
        let first = engine.get_metric("win_rate", ALPHA, S2021).await.into_result().unwrap();
        let second = engine.get_metric("win_rate", ALPHA, S2021).await.into_result().unwrap();
        assert_eq!(first, second);

        let stats = engine.cache_stats().unwrap();
        assert_eq!(stats.miss_count, 1);
        assert_eq!(stats.hit_count, 1);
        assert_eq!(stats.entry_count, 1);
    }

    #[tokio::test]
    async fn test_new_dataset_version_misses() {
        let shared = cache();
        let _ = engine_with("v1", Arc::clone(&shared)).get_metric("win_rate", ALPHA, S2021).await;
        let current = engine_with("v2", Arc::clone(&shared));
        let _ = current.get_metric("win_rate", ALPHA, S2021).await;
        let _ = current.get_metric("dnf_rate", ALPHA, S2021).await;

        // the v1 entry can never be read again
        let stats = current.cache_stats().unwrap();
        assert_eq!(stats.miss_count, 3);
        assert_eq!(stats.entry_count, 2);
        assert_eq!(stats.stale_count, 1);

        assert_eq!(current.cache_clear(Some("dnf_rate")).unwrap(), 1);
        let stats = current.cache_stats().unwrap();
        assert_eq!(stats.entry_count, 1);
        assert_eq!(stats.stale_count, 0);
    }

    #[tokio::test]
    async fn test_computation_is_deterministic() {
        let tables = Arc::new(store("v1"));
        let registry = Arc::new(MetricRegistry::with_builtin_metrics());
        let engine = MetricEngine::new(tables, registry, Arc::new(ComputationCache::disabled()));

        for info in engine.list_metrics(SubjectType::Driver, None) {
            let a = engine.get_metric(&info.name, ALPHA, SeasonFilter::Career).await;
            let b = engine.get_metric(&info.name, ALPHA, SeasonFilter::Career).await;
            match (a, b) {
                (EngineResult::Found(a), EngineResult::Found(b)) => assert_eq!(a, b),
                (EngineResult::TableUnavailable { .. }, EngineResult::TableUnavailable { .. }) => {}
                (a, b) => panic!("unexpected outcomes for {}: {a} / {b}", info.name),
            }
        }
    }

    #[tokio::test]
    async fn test_rates_stay_in_unit_interval() {
        let engine = engine();
        for subject_type in [SubjectType::Driver, SubjectType::Constructor] {
            let subject = Subject::new(subject_type, 2);
            for info in engine.list_metrics(subject_type, None) {
                let EngineResult::Found(result) = engine.get_metric(&info.name, subject, S2021).await else {
                    continue;
                };

                if result.sample_size == 0 {
                    assert!(matches!(result.value, MetricValue::InsufficientData(_)), "{}", info.name);
                }
                if info.unit == crate::metrics::Unit::Fraction
                    && let Some(v) = result.as_f64()
                {
                    assert!((0.0..=1.0).contains(&v), "{} = {v}", info.name);
                }
            }
        }
    }

    #[tokio::test]
    async fn test_unknown_metric() {
        let engine = engine();
        let result = engine.get_metric("podium_rat", ALPHA, S2021).await;
        let EngineResult::UnknownMetric(unknown) = &result else {
            panic!("expected an unknown metric, got {result}");
        };
        assert_eq!(unknown.suggestions.first().map(compact_str::CompactString::as_str), Some("podium_rate"));
    }

    #[tokio::test]
    async fn test_metric_for_other_subject_type() {
        let engine = engine();
        let result = engine
            .get_metric("podium_rate", Subject::Constructor(ConstructorId(1)), S2021)
            .await;
        let EngineResult::UnknownMetric(unknown) = &result else {
            panic!("expected an unknown metric, got {result}");
        };
        assert_eq!(unknown.suggestions.first().map(compact_str::CompactString::as_str), Some("constructor_podium_rate"));
    }

    #[tokio::test]
    async fn test_unknown_subject() {
        let engine = engine();
        let result = engine.get_metric("podium_rate", Subject::Driver(DriverId(99)), S2021).await;
        assert!(matches!(result, EngineResult::UnknownSubject(Subject::Driver(DriverId(99)))));
    }

    #[tokio::test]
    async fn test_missing_telemetry_table() {
        let engine = engine();
        let result = engine.get_metric("average_lap_time", ALPHA, S2021).await;
        assert!(matches!(
            result,
            EngineResult::TableUnavailable {
                table: TableId::LapTimes,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_get_many_keeps_request_order() {
        let engine = engine();
        let outcomes = engine.get_many(&["win_rate", "nope", "dnf_rate"], ALPHA, S2021).await;
        let names: Vec<_> = outcomes.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, ["win_rate", "nope", "dnf_rate"]);
        assert!(outcomes[0].1.is_found());
        assert!(matches!(outcomes[1].1, EngineResult::UnknownMetric(_)));
        assert!(outcomes[2].1.is_found());
    }

    #[tokio::test]
    async fn test_compare_normalizes_per_metric() {
        let engine = engine();
        let comparison = engine
            .compare(&["average_finish_position", "dnf_rate"], &[ALPHA, BRAVO], S2021, Scale::MinMax)
            .await
            .into_result()
            .unwrap();

        let metrics: Vec<_> = comparison.metrics.iter().map(|m| m.metric.as_str()).collect();
        assert_eq!(metrics, ["average_finish_position", "dnf_rate"]);

        let finish = &comparison.metrics[0];
        assert_eq!(finish.entries[0].result.subject, ALPHA);
        assert_eq!(finish.entries[0].score, Some(1.0));
        assert_eq!(finish.entries[1].score, Some(0.0));
        assert_eq!(finish.leader(), Some(ALPHA));

        let dnf = &comparison.metrics[1];
        assert_eq!(dnf.entries[0].score, Some(0.5));
        assert_eq!(dnf.entries[1].score, Some(0.5));

        assert_eq!(comparison.overall, [Some(0.75), Some(0.25)]);
        assert_eq!(comparison.subjects[0].name, "Test Alpha");
    }

    #[tokio::test]
    async fn test_five_race_season_rates() {
        let engine = five_race_season();

        // two podiums from four classified finishes, not from five entries
        let podium = engine.get_metric("podium_rate", ALPHA, S2021).await;
        assert!((value(&podium) - 0.5).abs() < 1e-9);
        assert_eq!(podium.as_ref().unwrap().sample_size, 4);

        for driver in [ALPHA, BRAVO] {
            let dnf = engine.get_metric("dnf_rate", driver, S2021).await;
            assert!((value(&dnf) - 0.2).abs() < 1e-9);
            assert_eq!(dnf.as_ref().unwrap().sample_size, 5);
        }

        let podium = engine.get_metric("podium_rate", BRAVO, S2021).await;
        assert!((value(&podium) - 0.75).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_five_race_season_comparison() {
        let engine = five_race_season();
        let comparison = engine
            .compare(&["average_finish_position", "dnf_rate"], &[ALPHA, BRAVO], S2021, Scale::MinMax)
            .await
            .into_result()
            .unwrap();

        let subjects: Vec<_> = comparison.subjects.iter().map(|s| s.subject).collect();
        assert_eq!(subjects, [ALPHA, BRAVO]);

        let metrics: Vec<_> = comparison.metrics.iter().map(|m| m.metric.as_str()).collect();
        assert_eq!(metrics, ["average_finish_position", "dnf_rate"]);

        // Alpha averages 3.25 over four finishes against Bravo's 2.25
        let finish = &comparison.metrics[0];
        assert!((finish.entries[0].result.as_f64().unwrap() - 3.25).abs() < 1e-9);
        assert!((finish.entries[1].result.as_f64().unwrap() - 2.25).abs() < 1e-9);
        assert_eq!(finish.entries[0].score, Some(0.0));
        assert_eq!(finish.entries[1].score, Some(1.0));

        let dnf = &comparison.metrics[1];
        assert_eq!(dnf.entries[0].score, Some(0.5));
        assert_eq!(dnf.entries[1].score, Some(0.5));

        for metric in &comparison.metrics {
            let order: Vec<_> = metric.entries.iter().map(|e| e.result.subject).collect();
            assert_eq!(order, [ALPHA, BRAVO], "{}", metric.metric);
        }

        assert_eq!(comparison.overall, [Some(0.25), Some(0.75)]);
    }

    #[tokio::test]
    async fn test_compare_needs_two_subjects() {
        let engine = engine();
        let result = engine.compare(&["win_rate"], &[ALPHA], S2021, Scale::MinMax).await;
        assert!(matches!(result, EngineResult::Error(_)));
    }

    #[tokio::test]
    async fn test_compare_rejects_mixed_subjects() {
        let engine = engine();
        let result = engine
            .compare(&["win_rate"], &[ALPHA, Subject::Constructor(ConstructorId(1))], S2021, Scale::ZScore)
            .await;
        assert!(matches!(result, EngineResult::Error(_)));
    }

    #[tokio::test]
    async fn test_compare_reports_unknown_subject() {
        let engine = engine();
        let result = engine
            .compare(&["win_rate"], &[ALPHA, Subject::Driver(DriverId(7))], S2021, Scale::MinMax)
            .await;
        assert!(matches!(result, EngineResult::UnknownSubject(Subject::Driver(DriverId(7)))));
    }

    #[tokio::test]
    async fn test_cache_clear() {
        let engine = engine();
        let _ = engine.get_metric("win_rate", ALPHA, S2021).await;
        let _ = engine.get_metric("dnf_rate", ALPHA, S2021).await;

        assert!(engine.cache_clear(Some("win_rat")).is_err());
        assert_eq!(engine.cache_clear(Some("win_rate")).unwrap(), 1);
        assert_eq!(engine.cache_clear(None).unwrap(), 1);
    }

    #[test]
    fn test_list_metrics() {
        let engine = engine();
        let qualifying = engine.list_metrics(SubjectType::Constructor, Some(MetricCategory::Qualifying));
        assert_eq!(qualifying.len(), 6);
        assert!(qualifying.iter().all(|m| m.name.starts_with("constructor_")));
    }
}
