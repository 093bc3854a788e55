use super::{Direction, MetricCategory, MetricResult, Subject, SubjectType, Unit};
use crate::tables::{SeasonFilter, TableId, TableStore};

/// A named statistic computed for a driver or a constructor.
///
/// Implementations must be pure: computing twice against the same store with the same
/// inputs yields identical results.
pub trait Metric: Send + Sync + core::fmt::Debug {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn category(&self) -> MetricCategory;
    fn subject_type(&self) -> SubjectType;
    fn unit(&self) -> Unit;
    fn direction(&self) -> Direction;

    /// Tables that must be loaded for the metric to be computed.
    fn required_tables(&self) -> &[TableId];

    fn compute(&self, tables: &TableStore, subject: Subject, season: SeasonFilter) -> MetricResult;
}
