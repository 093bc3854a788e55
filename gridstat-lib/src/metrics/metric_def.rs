use super::{Direction, Measurement, Metric, MetricCategory, MetricResult, Subject, SubjectType, Unit};
use crate::tables::{ConstructorId, DriverId, SeasonFilter, TableId, TableStore};

/// The compute function of a built-in metric, typed by the subject it accepts.
#[derive(Clone, Copy)]
pub enum Compute {
    Driver(fn(&TableStore, DriverId, SeasonFilter) -> Measurement),
    Constructor(fn(&TableStore, ConstructorId, SeasonFilter) -> Measurement),
}

impl core::fmt::Debug for Compute {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Driver(_) => f.write_str("Compute::Driver"),
            Self::Constructor(_) => f.write_str("Compute::Constructor"),
        }
    }
}

/// Static definition of a built-in metric.
#[derive(Debug, Clone, Copy)]
pub struct MetricDef {
    pub name: &'static str,
    pub description: &'static str,
    pub category: MetricCategory,
    pub unit: Unit,
    pub direction: Direction,
    pub tables: &'static [TableId],
    pub compute: Compute,
}

macro_rules! metric_def {
    ($name:expr, $description:expr, $category:ident, $unit:ident, $direction:ident, [$($table:ident),* $(,)?], $kind:ident($compute:expr)) => {
        crate::metrics::MetricDef {
            name: $name,
            description: $description,
            category: crate::metrics::MetricCategory::$category,
            unit: crate::metrics::Unit::$unit,
            direction: crate::metrics::Direction::$direction,
            tables: &[$(crate::tables::TableId::$table),*],
            compute: crate::metrics::Compute::$kind($compute),
        }
    };
}

pub(crate) use metric_def;

impl Metric for MetricDef {
    fn name(&self) -> &str {
        self.name
    }

    fn description(&self) -> &str {
        self.description
    }

    fn category(&self) -> MetricCategory {
        self.category
    }

    fn subject_type(&self) -> SubjectType {
        match self.compute {
            Compute::Driver(_) => SubjectType::Driver,
            Compute::Constructor(_) => SubjectType::Constructor,
        }
    }

    fn unit(&self) -> Unit {
        self.unit
    }

    fn direction(&self) -> Direction {
        self.direction
    }

    fn required_tables(&self) -> &[TableId] {
        self.tables
    }

    fn compute(&self, tables: &TableStore, subject: Subject, season: SeasonFilter) -> MetricResult {
        let measurement = match (self.compute, subject) {
            (Compute::Driver(f), Subject::Driver(id)) => f(tables, id, season),
            (Compute::Constructor(f), Subject::Constructor(id)) => f(tables, id, season),
            _ => Measurement::insufficient(0, format!("{} applies to {} subjects only", self.name, self.subject_type())),
        };

        MetricResult::new(self.name, subject, season, self.unit, self.direction, measurement)
    }
}

/// Every built-in metric, drivers first.
pub fn builtin_metrics() -> impl Iterator<Item = &'static MetricDef> {
    super::driver::DRIVER_METRICS
        .iter()
        .chain(super::constructor::CONSTRUCTOR_METRICS.iter())
}
