use super::{Direction, Measurement, Metadata, MetricValue, Numeric, Subject, Unit};
use crate::tables::SeasonFilter;
use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// The outcome of computing one metric for one subject.
///
/// Results are immutable values. A result whose sample size is zero always carries
/// [`MetricValue::InsufficientData`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricResult {
    pub metric: CompactString,
    pub subject: Subject,
    pub season: SeasonFilter,
    pub value: MetricValue,
    pub unit: Unit,
    pub direction: Direction,
    pub sample_size: u64,

    #[serde(default, skip_serializing_if = "Metadata::is_empty")]
    pub metadata: Metadata,
}

impl MetricResult {
    #[must_use]
    pub fn new(metric: &str, subject: Subject, season: SeasonFilter, unit: Unit, direction: Direction, measurement: Measurement) -> Self {
        let (value, sample_size, metadata) = match measurement {
            Measurement::Value {
                value,
                sample_size,
                metadata,
            } => {
                let value = match value {
                    Numeric::Float(v) => MetricValue::Float(v),
                    Numeric::UInt(v) => MetricValue::UInt(v),
                };
                (value, sample_size, metadata)
            }
            Measurement::Insufficient { sample_size, reason } => (MetricValue::InsufficientData(reason), sample_size, Metadata::new()),
        };

        Self {
            metric: metric.into(),
            subject,
            season,
            value,
            unit,
            direction,
            sample_size,
            metadata,
        }
    }

    /// Whether the result carries a usable number.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        !self.value.is_insufficient()
    }

    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        self.value.as_f64()
    }
}
