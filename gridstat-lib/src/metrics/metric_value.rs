use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The value a metric produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum MetricValue {
    Float(f64),
    UInt(u64),

    /// Not enough qualifying events to compute the metric; carries the reason.
    InsufficientData(CompactString),
}

impl MetricValue {
    #[must_use]
    #[expect(clippy::cast_precision_loss, reason = "Counts are far below 2^52")]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::UInt(v) => Some(*v as f64),
            Self::InsufficientData(_) => None,
        }
    }

    #[must_use]
    pub const fn is_insufficient(&self) -> bool {
        matches!(self, Self::InsufficientData(_))
    }
}

/// Supplementary detail attached to a result, such as a breakdown of its inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    UInt(u64),
    Float(f64),
    String(CompactString),
    List(Vec<Self>),
    Map(BTreeMap<CompactString, Self>),
}

pub type Metadata = BTreeMap<CompactString, MetaValue>;

impl From<u64> for MetaValue {
    fn from(v: u64) -> Self {
        Self::UInt(v)
    }
}

impl From<usize> for MetaValue {
    fn from(v: usize) -> Self {
        Self::UInt(v as u64)
    }
}

impl From<f64> for MetaValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for MetaValue {
    fn from(v: &str) -> Self {
        Self::String(v.into())
    }
}

impl From<CompactString> for MetaValue {
    fn from(v: CompactString) -> Self {
        Self::String(v)
    }
}

impl<T: Into<Self>> From<Vec<T>> for MetaValue {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}
