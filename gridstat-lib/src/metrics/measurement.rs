use super::{MetaValue, Metadata};
use compact_str::CompactString;

/// What a compute function hands back before the result is stamped with its identity.
#[derive(Debug, Clone, PartialEq)]
pub enum Measurement {
    Value {
        value: Numeric,
        sample_size: u64,
        metadata: Metadata,
    },
    Insufficient {
        sample_size: u64,
        reason: CompactString,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    Float(f64),
    UInt(u64),
}

impl Measurement {
    /// A floating-point value over `sample_size` events.
    ///
    /// A zero sample or a non-finite value becomes insufficient data.
    #[must_use]
    pub fn float(value: f64, sample_size: usize) -> Self {
        if !value.is_finite() {
            return Self::insufficient(sample_size, "value is undefined for the available data");
        }

        Self::numeric(Numeric::Float(value), sample_size)
    }

    /// An integer count over `sample_size` events.
    #[must_use]
    pub fn count(value: u64, sample_size: usize) -> Self {
        Self::numeric(Numeric::UInt(value), sample_size)
    }

    fn numeric(value: Numeric, sample_size: usize) -> Self {
        if sample_size == 0 {
            return Self::insufficient(0, "no qualifying events");
        }

        Self::Value {
            value,
            sample_size: sample_size as u64,
            metadata: Metadata::new(),
        }
    }

    #[must_use]
    pub fn insufficient(sample_size: usize, reason: impl Into<CompactString>) -> Self {
        Self::Insufficient {
            sample_size: sample_size as u64,
            reason: reason.into(),
        }
    }

    /// `hits / total` as a fraction, or insufficient data when `total` is zero.
    #[must_use]
    pub fn rate(hits: usize, total: usize, empty: &str) -> Self {
        super::stats::ratio(hits, total).map_or_else(
            || Self::insufficient(0, empty),
            |rate| Self::float(rate, total).with("count", hits),
        )
    }

    /// Arithmetic mean of `values`, or insufficient data when there are none.
    #[must_use]
    pub fn mean_of(values: &[f64], empty: &str) -> Self {
        super::stats::mean(values).map_or_else(|| Self::insufficient(0, empty), |m| Self::float(m, values.len()))
    }

    /// Fails with insufficient data unless at least `min` events are available.
    pub fn require(available: usize, min: usize, what: &str) -> Result<(), Self> {
        if available >= min {
            Ok(())
        } else {
            Err(Self::insufficient(available, compact_str::format_compact!("needs at least {min} {what}, found {available}")))
        }
    }

    /// Attaches a metadata entry. Non-finite floats are dropped.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<MetaValue>) -> Self {
        if let Self::Value { metadata, .. } = &mut self {
            let value = value.into();
            if is_finite(&value) {
                let _ = metadata.insert(key.into(), value);
            }
        }
        self
    }

    #[must_use]
    pub const fn sample_size(&self) -> u64 {
        match self {
            Self::Value { sample_size, .. } | Self::Insufficient { sample_size, .. } => *sample_size,
        }
    }
}

#[cfg(test)]
impl Measurement {
    /// The numeric value, panicking on insufficient data.
    #[expect(clippy::cast_precision_loss, reason = "Test values are small")]
    pub fn expect_f64(&self) -> f64 {
        match self {
            Self::Value {
                value: Numeric::Float(v), ..
            } => *v,
            Self::Value {
                value: Numeric::UInt(v), ..
            } => *v as f64,
            Self::Insufficient { reason, .. } => panic!("insufficient data: {reason}"),
        }
    }
}

fn is_finite(value: &MetaValue) -> bool {
    match value {
        MetaValue::Float(f) => f.is_finite(),
        MetaValue::List(items) => items.iter().all(is_finite),
        MetaValue::Map(map) => map.values().all(is_finite),
        MetaValue::UInt(_) | MetaValue::String(_) => true,
    }
}
