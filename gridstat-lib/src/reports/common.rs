//! Common utilities shared across report generators.

use crate::metrics::{Direction, MetaValue, MetricValue, Unit};

/// Format a metric value for display.
///
/// Fractions are shown as percentages, times with millisecond precision, and everything
/// else with two decimals. Insufficient data is spelled out along with its reason.
pub fn format_metric_value(value: &MetricValue, unit: Unit) -> String {
    let suffix = unit.suffix();
    match value {
        MetricValue::UInt(u) => format!("{u}{suffix}"),
        MetricValue::Float(f) => match unit {
            Unit::Fraction => format!("{:.1}{suffix}", f * 100.0),
            Unit::Seconds | Unit::SecondsPerRace | Unit::SecondsPerTenLaps => format!("{f:.3}{suffix}"),
            _ => format!("{f:.2}{suffix}"),
        },
        MetricValue::InsufficientData(reason) => format!("insufficient data ({reason})"),
    }
}

/// Format a metadata value; lists become comma-separated and maps `key=value` pairs.
pub fn format_meta_value(value: &MetaValue) -> String {
    match value {
        MetaValue::UInt(u) => u.to_string(),
        MetaValue::Float(f) => format!("{f:.3}"),
        MetaValue::String(s) => s.to_string(),
        MetaValue::List(values) => values.iter().map(format_meta_value).collect::<Vec<_>>().join(", "),
        MetaValue::Map(entries) => entries
            .iter()
            .map(|(k, v)| format!("{k}={}", format_meta_value(v)))
            .collect::<Vec<_>>()
            .join(", "),
    }
}

/// Format a normalized score, or `n/a` when the subject has none.
pub fn format_score(score: Option<f64>) -> String {
    score.map_or_else(|| "n/a".to_string(), |s| format!("{s:.2}"))
}

pub const fn format_direction(direction: Direction) -> &'static str {
    match direction {
        Direction::HigherIsBetter => "higher is better",
        Direction::LowerIsBetter => "lower is better",
    }
}

/// Format a byte count using binary units.
#[expect(clippy::cast_precision_loss, reason = "Sizes are only shown with one decimal")]
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];

    if bytes < 1024 {
        return format!("{bytes} B");
    }

    let mut size = bytes as f64 / 1024.0;
    let mut unit = UNITS[0];
    for next in &UNITS[1..] {
        if size < 1024.0 {
            break;
        }
        size /= 1024.0;
        unit = next;
    }

    format!("{size:.1} {unit}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_fraction_as_percentage() {
        assert_eq!(format_metric_value(&MetricValue::Float(0.625), Unit::Fraction), "62.5%");
        assert_eq!(format_metric_value(&MetricValue::Float(1.0), Unit::Fraction), "100.0%");
    }

    #[test]
    fn test_units() {
        assert_eq!(format_metric_value(&MetricValue::Float(2.456_78), Unit::Seconds), "2.457s");
        assert_eq!(format_metric_value(&MetricValue::Float(34.2), Unit::PointsPerRace), "34.20 pts/race");
        assert_eq!(format_metric_value(&MetricValue::Float(7.0 / 3.0), Unit::Position), "2.33");
        assert_eq!(format_metric_value(&MetricValue::UInt(12), Unit::Count), "12");
        assert_eq!(format_metric_value(&MetricValue::UInt(171), Unit::Points), "171 pts");
    }

    #[test]
    fn test_insufficient_data() {
        let value = MetricValue::InsufficientData("no classified finishes".into());
        assert_eq!(format_metric_value(&value, Unit::Fraction), "insufficient data (no classified finishes)");
    }

    #[test]
    fn test_meta_values() {
        assert_eq!(format_meta_value(&MetaValue::Float(0.5)), "0.500");
        assert_eq!(format_meta_value(&MetaValue::List(vec![MetaValue::UInt(1), MetaValue::UInt(2)])), "1, 2");

        let map: BTreeMap<_, _> = [("b".into(), MetaValue::UInt(2)), ("a".into(), MetaValue::String("x".into()))].into();
        assert_eq!(format_meta_value(&MetaValue::Map(map)), "a=x, b=2");
    }

    #[test]
    fn test_scores() {
        assert_eq!(format_score(None), "n/a");
        assert_eq!(format_score(Some(0.756)), "0.76");
        assert_eq!(format_score(Some(-1.0)), "-1.00");
    }

    #[test]
    fn test_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1536), "1.5 KiB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MiB");
    }
}
