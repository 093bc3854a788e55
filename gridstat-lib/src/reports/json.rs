use super::Report;
use crate::Result;
use crate::engine::EngineResult;
use crate::metrics::MetricResult;
use compact_str::CompactString;
use core::fmt::Write;
use serde_json::json;

pub fn generate<W: Write>(report: &Report<'_>, writer: &mut W) -> Result<()> {
    let output = match report {
        Report::Catalog(metrics) => json!({ "metrics": metrics }),
        Report::Results { subject, season, outcomes } => json!({
            "subject": subject,
            "season": season,
            "results": outcomes.iter().map(|(name, outcome)| outcome_to_json(name, outcome)).collect::<Vec<_>>(),
        }),
        Report::Comparison(comparison) => serde_json::to_value(comparison)?,
        Report::CacheStats(stats) => serde_json::to_value(stats)?,
        Report::CacheCleared { metric, removed } => json!({
            "metric": metric,
            "removed": removed,
        }),
    };

    writeln!(writer, "{}", serde_json::to_string_pretty(&output)?)?;
    Ok(())
}

#[expect(unused_results, reason = "Map::insert only replaces keys that are never set twice")]
fn outcome_to_json(name: &CompactString, outcome: &EngineResult<MetricResult>) -> serde_json::Value {
    let mut obj = serde_json::Map::new();
    obj.insert("metric".to_string(), json!(name));

    let status = match outcome {
        EngineResult::Found(result) => {
            obj.insert("result".to_string(), json!(result));
            "found"
        }
        EngineResult::UnknownMetric(unknown) => {
            obj.insert("suggestions".to_string(), json!(unknown.suggestions));
            "unknown_metric"
        }
        EngineResult::UnknownSubject(subject) => {
            obj.insert("subject".to_string(), json!(subject));
            "unknown_subject"
        }
        EngineResult::TableUnavailable { table, .. } => {
            obj.insert("table".to_string(), json!(table));
            "table_unavailable"
        }
        EngineResult::Error(_) => "error",
    };

    obj.insert("status".to_string(), json!(status));
    if !outcome.is_found() {
        obj.insert("message".to_string(), json!(outcome.to_string()));
    }

    serde_json::Value::Object(obj)
}
