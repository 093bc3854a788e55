use crate::metrics::{Direction, MetricResult, Subject, Unit};
use crate::normalize::Scale;
use crate::tables::SeasonFilter;
use compact_str::CompactString;
use serde::Serialize;

/// A compared subject with its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectInfo {
    #[serde(flatten)]
    pub subject: Subject,
    pub name: CompactString,
}

/// Metrics side by side for two or more subjects, in request order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub season: SeasonFilter,
    pub scale: Scale,
    pub subjects: Vec<SubjectInfo>,
    pub metrics: Vec<MetricComparison>,

    /// Mean score of each subject over the metrics it has a score for.
    pub overall: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricComparison {
    pub metric: CompactString,
    pub unit: Unit,
    pub direction: Direction,
    pub entries: Vec<ComparisonEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonEntry {
    pub result: MetricResult,
    pub score: Option<f64>,
}

impl MetricComparison {
    /// The subject with the highest score; the first one listed wins a tie.
    #[must_use]
    pub fn leader(&self) -> Option<Subject> {
        let mut best: Option<(f64, Subject)> = None;
        for entry in &self.entries {
            if let Some(score) = entry.score
                && best.is_none_or(|(b, _)| score > b)
            {
                best = Some((score, entry.result.subject));
            }
        }

        best.map(|(_, subject)| subject)
    }
}
