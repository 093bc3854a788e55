//! Cross-subject rescaling for comparisons
//!
//! Scores are computed per metric over the compared subjects only. Metrics where lower
//! values are better are inverted first, so a higher score always means a better subject.

use crate::metrics::stats::{mean, population_std};
use crate::metrics::{Direction, MetricResult};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Score given to every subject when all valid values are equal under min-max.
const TIED_MIN_MAX_SCORE: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize, Deserialize, ValueEnum)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Scale {
    /// Linear rescale onto [0, 1]
    #[default]
    MinMax,

    /// Distance from the mean in population standard deviations
    ZScore,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ComparisonNormalizer {
    scale: Scale,
}

impl ComparisonNormalizer {
    #[must_use]
    pub const fn new(scale: Scale) -> Self {
        Self { scale }
    }

    #[must_use]
    pub const fn scale(self) -> Scale {
        self.scale
    }

    /// Scores the results of one metric across subjects, in the order given.
    ///
    /// Insufficient-data results get no score and do not influence the others.
    #[must_use]
    pub fn normalize(self, results: &[MetricResult]) -> Vec<Option<f64>> {
        let oriented: Vec<Option<f64>> = results
            .iter()
            .map(|r| {
                r.as_f64().map(|v| match r.direction {
                    Direction::HigherIsBetter => v,
                    Direction::LowerIsBetter => -v,
                })
            })
            .collect();

        let valid: Vec<f64> = oriented.iter().flatten().copied().collect();
        if valid.is_empty() {
            return vec![None; results.len()];
        }

        match self.scale {
            Scale::MinMax => {
                let min = valid.iter().copied().fold(f64::INFINITY, f64::min);
                let max = valid.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                let range = max - min;
                oriented
                    .iter()
                    .map(|v| v.map(|v| if range == 0.0 { TIED_MIN_MAX_SCORE } else { (v - min) / range }))
                    .collect()
            }
            Scale::ZScore => {
                let avg = mean(&valid).unwrap_or_default();
                let sd = population_std(&valid).unwrap_or_default();
                oriented
                    .iter()
                    .map(|v| v.map(|v| if sd == 0.0 { 0.0 } else { (v - avg) / sd }))
                    .collect()
            }
        }
    }
}
