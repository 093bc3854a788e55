use serde::{Deserialize, Serialize};
use strum::Display;

/// What a metric's value measures.
///
/// Fractions are always on [0, 1]; turning them into percentages is left to the
/// presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Fraction,
    Position,
    Positions,
    Points,
    PointsPerRace,
    Count,
    CountPerRace,
    Seconds,
    SecondsPerRace,
    SecondsPerTenLaps,
    Index,
    Relative,
}

impl Unit {
    /// Short suffix used when rendering a value, if any.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Fraction => "%",
            Self::Seconds => "s",
            Self::SecondsPerRace => "s/race",
            Self::SecondsPerTenLaps => "s/10 laps",
            Self::Points => " pts",
            Self::PointsPerRace => " pts/race",
            Self::CountPerRace => "/race",
            Self::Position | Self::Positions | Self::Count | Self::Index | Self::Relative => "",
        }
    }
}

/// Which end of a metric's scale is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    HigherIsBetter,
    LowerIsBetter,
}
