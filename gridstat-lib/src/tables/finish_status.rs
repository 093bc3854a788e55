use serde::Serialize;
use strum::{Display, EnumIter};

/// Coarse classification of a result's finishing status text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FinishStatus {
    Finished,
    Lapped,
    Mechanical,
    Accident,
    Disqualified,
    Other,
}

const MECHANICAL_KEYWORDS: &[&str] = &[
    "engine",
    "gearbox",
    "transmission",
    "clutch",
    "hydraulics",
    "electrical",
    "electronics",
    "brakes",
    "suspension",
    "power unit",
    "power loss",
    "turbo",
    "battery",
    "mgu-k",
    "mgu-h",
    "driveshaft",
    "overheating",
    "oil",
    "water",
    "fuel",
    "exhaust",
    "radiator",
    "throttle",
    "wheel",
    "steering",
    "differential",
    "mechanical",
    "technical",
    "pneumatic",
    "vibrations",
    "cooling",
];

const ACCIDENT_KEYWORDS: &[&str] = &["accident", "collision", "spun off", "crash", "damage", "debris"];

impl FinishStatus {
    /// Classifies a status string such as `Finished`, `+2 Laps`, `Gearbox` or `Collision damage`.
    ///
    /// Matching is case-insensitive. Accident keywords win over mechanical ones, so
    /// "Collision damage" is an accident even though "damage" alone could be either.
    #[must_use]
    pub fn classify(text: &str) -> Self {
        let lower = text.trim().to_ascii_lowercase();

        if lower == "finished" {
            return Self::Finished;
        }

        if is_lapped(&lower) {
            return Self::Lapped;
        }

        if lower.contains("disqualified") {
            return Self::Disqualified;
        }

        if ACCIDENT_KEYWORDS.iter().any(|k| lower.contains(k)) {
            return Self::Accident;
        }

        // "ERS" only as a whole word, otherwise "drivers" would match
        let mentions_ers = lower.split(|c: char| !c.is_ascii_alphanumeric()).any(|word| word == "ers");
        if mentions_ers || MECHANICAL_KEYWORDS.iter().any(|k| lower.contains(k)) {
            return Self::Mechanical;
        }

        Self::Other
    }
}

fn is_lapped(lower: &str) -> bool {
    let Some(rest) = lower.strip_prefix('+') else {
        return false;
    };

    let mut parts = rest.split_whitespace();
    let count_ok = parts.next().is_some_and(|n| n.parse::<u32>().is_ok());
    let word_ok = parts.next().is_some_and(|w| w == "lap" || w == "laps");
    count_ok && word_ok
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finished_and_lapped() {
        assert_eq!(FinishStatus::classify("Finished"), FinishStatus::Finished);
        assert_eq!(FinishStatus::classify("+1 Lap"), FinishStatus::Lapped);
        assert_eq!(FinishStatus::classify("+12 Laps"), FinishStatus::Lapped);
    }

    #[test]
    fn test_mechanical() {
        for text in ["Engine", "Gearbox", "Hydraulics", "Power Unit", "ERS", "MGU-K", "Brakes", "Turbo"] {
            assert_eq!(FinishStatus::classify(text), FinishStatus::Mechanical, "{text}");
        }
    }

    #[test]
    fn test_ers_is_whole_word() {
        assert_eq!(FinishStatus::classify("Withdrew, drivers unwell"), FinishStatus::Other);
    }

    #[test]
    fn test_accident_wins_over_mechanical() {
        assert_eq!(FinishStatus::classify("Accident"), FinishStatus::Accident);
        assert_eq!(FinishStatus::classify("Collision damage"), FinishStatus::Accident);
        assert_eq!(FinishStatus::classify("Spun off"), FinishStatus::Accident);
    }

    #[test]
    fn test_disqualified_and_other() {
        assert_eq!(FinishStatus::classify("Disqualified"), FinishStatus::Disqualified);
        assert_eq!(FinishStatus::classify("Withdrew"), FinishStatus::Other);
        assert_eq!(FinishStatus::classify("+ Laps"), FinishStatus::Other);
    }
}
