use crate::metrics::stats::ratio;
use crate::metrics::views::team_races;
use crate::metrics::Measurement;
use crate::tables::{ConstructorId, FinishStatus, ResultRow, SeasonFilter, TableStore};

const NO_ENTRIES: &str = "no race entries";

fn entries(tables: &TableStore, constructor: ConstructorId, season: SeasonFilter) -> Vec<&ResultRow> {
    tables.results_for_constructor(constructor, season).collect()
}

pub fn dnf_rate(tables: &TableStore, constructor: ConstructorId, season: SeasonFilter) -> Measurement {
    let entries = entries(tables, constructor, season);
    let dnfs = entries.iter().filter(|r| !r.is_classified()).count();
    Measurement::rate(dnfs, entries.len(), NO_ENTRIES)
}

pub fn mechanical_failure_rate(tables: &TableStore, constructor: ConstructorId, season: SeasonFilter) -> Measurement {
    let entries = entries(tables, constructor, season);
    let failures = entries
        .iter()
        .filter(|r| !r.is_classified() && tables.finish_status(r) == FinishStatus::Mechanical)
        .count();
    Measurement::rate(failures, entries.len(), NO_ENTRIES)
}

/// Races in which every car of the team was classified.
pub fn finish_rate(tables: &TableStore, constructor: ConstructorId, season: SeasonFilter) -> Measurement {
    let races = team_races(tables, constructor, season);
    let clean = races.iter().filter(|r| r.cars.iter().all(|c| c.is_classified())).count();
    Measurement::rate(clean, races.len(), "no races entered")
}

/// Weighted blend of finishing, scoring and finishing inside the top fifteen, per entry.
pub fn reliability_index(tables: &TableStore, constructor: ConstructorId, season: SeasonFilter) -> Measurement {
    let entries = entries(tables, constructor, season);
    let finishes = entries.iter().filter(|r| r.is_classified()).count();
    let scoring = entries.iter().filter(|r| r.scored_points()).count();
    let top_fifteen = entries.iter().filter(|r| r.position.is_some_and(|p| p <= 15)).count();

    let (Some(finish), Some(points), Some(competitive)) = (
        ratio(finishes, entries.len()),
        ratio(scoring, entries.len()),
        ratio(top_fifteen, entries.len()),
    ) else {
        return Measurement::insufficient(0, NO_ENTRIES);
    };

    Measurement::float(0.4 * finish + 0.35 * points + 0.25 * competitive, entries.len())
        .with("finish_rate", finish)
        .with("points_rate", points)
        .with("top_fifteen_rate", competitive)
}

/// Mean of the per-season finish rates, so each season weighs the same.
pub fn average_reliability(tables: &TableStore, constructor: ConstructorId, season: SeasonFilter) -> Measurement {
    let mut per_season: Vec<(u16, usize, usize)> = Vec::new();
    for (race, result) in tables.join_races(tables.results_for_constructor(constructor, season)) {
        match per_season.last_mut() {
            Some((year, entries, finishes)) if *year == race.season => {
                *entries += 1;
                *finishes += usize::from(result.is_classified());
            }
            _ => per_season.push((race.season, 1, usize::from(result.is_classified()))),
        }
    }

    let rates: Vec<f64> = per_season.iter().filter_map(|(_, e, f)| ratio(*f, *e)).collect();
    let entries: usize = per_season.iter().map(|(_, e, _)| e).sum();
    crate::metrics::stats::mean(&rates).map_or_else(
        || Measurement::insufficient(0, NO_ENTRIES),
        |avg| Measurement::float(avg, entries).with("seasons", per_season.len()),
    )
}
