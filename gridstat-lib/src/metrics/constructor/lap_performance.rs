use crate::metrics::stats::{coefficient_of_variation, linear_slope, mean, population_std, without_outliers};
use crate::metrics::views::{Stint, race_field_lap_mean, team_races, team_stints};
use crate::metrics::Measurement;
use crate::tables::{ConstructorId, RaceId, SeasonFilter, TableStore};

const NO_LAPS: &str = "no timed laps";

/// Stints shorter than this are too short to show a trend.
const MIN_STINT_LAPS: usize = 10;

/// Stints used to judge tyre wear must be at least this long.
const MIN_TYRE_STINT_LAPS: usize = 20;

/// Laps within this factor of the race's fastest lap count as competitive.
const COMPETITIVE_LAP_FACTOR: f64 = 1.03;

/// Estimated lap time cost of one lap's worth of fuel, in seconds.
const FUEL_EFFECT_PER_LAP: f64 = 0.0525;

fn all_laps(stints: &[Stint<'_>]) -> Vec<f64> {
    stints.iter().flat_map(Stint::times).collect()
}

pub fn average_time(tables: &TableStore, constructor: ConstructorId, season: SeasonFilter) -> Measurement {
    Measurement::mean_of(&all_laps(&team_stints(tables, constructor, season)), NO_LAPS)
}

/// Quickest lap by any of the team's cars; the earliest one wins a tie.
pub fn fastest(tables: &TableStore, constructor: ConstructorId, season: SeasonFilter) -> Measurement {
    let stints = team_stints(tables, constructor, season);
    let mut best: Option<(f64, (u16, u8, u16), RaceId)> = None;
    let mut laps = 0;

    for stint in &stints {
        for &(lap, time) in &stint.laps {
            laps += 1;
            let when = (stint.race.season, stint.race.round, lap);
            if best.is_none_or(|(b, b_when, _)| time.total_cmp(&b).then(when.cmp(&b_when)).is_lt()) {
                best = Some((time, when, stint.race.id));
            }
        }
    }

    best.map_or_else(
        || Measurement::insufficient(0, NO_LAPS),
        |(time, (year, _, lap), race)| {
            Measurement::float(time, laps)
                .with("season", u64::from(year))
                .with("race_id", u64::from(race.0))
                .with("lap", u64::from(lap))
        },
    )
}

pub fn consistency(tables: &TableStore, constructor: ConstructorId, season: SeasonFilter) -> Measurement {
    let laps = all_laps(&team_stints(tables, constructor, season));
    if let Err(m) = Measurement::require(laps.len(), MIN_STINT_LAPS, "timed laps") {
        return m;
    }

    let kept = without_outliers(&laps);
    population_std(&kept).map_or_else(
        || Measurement::insufficient(laps.len(), NO_LAPS),
        |sd| Measurement::float(sd, kept.len()).with("outliers_removed", laps.len() - kept.len()),
    )
}

/// Relative margin of the team's mean lap over the field's mean lap, averaged over races.
pub fn race_pace(tables: &TableStore, constructor: ConstructorId, season: SeasonFilter) -> Measurement {
    let stints = team_stints(tables, constructor, season);
    let mut margins = Vec::new();

    for group in stints.chunk_by(|a, b| a.race.id == b.race.id) {
        let (Some(team), Some(field)) = (mean(&all_laps(group)), race_field_lap_mean(tables, group[0].race)) else {
            continue;
        };
        margins.push(-(team - field) / field);
    }

    Measurement::mean_of(&margins, NO_LAPS)
}

fn per_stint(stints: &[Stint<'_>], min_laps: usize, f: impl Fn(&[f64]) -> Option<f64>) -> Vec<f64> {
    stints
        .iter()
        .map(Stint::times)
        .filter(|t| t.len() >= min_laps)
        .filter_map(|t| f(&t))
        .collect()
}

fn stints_insufficient(min_laps: usize) -> String {
    format!("no stints of at least {min_laps} laps")
}

/// Pace gained between the opening and closing five laps of a stint.
pub fn lap_time_improvement(tables: &TableStore, constructor: ConstructorId, season: SeasonFilter) -> Measurement {
    let gains = per_stint(&team_stints(tables, constructor, season), MIN_STINT_LAPS, |t| {
        Some(mean(&t[..5])? - mean(&t[t.len() - 5..])?)
    });

    Measurement::mean_of(&gains, &stints_insufficient(MIN_STINT_LAPS))
}

/// Lap time lost every ten laps over a long stint.
pub fn tire_management(tables: &TableStore, constructor: ConstructorId, season: SeasonFilter) -> Measurement {
    let slopes = per_stint(&team_stints(tables, constructor, season), MIN_TYRE_STINT_LAPS, |t| {
        linear_slope(t).map(|s| s * 10.0)
    });

    Measurement::mean_of(&slopes, &stints_insufficient(MIN_TYRE_STINT_LAPS))
}

pub fn lap_time_variability(tables: &TableStore, constructor: ConstructorId, season: SeasonFilter) -> Measurement {
    let cvs = per_stint(&team_stints(tables, constructor, season), MIN_STINT_LAPS, coefficient_of_variation);
    Measurement::mean_of(&cvs, &stints_insufficient(MIN_STINT_LAPS))
}

/// Share of the team's laps within 3% of the fastest lap of their race.
pub fn competitive_lap_rate(tables: &TableStore, constructor: ConstructorId, season: SeasonFilter) -> Measurement {
    let stints = team_stints(tables, constructor, season);
    let mut total = 0;
    let mut competitive = 0;

    for group in stints.chunk_by(|a, b| a.race.id == b.race.id) {
        let fastest = tables
            .lap_times_for_race(group[0].race.id)
            .map(crate::tables::LapTimeRow::seconds)
            .fold(f64::INFINITY, f64::min);

        for time in all_laps(group) {
            total += 1;
            if time <= fastest * COMPETITIVE_LAP_FACTOR {
                competitive += 1;
            }
        }
    }

    Measurement::rate(competitive, total, NO_LAPS)
}

/// Share of races in which the team had the lowest mean lap time of all constructors.
pub fn pace_dominance(tables: &TableStore, constructor: ConstructorId, season: SeasonFilter) -> Measurement {
    let mut races = 0;
    let mut dominated = 0;

    for team_race in team_races(tables, constructor, season) {
        let mut by_team: Vec<(ConstructorId, f64, usize)> = Vec::new();
        for (result, lap) in tables.join_results(tables.lap_times_for_race(team_race.race.id)) {
            match by_team.iter_mut().find(|(c, ..)| *c == result.constructor_id) {
                Some((_, sum, n)) => {
                    *sum += lap.seconds();
                    *n += 1;
                }
                None => by_team.push((result.constructor_id, lap.seconds(), 1)),
            }
        }

        let means: Vec<(ConstructorId, f64)> = by_team
            .into_iter()
            .map(|(c, sum, n)| (c, sum / crate::metrics::stats::count_f64(n)))
            .collect();
        let Some(&(_, mine)) = means.iter().find(|(c, _)| *c == constructor) else {
            continue;
        };

        races += 1;
        if means.iter().all(|(_, m)| mine <= *m) {
            dominated += 1;
        }
    }

    Measurement::rate(dominated, races, NO_LAPS)
}

/// Mean lap time with the weight of the remaining fuel taken out.
pub fn fuel_adjusted_pace(tables: &TableStore, constructor: ConstructorId, season: SeasonFilter) -> Measurement {
    let adjusted: Vec<f64> = team_stints(tables, constructor, season)
        .iter()
        .filter(|s| s.laps.len() >= MIN_STINT_LAPS)
        .flat_map(|s| {
            let last = s.laps.last().map_or(0, |(lap, _)| *lap);
            s.laps
                .iter()
                .map(move |(lap, time)| time - f64::from(last - lap + 1) * FUEL_EFFECT_PER_LAP)
        })
        .collect();

    Measurement::mean_of(&adjusted, &stints_insufficient(MIN_STINT_LAPS))
}
