use crate::metrics::stats::{count_f64, linear_slope, mean, population_std};
use crate::metrics::views::{TeamStops, race_field_pit_mean, team_pit_stops};
use crate::metrics::Measurement;
use crate::tables::{ConstructorId, RaceId, SeasonFilter, TableStore};

const NO_STOPS: &str = "no timed pit stops";

/// Stop windows by lap: early up to lap 15, middle up to lap 40, late after that.
const EARLY_WINDOW_END: u16 = 15;
const MIDDLE_WINDOW_END: u16 = 40;

/// A fast stop is one that takes less than this many seconds.
const FAST_STOP_SECONDS: f64 = 3.0;

fn durations(races: &[TeamStops<'_>]) -> Vec<f64> {
    races.iter().flat_map(TeamStops::durations).collect()
}

pub fn average_time(tables: &TableStore, constructor: ConstructorId, season: SeasonFilter) -> Measurement {
    let races = team_pit_stops(tables, constructor, season);
    let durations = durations(&races);
    let all_stops: usize = races.iter().map(|r| r.stops.len()).sum();
    Measurement::mean_of(&durations, NO_STOPS).with("excluded_stops", all_stops - durations.len())
}

/// Quickest service stop; the earliest one wins a tie.
pub fn fastest(tables: &TableStore, constructor: ConstructorId, season: SeasonFilter) -> Measurement {
    let races = team_pit_stops(tables, constructor, season);
    let mut best: Option<(f64, (u16, u8, u16), RaceId)> = None;
    let mut timed = 0;

    for race in &races {
        for stop in &race.stops {
            let Some(d) = stop.seconds().filter(|d| *d <= crate::metrics::views::MAX_PIT_STOP_SECONDS) else {
                continue;
            };
            timed += 1;
            let when = (race.race.season, race.race.round, stop.lap);
            if best.is_none_or(|(b, b_when, _)| d.total_cmp(&b).then(when.cmp(&b_when)).is_lt()) {
                best = Some((d, when, race.race.id));
            }
        }
    }

    best.map_or_else(
        || Measurement::insufficient(0, NO_STOPS),
        |(d, (year, _, lap), race)| {
            Measurement::float(d, timed)
                .with("season", u64::from(year))
                .with("race_id", u64::from(race.0))
                .with("lap", u64::from(lap))
        },
    )
}

pub fn consistency(tables: &TableStore, constructor: ConstructorId, season: SeasonFilter) -> Measurement {
    let durations = durations(&team_pit_stops(tables, constructor, season));
    if let Err(m) = Measurement::require(durations.len(), 2, "timed pit stops") {
        return m;
    }

    population_std(&durations).map_or_else(|| Measurement::insufficient(0, NO_STOPS), |sd| Measurement::float(sd, durations.len()))
}

pub fn sub_three_second_stops(tables: &TableStore, constructor: ConstructorId, season: SeasonFilter) -> Measurement {
    let durations = durations(&team_pit_stops(tables, constructor, season));
    let fast = durations.iter().filter(|d| **d < FAST_STOP_SECONDS).count();
    Measurement::count(fast as u64, durations.len())
}

/// Relative margin of the team's stops over the field's average in the same race.
pub fn efficiency(tables: &TableStore, constructor: ConstructorId, season: SeasonFilter) -> Measurement {
    let margins: Vec<f64> = team_pit_stops(tables, constructor, season)
        .iter()
        .filter_map(|race| {
            let team = mean(&race.durations())?;
            let field = race_field_pit_mean(tables, race.race)?;
            Some(-(team - field) / field)
        })
        .collect();

    Measurement::mean_of(&margins, NO_STOPS)
}

pub fn stops_per_race(tables: &TableStore, constructor: ConstructorId, season: SeasonFilter) -> Measurement {
    let races = team_pit_stops(tables, constructor, season);
    let counts: Vec<f64> = races.iter().map(|r| count_f64(r.stops.len())).collect();
    Measurement::mean_of(&counts, "no pit stops")
}

/// Trend of the per-race mean stop time through a season.
pub fn time_improvement(tables: &TableStore, constructor: ConstructorId, season: SeasonFilter) -> Measurement {
    if season.season().is_none() {
        return Measurement::insufficient(0, "only defined for a single season");
    }

    let means: Vec<f64> = team_pit_stops(tables, constructor, season)
        .iter()
        .filter_map(|race| mean(&race.durations()))
        .collect();
    if let Err(m) = Measurement::require(means.len(), 3, "races with timed stops") {
        return m;
    }

    linear_slope(&means).map_or_else(
        || Measurement::insufficient(means.len(), "no trend in the available races"),
        |slope| Measurement::float(slope, means.len()),
    )
}

/// Share of stops within 20% of the team's own mean.
pub fn reliability(tables: &TableStore, constructor: ConstructorId, season: SeasonFilter) -> Measurement {
    let durations = durations(&team_pit_stops(tables, constructor, season));
    let Some(avg) = mean(&durations) else {
        return Measurement::insufficient(0, NO_STOPS);
    };

    let within = durations.iter().filter(|d| **d <= avg * 1.2).count();
    Measurement::rate(within, durations.len(), NO_STOPS)
}

/// How evenly the team spreads its stops over the early, middle and late windows of a race.
pub fn strategic_success(tables: &TableStore, constructor: ConstructorId, season: SeasonFilter) -> Measurement {
    let spreads: Vec<f64> = team_pit_stops(tables, constructor, season)
        .iter()
        .filter_map(|race| {
            let mut windows = [0.0_f64; 3];
            for stop in &race.stops {
                let slot = match stop.lap {
                    lap if lap <= EARLY_WINDOW_END => 0,
                    lap if lap <= MIDDLE_WINDOW_END => 1,
                    _ => 2,
                };
                windows[slot] += 1.0;
            }
            population_std(&windows)
        })
        .collect();

    Measurement::mean_of(&spreads, "no pit stops")
}
