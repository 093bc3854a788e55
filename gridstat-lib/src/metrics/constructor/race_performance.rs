use crate::metrics::views::{TeamRace, team_races, team_sessions};
use crate::metrics::Measurement;
use crate::tables::{ConstructorId, SeasonFilter, TableStore};

const NO_RACES: &str = "no races entered";

fn race_rate(tables: &TableStore, constructor: ConstructorId, season: SeasonFilter, hit: impl Fn(&TeamRace<'_>) -> bool) -> Measurement {
    let races = team_races(tables, constructor, season);
    let hits = races.iter().filter(|&r| hit(r)).count();
    Measurement::rate(hits, races.len(), NO_RACES)
}

fn race_count(tables: &TableStore, constructor: ConstructorId, season: SeasonFilter, hit: impl Fn(&TeamRace<'_>) -> bool) -> Measurement {
    let races = team_races(tables, constructor, season);
    let hits = races.iter().filter(|&r| hit(r)).count();
    Measurement::count(hits as u64, races.len())
}

pub fn win_rate(tables: &TableStore, constructor: ConstructorId, season: SeasonFilter) -> Measurement {
    race_rate(tables, constructor, season, |r| r.won())
}

pub fn podium_rate(tables: &TableStore, constructor: ConstructorId, season: SeasonFilter) -> Measurement {
    race_rate(tables, constructor, season, |r| r.podium_cars() > 0)
}

pub fn points_scoring_rate(tables: &TableStore, constructor: ConstructorId, season: SeasonFilter) -> Measurement {
    race_rate(tables, constructor, season, |r| r.points() > 0.0)
}

/// Races the team finished first and second.
pub fn one_two_finishes(tables: &TableStore, constructor: ConstructorId, season: SeasonFilter) -> Measurement {
    race_count(tables, constructor, season, |r| {
        r.won() && r.cars.iter().any(|c| c.position == Some(2))
    })
}

pub fn podium_lockouts(tables: &TableStore, constructor: ConstructorId, season: SeasonFilter) -> Measurement {
    race_count(tables, constructor, season, |r| r.won() && r.podium_cars() >= 2)
}

pub fn double_podiums(tables: &TableStore, constructor: ConstructorId, season: SeasonFilter) -> Measurement {
    race_count(tables, constructor, season, |r| r.podium_cars() >= 2)
}

/// Mean of the team's best classified car per race.
pub fn average_finish(tables: &TableStore, constructor: ConstructorId, season: SeasonFilter) -> Measurement {
    let best: Vec<f64> = team_races(tables, constructor, season)
        .iter()
        .filter_map(TeamRace::best_position)
        .map(f64::from)
        .collect();

    Measurement::mean_of(&best, "no classified finishes")
}

/// Qualifying sessions with both front-row slots taken by the team.
pub fn front_row_lockouts(tables: &TableStore, constructor: ConstructorId, season: SeasonFilter) -> Measurement {
    let sessions = team_sessions(tables, constructor, season);
    let lockouts = sessions
        .iter()
        .filter(|s| s.cars.iter().filter(|q| q.position.is_some_and(|p| p <= 2)).count() >= 2)
        .count();

    Measurement::count(lockouts as u64, sessions.len())
}
