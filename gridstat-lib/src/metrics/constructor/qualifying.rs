use crate::metrics::stats::{mean, population_std};
use crate::metrics::views::{TeamSession, team_sessions};
use crate::metrics::Measurement;
use crate::tables::{ConstructorId, SeasonFilter, TableStore};

const NO_SESSIONS: &str = "no classified qualifying sessions";

fn best_positions(tables: &TableStore, constructor: ConstructorId, season: SeasonFilter) -> Vec<u8> {
    team_sessions(tables, constructor, season)
        .iter()
        .filter_map(TeamSession::best_position)
        .collect()
}

fn session_rate(tables: &TableStore, constructor: ConstructorId, season: SeasonFilter, top: u8) -> Measurement {
    let best = best_positions(tables, constructor, season);
    Measurement::rate(best.iter().filter(|p| **p <= top).count(), best.len(), NO_SESSIONS)
}

pub fn pole_rate(tables: &TableStore, constructor: ConstructorId, season: SeasonFilter) -> Measurement {
    session_rate(tables, constructor, season, 1)
}

pub fn front_row_rate(tables: &TableStore, constructor: ConstructorId, season: SeasonFilter) -> Measurement {
    session_rate(tables, constructor, season, 2)
}

pub fn top_ten_rate(tables: &TableStore, constructor: ConstructorId, season: SeasonFilter) -> Measurement {
    session_rate(tables, constructor, season, 10)
}

pub fn average_position(tables: &TableStore, constructor: ConstructorId, season: SeasonFilter) -> Measurement {
    let best: Vec<f64> = best_positions(tables, constructor, season).into_iter().map(f64::from).collect();
    Measurement::mean_of(&best, NO_SESSIONS)
}

pub fn consistency(tables: &TableStore, constructor: ConstructorId, season: SeasonFilter) -> Measurement {
    let best: Vec<f64> = best_positions(tables, constructor, season).into_iter().map(f64::from).collect();
    if let Err(m) = Measurement::require(best.len(), 3, "qualifying sessions") {
        return m;
    }

    population_std(&best).map_or_else(|| Measurement::insufficient(0, NO_SESSIONS), |sd| Measurement::float(sd, best.len()))
}

/// How far ahead of the field's average slot the team's best car qualified.
pub fn advantage(tables: &TableStore, constructor: ConstructorId, season: SeasonFilter) -> Measurement {
    let gaps: Vec<f64> = team_sessions(tables, constructor, season)
        .iter()
        .filter_map(|session| {
            let best = f64::from(session.best_position()?);
            let field: Vec<f64> = tables
                .qualifying_for_race(session.race.id)
                .filter_map(|q| q.position)
                .map(f64::from)
                .collect();
            Some(mean(&field)? - best)
        })
        .collect();

    Measurement::mean_of(&gaps, NO_SESSIONS)
}
