//! Grouped views over the store that several metrics share.
//!
//! Constructor metrics look at a race as a whole (both cars), while lap and pit
//! analyses look at one car's stint at a time.

use super::stats;
use crate::tables::{ConstructorId, DriverId, PitStopRow, QualifyingRow, RaceRow, ResultRow, SeasonFilter, TableStore};

/// Pit stops longer than this are red-flag stoppages or repairs, not service stops.
pub const MAX_PIT_STOP_SECONDS: f64 = 60.0;

/// A constructor's cars in one race.
#[derive(Debug)]
pub struct TeamRace<'a> {
    pub race: &'a RaceRow,
    pub cars: Vec<&'a ResultRow>,
}

impl TeamRace<'_> {
    #[must_use]
    pub fn best_position(&self) -> Option<u8> {
        self.cars.iter().filter_map(|r| r.position).min()
    }

    #[must_use]
    pub fn points(&self) -> f64 {
        self.cars.iter().map(|r| r.points).sum()
    }

    #[must_use]
    pub fn podium_cars(&self) -> usize {
        self.cars.iter().filter(|r| r.is_podium()).count()
    }

    #[must_use]
    pub fn won(&self) -> bool {
        self.cars.iter().any(|r| r.is_win())
    }
}

/// A constructor's cars in one qualifying session.
#[derive(Debug)]
pub struct TeamSession<'a> {
    pub race: &'a RaceRow,
    pub cars: Vec<&'a QualifyingRow>,
}

impl TeamSession<'_> {
    #[must_use]
    pub fn best_position(&self) -> Option<u8> {
        self.cars.iter().filter_map(|q| q.position).min()
    }
}

/// Lap times of one car in one race, in lap order.
#[derive(Debug)]
pub struct Stint<'a> {
    pub race: &'a RaceRow,
    pub driver: DriverId,
    pub laps: Vec<(u16, f64)>,
}

impl Stint<'_> {
    #[must_use]
    pub fn times(&self) -> Vec<f64> {
        self.laps.iter().map(|(_, t)| *t).collect()
    }
}

/// Pit stops of a constructor's cars in one race.
#[derive(Debug)]
pub struct TeamStops<'a> {
    pub race: &'a RaceRow,
    pub stops: Vec<&'a PitStopRow>,
}

impl TeamStops<'_> {
    /// Durations of the service stops, in stop order.
    #[must_use]
    pub fn durations(&self) -> Vec<f64> {
        self.stops.iter().filter_map(|s| s.seconds()).filter(|d| *d <= MAX_PIT_STOP_SECONDS).collect()
    }
}

/// Groups a constructor's results by race, oldest first.
#[must_use]
pub fn team_races(tables: &TableStore, constructor: ConstructorId, filter: SeasonFilter) -> Vec<TeamRace<'_>> {
    let mut races: Vec<TeamRace<'_>> = Vec::new();
    for (race, result) in tables.join_races(tables.results_for_constructor(constructor, filter)) {
        match races.last_mut() {
            Some(last) if last.race.id == race.id => last.cars.push(result),
            _ => races.push(TeamRace { race, cars: vec![result] }),
        }
    }

    races
}

/// Groups a constructor's qualifying results by race, oldest first.
#[must_use]
pub fn team_sessions(tables: &TableStore, constructor: ConstructorId, filter: SeasonFilter) -> Vec<TeamSession<'_>> {
    let mut sessions: Vec<TeamSession<'_>> = Vec::new();
    for (race, row) in tables.join_races(tables.qualifying_for_constructor(constructor, filter)) {
        match sessions.last_mut() {
            Some(last) if last.race.id == race.id => last.cars.push(row),
            _ => sessions.push(TeamSession { race, cars: vec![row] }),
        }
    }

    sessions
}

fn stints_in_race<'a>(tables: &'a TableStore, race: &'a RaceRow, keep: impl Fn(DriverId) -> bool) -> Vec<Stint<'a>> {
    let mut stints: Vec<Stint<'a>> = Vec::new();
    for lap in tables.lap_times_for_race(race.id).filter(|l| keep(l.driver_id)) {
        match stints.last_mut() {
            Some(last) if last.driver == lap.driver_id => last.laps.push((lap.lap, lap.seconds())),
            _ => stints.push(Stint {
                race,
                driver: lap.driver_id,
                laps: vec![(lap.lap, lap.seconds())],
            }),
        }
    }

    stints
}

/// Every lap stint driven by a driver, oldest race first.
#[must_use]
pub fn driver_stints(tables: &TableStore, driver: DriverId, filter: SeasonFilter) -> Vec<Stint<'_>> {
    tables
        .join_races(tables.results_for_driver(driver, filter))
        .flat_map(|(race, _)| stints_in_race(tables, race, |d| d == driver))
        .collect()
}

/// Every lap stint driven in a constructor's cars, oldest race first.
#[must_use]
pub fn team_stints(tables: &TableStore, constructor: ConstructorId, filter: SeasonFilter) -> Vec<Stint<'_>> {
    team_races(tables, constructor, filter)
        .into_iter()
        .flat_map(|team_race| {
            let drivers: Vec<DriverId> = team_race.cars.iter().map(|r| r.driver_id).collect();
            stints_in_race(tables, team_race.race, move |d| drivers.contains(&d))
        })
        .collect()
}

/// Pit stops made by a constructor's cars, grouped by race. Races without stops are omitted.
#[must_use]
pub fn team_pit_stops(tables: &TableStore, constructor: ConstructorId, filter: SeasonFilter) -> Vec<TeamStops<'_>> {
    team_races(tables, constructor, filter)
        .into_iter()
        .filter_map(|team_race| {
            let stops: Vec<&PitStopRow> = tables
                .join_results(tables.pit_stops_for_race(team_race.race.id))
                .filter(|(result, _)| result.constructor_id == constructor)
                .map(|(_, stop)| stop)
                .collect();

            (!stops.is_empty()).then_some(TeamStops { race: team_race.race, stops })
        })
        .collect()
}

/// Mean lap time of every car in a race.
#[must_use]
pub fn race_field_lap_mean(tables: &TableStore, race: &RaceRow) -> Option<f64> {
    let times: Vec<f64> = tables.lap_times_for_race(race.id).map(crate::tables::LapTimeRow::seconds).collect();
    stats::mean(&times)
}

/// Mean service-stop duration of every car in a race.
#[must_use]
pub fn race_field_pit_mean(tables: &TableStore, race: &RaceRow) -> Option<f64> {
    let durations: Vec<f64> = tables
        .pit_stops_for_race(race.id)
        .filter_map(PitStopRow::seconds)
        .filter(|d| *d <= MAX_PIT_STOP_SECONDS)
        .collect();
    stats::mean(&durations)
}
