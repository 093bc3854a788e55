use crate::metrics::stats::{mean, population_std, without_outliers};
use crate::metrics::views::{MAX_PIT_STOP_SECONDS, driver_stints};
use crate::metrics::Measurement;
use crate::tables::{DriverId, SeasonFilter, TableStore};

fn lap_times(tables: &TableStore, driver: DriverId, season: SeasonFilter) -> Vec<f64> {
    driver_stints(tables, driver, season).iter().flat_map(|s| s.times()).collect()
}

pub fn average_lap_time(tables: &TableStore, driver: DriverId, season: SeasonFilter) -> Measurement {
    let laps = lap_times(tables, driver, season);
    mean(&laps).map_or_else(
        || Measurement::insufficient(0, "no timed laps"),
        |avg| Measurement::float(avg, laps.len()),
    )
}

pub fn lap_time_consistency(tables: &TableStore, driver: DriverId, season: SeasonFilter) -> Measurement {
    let laps = lap_times(tables, driver, season);
    if let Err(m) = Measurement::require(laps.len(), 10, "timed laps") {
        return m;
    }

    let kept = without_outliers(&laps);
    population_std(&kept).map_or_else(
        || Measurement::insufficient(laps.len(), "no timed laps"),
        |sd| Measurement::float(sd, kept.len()).with("outliers_removed", laps.len() - kept.len()),
    )
}

pub fn average_pit_stop_time(tables: &TableStore, driver: DriverId, season: SeasonFilter) -> Measurement {
    let mut durations = Vec::new();
    let mut excluded = 0_usize;

    for (race, _) in tables.join_races(tables.results_for_driver(driver, season)) {
        for stop in tables.pit_stops_for_race(race.id).filter(|p| p.driver_id == driver) {
            match stop.seconds() {
                Some(d) if d <= MAX_PIT_STOP_SECONDS => durations.push(d),
                _ => excluded += 1,
            }
        }
    }

    mean(&durations).map_or_else(
        || Measurement::insufficient(0, "no timed pit stops"),
        |avg| Measurement::float(avg, durations.len()).with("excluded_stops", excluded),
    )
}
