use crate::metrics::stats::{mean, population_std, ratio};
use crate::metrics::Measurement;
use crate::tables::{DriverId, SeasonFilter, TableStore};

fn positions(tables: &TableStore, driver: DriverId, season: SeasonFilter) -> Vec<u8> {
    tables.qualifying_for_driver(driver, season).filter_map(|q| q.position).collect()
}

fn as_f64(positions: &[u8]) -> Vec<f64> {
    positions.iter().map(|p| f64::from(*p)).collect()
}

pub fn position_average(tables: &TableStore, driver: DriverId, season: SeasonFilter) -> Measurement {
    let positions = positions(tables, driver, season);
    let Some(avg) = mean(&as_f64(&positions)) else {
        return Measurement::insufficient(0, "no classified qualifying sessions");
    };

    let best = positions.iter().copied().min().map_or(0, u64::from);
    Measurement::float(avg, positions.len()).with("best_position", best)
}

pub fn consistency(tables: &TableStore, driver: DriverId, season: SeasonFilter) -> Measurement {
    let positions = as_f64(&positions(tables, driver, season));
    if let Err(m) = Measurement::require(positions.len(), 2, "qualifying sessions") {
        return m;
    }

    population_std(&positions).map_or_else(
        || Measurement::insufficient(positions.len(), "no qualifying sessions"),
        |sd| Measurement::float(sd, positions.len()),
    )
}

fn rate_within(tables: &TableStore, driver: DriverId, season: SeasonFilter, top: u8) -> Measurement {
    let positions = positions(tables, driver, season);
    let hits = positions.iter().filter(|p| **p <= top).count();

    ratio(hits, positions.len()).map_or_else(
        || Measurement::insufficient(0, "no classified qualifying sessions"),
        |rate| Measurement::float(rate, positions.len()).with("sessions_within", hits),
    )
}

pub fn pole_rate(tables: &TableStore, driver: DriverId, season: SeasonFilter) -> Measurement {
    rate_within(tables, driver, season, 1)
}

pub fn front_row_rate(tables: &TableStore, driver: DriverId, season: SeasonFilter) -> Measurement {
    rate_within(tables, driver, season, 2)
}

pub fn top_ten_rate(tables: &TableStore, driver: DriverId, season: SeasonFilter) -> Measurement {
    rate_within(tables, driver, season, 10)
}
