use crate::metrics::stats::{mean, ratio};
use crate::metrics::Measurement;
use crate::tables::{DriverId, ResultRow, SeasonFilter, TableStore};

fn entries<'a>(tables: &'a TableStore, driver: DriverId, season: SeasonFilter) -> Vec<&'a ResultRow> {
    tables.results_for_driver(driver, season).collect()
}

fn no_entries() -> Measurement {
    Measurement::insufficient(0, "no race entries")
}

pub fn average_finish(tables: &TableStore, driver: DriverId, season: SeasonFilter) -> Measurement {
    let entries = entries(tables, driver, season);
    let positions: Vec<f64> = entries.iter().filter_map(|r| r.position).map(f64::from).collect();

    let Some(avg) = mean(&positions) else {
        return Measurement::insufficient(0, "no classified finishes");
    };

    let best = entries.iter().filter_map(|r| r.position).min().map_or(0, u64::from);
    let worst = entries.iter().filter_map(|r| r.position).max().map_or(0, u64::from);
    Measurement::float(avg, positions.len())
        .with("best_finish", best)
        .with("worst_finish", worst)
        .with("entries", entries.len())
}

pub fn points_per_race(tables: &TableStore, driver: DriverId, season: SeasonFilter) -> Measurement {
    let points: Vec<f64> = tables.results_for_driver(driver, season).map(|r| r.points).collect();
    mean(&points).map_or_else(no_entries, |avg| {
        Measurement::float(avg, points.len()).with("total_points", points.iter().sum::<f64>())
    })
}

/// Podiums over classified finishes. A DNF is not a chance at the podium.
pub fn podium_rate(tables: &TableStore, driver: DriverId, season: SeasonFilter) -> Measurement {
    let entries = entries(tables, driver, season);
    let classified = entries.iter().filter(|r| r.is_classified()).count();
    let count_at = |p: u8| entries.iter().filter(|r| r.position == Some(p)).count();
    let podiums = entries.iter().filter(|r| r.is_podium()).count();

    ratio(podiums, classified).map_or_else(
        || Measurement::insufficient(0, "no classified finishes"),
        |rate| {
            Measurement::float(rate, classified)
                .with("podiums", podiums)
                .with("wins", count_at(1))
                .with("seconds", count_at(2))
                .with("thirds", count_at(3))
        },
    )
}

fn entry_rate(tables: &TableStore, driver: DriverId, season: SeasonFilter, hit: impl Fn(&ResultRow) -> bool) -> Measurement {
    let entries = entries(tables, driver, season);
    let hits = entries.iter().filter(|&&r| hit(r)).count();
    ratio(hits, entries.len()).map_or_else(no_entries, |rate| Measurement::float(rate, entries.len()).with("count", hits))
}

pub fn win_rate(tables: &TableStore, driver: DriverId, season: SeasonFilter) -> Measurement {
    entry_rate(tables, driver, season, ResultRow::is_win)
}

pub fn points_finish_rate(tables: &TableStore, driver: DriverId, season: SeasonFilter) -> Measurement {
    entry_rate(tables, driver, season, ResultRow::scored_points)
}

pub fn fastest_lap_rate(tables: &TableStore, driver: DriverId, season: SeasonFilter) -> Measurement {
    entry_rate(tables, driver, season, |r| r.fastest_lap_rank == Some(1))
}

pub fn average_grid(tables: &TableStore, driver: DriverId, season: SeasonFilter) -> Measurement {
    let entries = entries(tables, driver, season);
    let grid: Vec<f64> = entries.iter().filter_map(|r| r.grid).map(f64::from).collect();
    let pit_lane_starts = entries.len() - grid.len();

    mean(&grid).map_or_else(
        || Measurement::insufficient(0, "no grid starts"),
        |avg| Measurement::float(avg, grid.len()).with("pit_lane_starts", pit_lane_starts),
    )
}

pub fn positions_gained(tables: &TableStore, driver: DriverId, season: SeasonFilter) -> Measurement {
    let gains: Vec<f64> = tables
        .results_for_driver(driver, season)
        .filter_map(|r| Some(f64::from(r.grid?) - f64::from(r.position?)))
        .collect();

    let best = gains.iter().copied().reduce(f64::max);
    mean(&gains).map_or_else(
        || Measurement::insufficient(0, "no classified finishes from a grid slot"),
        |avg| Measurement::float(avg, gains.len()).with("best_gain", best.unwrap_or_default()),
    )
}
