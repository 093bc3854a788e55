use crate::metrics::standings::{driver_standings, seasons_of};
use crate::metrics::stats::mean;
use crate::metrics::Measurement;
use crate::tables::{DriverId, SeasonFilter, TableStore};

/// Final standing for a season; for a career, the best standing across seasons.
pub fn position(tables: &TableStore, driver: DriverId, season: SeasonFilter) -> Measurement {
    let seasons = seasons_of(tables, season, driver, driver_standings);

    // earliest season wins a tie for best standing
    let best = seasons.iter().min_by_key(|(year, s)| (s.position, *year));
    best.map_or_else(
        || Measurement::insufficient(0, "no seasons contested"),
        |(year, standing)| {
            Measurement::count(u64::from(standing.position), seasons.len())
                .with("season", u64::from(*year))
                .with("points", standing.points)
                .with("wins", u64::from(standing.wins))
        },
    )
}

pub fn points_per_season(tables: &TableStore, driver: DriverId, season: SeasonFilter) -> Measurement {
    let seasons = seasons_of(tables, season, driver, driver_standings);
    let totals: Vec<f64> = seasons.iter().map(|(_, s)| s.points).collect();

    mean(&totals).map_or_else(
        || Measurement::insufficient(0, "no seasons contested"),
        |avg| Measurement::float(avg, totals.len()).with("total_points", totals.iter().sum::<f64>()),
    )
}
