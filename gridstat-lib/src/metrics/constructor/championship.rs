use crate::metrics::standings::{Standing, constructor_standings, seasons_of};
use crate::metrics::stats::mean;
use crate::metrics::views::team_races;
use crate::metrics::Measurement;
use crate::tables::{ConstructorId, SeasonFilter, TableStore};

fn seasons(tables: &TableStore, constructor: ConstructorId, season: SeasonFilter) -> Vec<(u16, Standing<ConstructorId>)> {
    seasons_of(tables, season, constructor, constructor_standings)
}

pub fn position(tables: &TableStore, constructor: ConstructorId, season: SeasonFilter) -> Measurement {
    let seasons = seasons(tables, constructor, season);
    seasons.iter().min_by_key(|(year, s)| (s.position, *year)).map_or_else(
        || Measurement::insufficient(0, "no seasons contested"),
        |(year, standing)| {
            Measurement::count(u64::from(standing.position), seasons.len())
                .with("season", u64::from(*year))
                .with("points", standing.points)
        },
    )
}

fn seasons_within(tables: &TableStore, constructor: ConstructorId, season: SeasonFilter, top: u32) -> Measurement {
    let seasons = seasons(tables, constructor, season);
    let years: Vec<u64> = seasons
        .iter()
        .filter(|(_, s)| s.position <= top)
        .map(|(year, _)| u64::from(*year))
        .collect();

    Measurement::count(years.len() as u64, seasons.len()).with("seasons", years)
}

pub fn championship_wins(tables: &TableStore, constructor: ConstructorId, season: SeasonFilter) -> Measurement {
    seasons_within(tables, constructor, season, 1)
}

pub fn top_three_finishes(tables: &TableStore, constructor: ConstructorId, season: SeasonFilter) -> Measurement {
    seasons_within(tables, constructor, season, 3)
}

pub fn points_per_season(tables: &TableStore, constructor: ConstructorId, season: SeasonFilter) -> Measurement {
    let totals: Vec<f64> = seasons(tables, constructor, season).iter().map(|(_, s)| s.points).collect();
    mean(&totals).map_or_else(
        || Measurement::insufficient(0, "no seasons contested"),
        |avg| Measurement::float(avg, totals.len()).with("total_points", totals.iter().sum::<f64>()),
    )
}

pub fn points_per_race(tables: &TableStore, constructor: ConstructorId, season: SeasonFilter) -> Measurement {
    let points: Vec<f64> = team_races(tables, constructor, season).iter().map(|r| r.points()).collect();
    Measurement::mean_of(&points, "no races entered")
}
