use crate::metrics::standings::constructor_standings;
use crate::metrics::stats::{coefficient_of_variation, count_f64, linear_slope, mean, percentile, ratio};
use crate::metrics::views::{TeamRace, team_races};
use crate::metrics::Measurement;
use crate::tables::{ConstructorId, SeasonFilter, TableStore};

/// Most points a single car can score in a race, used to scale dominance.
const MAX_POINTS_PER_RACE: f64 = 44.0;

fn race_points(races: &[TeamRace<'_>]) -> Vec<f64> {
    races.iter().map(TeamRace::points).collect()
}

pub fn season_dominance(tables: &TableStore, constructor: ConstructorId, season: SeasonFilter) -> Measurement {
    let Some(year) = season.season() else {
        return Measurement::insufficient(0, "only defined for a single season");
    };

    let races = team_races(tables, constructor, season);
    let Some(win_rate) = ratio(races.iter().filter(|r| r.won()).count(), races.len()) else {
        return Measurement::insufficient(0, "no races entered");
    };

    let points: f64 = race_points(&races).iter().sum();
    let points_share = points / (count_f64(races.len()) * MAX_POINTS_PER_RACE);

    let standing = constructor_standings(tables, year).into_iter().find(|s| s.id == constructor);
    let position = standing.as_ref().map_or(0, |s| s.position);
    let position_score = (1.0 - f64::from(position.saturating_sub(1)) * 0.2).max(0.0);

    Measurement::float(0.4 * win_rate + 0.35 * points_share.min(1.0) + 0.25 * position_score, races.len())
        .with("win_rate", win_rate)
        .with("points_share", points_share)
        .with("championship_position", u64::from(position))
}

pub fn consistency_index(tables: &TableStore, constructor: ConstructorId, season: SeasonFilter) -> Measurement {
    let points = race_points(&team_races(tables, constructor, season));
    if let Err(m) = Measurement::require(points.len(), 3, "races") {
        return m;
    }

    // a team that never scores has no consistency to speak of
    let index = coefficient_of_variation(&points).map_or(0.0, |cv| (1.0 - cv).max(0.0));
    let scoreless = points.iter().filter(|p| **p == 0.0).count();
    Measurement::float(index, points.len()).with("scoreless_races", scoreless)
}

pub fn competitiveness_rating(tables: &TableStore, constructor: ConstructorId, season: SeasonFilter) -> Measurement {
    let races = team_races(tables, constructor, season);
    let Some(avg_points) = mean(&race_points(&races)) else {
        return Measurement::insufficient(0, "no races entered");
    };

    let best = races.iter().filter_map(TeamRace::best_position).min();
    let position_rating = best.map_or(0.0, |b| (1.0 - f64::from(b - 1) * 0.05).max(0.0));
    let podium_rate = ratio(races.iter().filter(|r| r.podium_cars() > 0).count(), races.len()).unwrap_or_default();
    let win_rate = ratio(races.iter().filter(|r| r.won()).count(), races.len()).unwrap_or_default();
    let points_rating = (avg_points / 25.0).min(1.0);

    Measurement::float(
        0.35 * points_rating + 0.25 * position_rating + 0.25 * podium_rate + 0.15 * win_rate,
        races.len(),
    )
    .with("points_rating", points_rating)
    .with("position_rating", position_rating)
    .with("podium_rate", podium_rate)
    .with("win_rate", win_rate)
}

/// Spread of race points measured by the interquartile range, relative to the mean.
pub fn performance_consistency(tables: &TableStore, constructor: ConstructorId, season: SeasonFilter) -> Measurement {
    let points = race_points(&team_races(tables, constructor, season));
    if let Err(m) = Measurement::require(points.len(), 3, "races") {
        return m;
    }

    let (Some(q1), Some(q3), Some(avg)) = (percentile(&points, 0.25), percentile(&points, 0.75), mean(&points)) else {
        return Measurement::insufficient(points.len(), "no races entered");
    };

    let min = points.iter().copied().fold(f64::INFINITY, f64::min);
    let max = points.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let iqr = q3 - q1;

    let score = if max - min == 0.0 {
        1.0
    } else if avg > 0.0 {
        (1.0 - iqr / avg * 0.5).max(0.0)
    } else {
        0.0
    };

    Measurement::float(score, points.len()).with("iqr", iqr)
}

pub fn win_streak(tables: &TableStore, constructor: ConstructorId, season: SeasonFilter) -> Measurement {
    let races = team_races(tables, constructor, season);
    let mut longest = 0_u64;
    let mut current = 0_u64;
    let mut wins = 0_u64;

    for race in &races {
        if race.won() {
            current += 1;
            wins += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }

    Measurement::count(longest, races.len()).with("total_wins", wins)
}

/// Trend of race points through a season, in points per race.
pub fn seasonal_improvement(tables: &TableStore, constructor: ConstructorId, season: SeasonFilter) -> Measurement {
    if season.season().is_none() {
        return Measurement::insufficient(0, "only defined for a single season");
    }

    let points = race_points(&team_races(tables, constructor, season));
    if let Err(m) = Measurement::require(points.len(), 5, "races") {
        return m;
    }

    linear_slope(&points).map_or_else(
        || Measurement::insufficient(points.len(), "no trend in the available races"),
        |slope| Measurement::float(slope, points.len()),
    )
}
