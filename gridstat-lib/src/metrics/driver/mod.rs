//! Driver metrics
//!
//! Names are bare (`podium_rate`, `dnf_rate`). Every metric reads results through the
//! store's driver index, so DNFs are always visible and each metric decides whether
//! they count.

mod championship;
mod qualifying;
mod race;
mod reliability;
mod teammate;
mod telemetry;

use super::{MetricDef, metric_def};

pub const DRIVER_METRICS: &[MetricDef] = &[
    metric_def!(
        "qualifying_position_average",
        "Average qualifying position",
        Qualifying,
        Position,
        LowerIsBetter,
        [Races, Qualifying],
        Driver(qualifying::position_average)
    ),
    metric_def!(
        "qualifying_consistency",
        "Standard deviation of qualifying positions",
        Qualifying,
        Position,
        LowerIsBetter,
        [Races, Qualifying],
        Driver(qualifying::consistency)
    ),
    metric_def!(
        "pole_position_rate",
        "Share of qualifying sessions finished on pole",
        Qualifying,
        Fraction,
        HigherIsBetter,
        [Races, Qualifying],
        Driver(qualifying::pole_rate)
    ),
    metric_def!(
        "front_row_rate",
        "Share of qualifying sessions finished on the front row",
        Qualifying,
        Fraction,
        HigherIsBetter,
        [Races, Qualifying],
        Driver(qualifying::front_row_rate)
    ),
    metric_def!(
        "top_ten_qualifying_rate",
        "Share of qualifying sessions finished in the top ten",
        Qualifying,
        Fraction,
        HigherIsBetter,
        [Races, Qualifying],
        Driver(qualifying::top_ten_rate)
    ),
    metric_def!(
        "average_finish_position",
        "Average race finish position, DNFs excluded",
        Race,
        Position,
        LowerIsBetter,
        [Races, Results],
        Driver(race::average_finish)
    ),
    metric_def!(
        "points_per_race",
        "Average championship points per race entered",
        Race,
        Points,
        HigherIsBetter,
        [Races, Results],
        Driver(race::points_per_race)
    ),
    metric_def!(
        "podium_rate",
        "Share of classified finishes on the podium",
        Race,
        Fraction,
        HigherIsBetter,
        [Races, Results],
        Driver(race::podium_rate)
    ),
    metric_def!(
        "win_rate",
        "Share of races entered that were won",
        Race,
        Fraction,
        HigherIsBetter,
        [Races, Results],
        Driver(race::win_rate)
    ),
    metric_def!(
        "points_finish_rate",
        "Share of races entered that scored points",
        Race,
        Fraction,
        HigherIsBetter,
        [Races, Results],
        Driver(race::points_finish_rate)
    ),
    metric_def!(
        "average_grid_position",
        "Average starting grid slot, pit-lane starts excluded",
        Race,
        Position,
        LowerIsBetter,
        [Races, Results],
        Driver(race::average_grid)
    ),
    metric_def!(
        "positions_gained",
        "Average places gained from grid to flag in classified finishes",
        Race,
        Positions,
        HigherIsBetter,
        [Races, Results],
        Driver(race::positions_gained)
    ),
    metric_def!(
        "fastest_lap_rate",
        "Share of races entered with the fastest lap",
        Race,
        Fraction,
        HigherIsBetter,
        [Races, Results],
        Driver(race::fastest_lap_rate)
    ),
    metric_def!(
        "dnf_rate",
        "Share of races entered that ended unclassified",
        Reliability,
        Fraction,
        LowerIsBetter,
        [Races, Results, Status],
        Driver(reliability::dnf_rate)
    ),
    metric_def!(
        "finish_rate",
        "Share of races entered that ended classified",
        Reliability,
        Fraction,
        HigherIsBetter,
        [Races, Results],
        Driver(reliability::finish_rate)
    ),
    metric_def!(
        "mechanical_failure_rate",
        "Share of races entered lost to a mechanical failure",
        Reliability,
        Fraction,
        LowerIsBetter,
        [Races, Results, Status],
        Driver(reliability::mechanical_failure_rate)
    ),
    metric_def!(
        "teammate_qualifying_comparison",
        "Share of qualifying head-to-heads won against teammates",
        Teammate,
        Fraction,
        HigherIsBetter,
        [Races, Qualifying, Drivers],
        Driver(teammate::qualifying_comparison)
    ),
    metric_def!(
        "teammate_race_comparison",
        "Share of race head-to-heads won against teammates",
        Teammate,
        Fraction,
        HigherIsBetter,
        [Races, Results, Drivers],
        Driver(teammate::race_comparison)
    ),
    metric_def!(
        "championship_position",
        "Final championship standing, or the best one over a career",
        Championship,
        Position,
        LowerIsBetter,
        [Races, Results],
        Driver(championship::position)
    ),
    metric_def!(
        "points_per_season",
        "Average championship points per season contested",
        Championship,
        Points,
        HigherIsBetter,
        [Races, Results],
        Driver(championship::points_per_season)
    ),
    metric_def!(
        "average_lap_time",
        "Average race lap time",
        LapPerformance,
        Seconds,
        LowerIsBetter,
        [Races, Results, LapTimes],
        Driver(telemetry::average_lap_time)
    ),
    metric_def!(
        "lap_time_consistency",
        "Standard deviation of race lap times after outlier removal",
        LapPerformance,
        Seconds,
        LowerIsBetter,
        [Races, Results, LapTimes],
        Driver(telemetry::lap_time_consistency)
    ),
    metric_def!(
        "average_pit_stop_time",
        "Average pit stop duration, stops over a minute excluded",
        PitStops,
        Seconds,
        LowerIsBetter,
        [Races, Results, PitStops],
        Driver(telemetry::average_pit_stop_time)
    ),
];

#[cfg(test)]
mod tests {
    use crate::metrics::Measurement;
    use crate::tables::{DriverId, SeasonFilter, TableStore, TableStoreBuilder};

    fn value(m: &Measurement) -> f64 {
        m.expect_f64()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    /// Two seasons. Driver 3 moves from constructor 2 to constructor 1 in round 3 of 2021,
    /// replacing driver 2.
    fn store() -> TableStore {
        TableStoreBuilder::new("v")
            .race(1, 2021, 1)
            .race(2, 2021, 2)
            .race(3, 2021, 3)
            .race(4, 2022, 1)
            .driver(1, "AAA", "Alpha")
            .driver(2, "BBB", "Bravo")
            .driver(3, "CCC", "Charlie")
            .driver(4, "DDD", "Delta")
            .constructor(1, "One")
            .constructor(2, "Two")
            .result(1, 1, 1, Some(1), Some(1), 25.0, 1)
            .result(1, 2, 1, Some(3), Some(3), 15.0, 1)
            .result(1, 3, 2, Some(2), Some(2), 18.0, 1)
            .result(1, 4, 2, Some(4), None, 0.0, 5)
            .result(2, 1, 1, Some(2), None, 0.0, 3)
            .result(2, 2, 1, Some(1), Some(1), 25.0, 1)
            .result(2, 3, 2, None, Some(2), 18.0, 1)
            .result(2, 4, 2, Some(3), Some(3), 15.0, 11)
            .result(3, 1, 1, Some(2), Some(2), 18.0, 1)
            .result(3, 3, 1, Some(1), Some(1), 25.0, 1)
            .result(3, 4, 2, Some(3), Some(3), 15.0, 1)
            .result(4, 1, 1, Some(1), Some(1), 25.0, 1)
            .result(4, 3, 1, Some(2), Some(2), 18.0, 1)
            .qualifying(1, 1, 1, Some(1))
            .qualifying(1, 3, 2, Some(2))
            .qualifying(1, 2, 1, Some(3))
            .qualifying(3, 3, 1, Some(1))
            .qualifying(3, 1, 1, Some(2))
            .build()
    }

    #[test]
    fn test_finish_and_podium_exclude_dnfs() {
        let store = store();
        let d = DriverId(1);
        let s = SeasonFilter::Season(2021);

        // 1st, DNF, 2nd
        assert!(close(value(&super::race::average_finish(&store, d, s)), 1.5));
        assert!(close(value(&super::race::podium_rate(&store, d, s)), 1.0));
        assert!(close(value(&super::race::win_rate(&store, d, s)), 1.0 / 3.0));
        assert!(close(value(&super::reliability::dnf_rate(&store, d, s)), 1.0 / 3.0));
        assert!(close(value(&super::reliability::finish_rate(&store, d, s)), 2.0 / 3.0));
        assert!(close(value(&super::reliability::mechanical_failure_rate(&store, d, s)), 0.0));
        assert_eq!(super::race::podium_rate(&store, d, s).sample_size(), 2);
    }

    #[test]
    fn test_mechanical_failure() {
        let store = store();
        let m = super::reliability::mechanical_failure_rate(&store, DriverId(4), SeasonFilter::Career);
        assert!(close(value(&m), 1.0 / 3.0));
    }

    #[test]
    fn test_grid_and_gains_skip_pit_lane_starts() {
        let store = store();
        let d = DriverId(3);
        let s = SeasonFilter::Season(2021);
        assert!(close(value(&super::race::average_grid(&store, d, s)), 1.5));
        // race 1: 2 -> 2, race 3: 1 -> 1, race 2 started from the pit lane
        assert!(close(value(&super::race::positions_gained(&store, d, s)), 0.0));
    }

    #[test]
    fn test_teammates_follow_team_switch() {
        let store = store();
        let m = super::teammate::race_comparison(&store, DriverId(3), SeasonFilter::Season(2021));
        // races 1-2 against driver 4 (ahead twice), race 3 against driver 1 (ahead)
        assert!(close(value(&m), 1.0));
        let Measurement::Value { metadata, sample_size, .. } = m else {
            panic!("expected a value");
        };
        assert_eq!(sample_size, 3);
        let Some(crate::metrics::MetaValue::Map(teammates)) = metadata.get("teammates") else {
            panic!("missing breakdown");
        };
        assert_eq!(teammates.len(), 2);
    }

    #[test]
    fn test_teammate_race_dnf_rules() {
        let store = store();
        // race 1: ahead of 2; race 2: DNF vs winner; race 3: behind 3; 2022: ahead of 3
        let m = super::teammate::race_comparison(&store, DriverId(1), SeasonFilter::Career);
        assert!(close(value(&m), 0.5));
    }

    #[test]
    fn test_teammate_qualifying() {
        let store = store();
        let m = super::teammate::qualifying_comparison(&store, DriverId(1), SeasonFilter::Career);
        // ahead of 2 in race 1, behind 3 in race 3
        assert!(close(value(&m), 0.5));
    }

    #[test]
    fn test_qualifying_rates() {
        let store = store();
        let d = DriverId(1);
        let s = SeasonFilter::Career;
        assert!(close(value(&super::qualifying::position_average(&store, d, s)), 1.5));
        assert!(close(value(&super::qualifying::pole_rate(&store, d, s)), 0.5));
        assert!(close(value(&super::qualifying::front_row_rate(&store, d, s)), 1.0));
        assert!(close(value(&super::qualifying::consistency(&store, d, s)), 0.5));
    }

    #[test]
    fn test_consistency_needs_two_sessions() {
        let store = store();
        let m = super::qualifying::consistency(&store, DriverId(2), SeasonFilter::Career);
        assert!(matches!(m, Measurement::Insufficient { sample_size: 1, .. }));
    }

    #[test]
    fn test_championship() {
        let store = store();
        // 2021 totals: driver 1 = 43, driver 3 = 61, driver 2 = 40, driver 4 = 30
        let season = super::championship::position(&store, DriverId(1), SeasonFilter::Season(2021));
        assert!(close(value(&season), 2.0));
        let career = super::championship::position(&store, DriverId(1), SeasonFilter::Career);
        assert!(close(value(&career), 1.0));
        let avg = super::championship::points_per_season(&store, DriverId(1), SeasonFilter::Career);
        assert!(close(value(&avg), 34.0));
    }

    #[test]
    fn test_unknown_driver_is_insufficient() {
        let store = store();
        let m = super::race::points_per_race(&store, DriverId(99), SeasonFilter::Career);
        assert!(matches!(m, Measurement::Insufficient { sample_size: 0, .. }));
    }

    #[test]
    fn test_lap_consistency_needs_ten_laps() {
        let mut builder = TableStoreBuilder::new("v")
            .race(1, 2021, 1)
            .driver(1, "AAA", "Alpha")
            .constructor(1, "One")
            .result(1, 1, 1, Some(1), Some(1), 25.0, 1);
        for lap in 1..=10 {
            builder = builder.lap(1, 1, lap, if lap % 2 == 0 { 91_000 } else { 90_000 });
        }
        let store = builder.build();

        let m = super::telemetry::lap_time_consistency(&store, DriverId(1), SeasonFilter::Career);
        assert!(close(value(&m), 0.5));
        let short = super::telemetry::lap_time_consistency(&store, DriverId(2), SeasonFilter::Career);
        assert!(matches!(short, Measurement::Insufficient { .. }));
    }
}
