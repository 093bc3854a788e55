//! Constructor metrics
//!
//! Names carry a `constructor_` prefix. A constructor is judged on all of its cars: race
//! metrics group results per race, while lap and pit analyses work one car stint at a
//! time and then aggregate.

mod championship;
mod competitiveness;
mod lap_performance;
mod pit_stops;
mod qualifying;
mod race_performance;
mod reliability;

use super::{MetricDef, metric_def};

pub const CONSTRUCTOR_METRICS: &[MetricDef] = &[
    metric_def!(
        "constructor_win_rate",
        "Share of races entered that the team won",
        Race,
        Fraction,
        HigherIsBetter,
        [Races, Results],
        Constructor(race_performance::win_rate)
    ),
    metric_def!(
        "constructor_podium_rate",
        "Share of races entered with a car on the podium",
        Race,
        Fraction,
        HigherIsBetter,
        [Races, Results],
        Constructor(race_performance::podium_rate)
    ),
    metric_def!(
        "constructor_race_wins",
        "Races finished first and second",
        Race,
        Count,
        HigherIsBetter,
        [Races, Results],
        Constructor(race_performance::one_two_finishes)
    ),
    metric_def!(
        "constructor_podium_lockouts",
        "Races won with a second car also on the podium",
        Race,
        Count,
        HigherIsBetter,
        [Races, Results],
        Constructor(race_performance::podium_lockouts)
    ),
    metric_def!(
        "constructor_average_finish_position",
        "Average finish position of the team's best classified car",
        Race,
        Position,
        LowerIsBetter,
        [Races, Results],
        Constructor(race_performance::average_finish)
    ),
    metric_def!(
        "constructor_points_scoring_rate",
        "Share of races entered in which the team scored",
        Race,
        Fraction,
        HigherIsBetter,
        [Races, Results],
        Constructor(race_performance::points_scoring_rate)
    ),
    metric_def!(
        "constructor_front_row_lockouts",
        "Qualifying sessions with both front-row slots taken",
        Race,
        Count,
        HigherIsBetter,
        [Races, Qualifying],
        Constructor(race_performance::front_row_lockouts)
    ),
    metric_def!(
        "constructor_double_podiums",
        "Races with at least two cars on the podium",
        Race,
        Count,
        HigherIsBetter,
        [Races, Results],
        Constructor(race_performance::double_podiums)
    ),
    metric_def!(
        "constructor_championship_position",
        "Final constructors' standing, or the best one over a career",
        Championship,
        Position,
        LowerIsBetter,
        [Races, Results],
        Constructor(championship::position)
    ),
    metric_def!(
        "constructor_championship_wins",
        "Seasons finished top of the constructors' standings",
        Championship,
        Count,
        HigherIsBetter,
        [Races, Results],
        Constructor(championship::championship_wins)
    ),
    metric_def!(
        "constructor_points_per_season",
        "Average points per season contested",
        Championship,
        Points,
        HigherIsBetter,
        [Races, Results],
        Constructor(championship::points_per_season)
    ),
    metric_def!(
        "constructor_points_per_race",
        "Average team points per race entered",
        Championship,
        Points,
        HigherIsBetter,
        [Races, Results],
        Constructor(championship::points_per_race)
    ),
    metric_def!(
        "constructor_top_three_finishes",
        "Seasons finished in the top three of the standings",
        Championship,
        Count,
        HigherIsBetter,
        [Races, Results],
        Constructor(championship::top_three_finishes)
    ),
    metric_def!(
        "constructor_dnf_rate",
        "Share of car entries that ended unclassified",
        Reliability,
        Fraction,
        LowerIsBetter,
        [Races, Results],
        Constructor(reliability::dnf_rate)
    ),
    metric_def!(
        "constructor_mechanical_failure_rate",
        "Share of car entries lost to a mechanical failure",
        Reliability,
        Fraction,
        LowerIsBetter,
        [Races, Results, Status],
        Constructor(reliability::mechanical_failure_rate)
    ),
    metric_def!(
        "constructor_finish_rate",
        "Share of races in which every car was classified",
        Reliability,
        Fraction,
        HigherIsBetter,
        [Races, Results],
        Constructor(reliability::finish_rate)
    ),
    metric_def!(
        "constructor_reliability_index",
        "Blend of finishing, scoring and top-fifteen finishing per entry",
        Reliability,
        Index,
        HigherIsBetter,
        [Races, Results],
        Constructor(reliability::reliability_index)
    ),
    metric_def!(
        "constructor_average_reliability",
        "Average of the per-season finish rates",
        Reliability,
        Fraction,
        HigherIsBetter,
        [Races, Results],
        Constructor(reliability::average_reliability)
    ),
    metric_def!(
        "constructor_season_dominance",
        "Blend of win rate, points share and standing within a season",
        Competitiveness,
        Index,
        HigherIsBetter,
        [Races, Results],
        Constructor(competitiveness::season_dominance)
    ),
    metric_def!(
        "constructor_consistency_index",
        "One minus the coefficient of variation of race points",
        Competitiveness,
        Index,
        HigherIsBetter,
        [Races, Results],
        Constructor(competitiveness::consistency_index)
    ),
    metric_def!(
        "constructor_competitiveness_rating",
        "Blend of points, best finish, podium rate and win rate",
        Competitiveness,
        Index,
        HigherIsBetter,
        [Races, Results],
        Constructor(competitiveness::competitiveness_rating)
    ),
    metric_def!(
        "constructor_performance_consistency",
        "Interquartile spread of race points relative to their mean",
        Competitiveness,
        Index,
        HigherIsBetter,
        [Races, Results],
        Constructor(competitiveness::performance_consistency)
    ),
    metric_def!(
        "constructor_race_win_streak",
        "Longest run of consecutive races won",
        Competitiveness,
        Count,
        HigherIsBetter,
        [Races, Results],
        Constructor(competitiveness::win_streak)
    ),
    metric_def!(
        "constructor_seasonal_improvement",
        "Trend of race points through a season",
        Competitiveness,
        PointsPerRace,
        HigherIsBetter,
        [Races, Results],
        Constructor(competitiveness::seasonal_improvement)
    ),
    metric_def!(
        "constructor_pole_position_rate",
        "Share of qualifying sessions with a car on pole",
        Qualifying,
        Fraction,
        HigherIsBetter,
        [Races, Qualifying],
        Constructor(qualifying::pole_rate)
    ),
    metric_def!(
        "constructor_average_qualifying_position",
        "Average qualifying position of the team's best car",
        Qualifying,
        Position,
        LowerIsBetter,
        [Races, Qualifying],
        Constructor(qualifying::average_position)
    ),
    metric_def!(
        "constructor_qualifying_consistency",
        "Standard deviation of the team's best qualifying position",
        Qualifying,
        Position,
        LowerIsBetter,
        [Races, Qualifying],
        Constructor(qualifying::consistency)
    ),
    metric_def!(
        "constructor_front_row_start_rate",
        "Share of qualifying sessions with a car on the front row",
        Qualifying,
        Fraction,
        HigherIsBetter,
        [Races, Qualifying],
        Constructor(qualifying::front_row_rate)
    ),
    metric_def!(
        "constructor_top_ten_qualifying_rate",
        "Share of qualifying sessions with a car in the top ten",
        Qualifying,
        Fraction,
        HigherIsBetter,
        [Races, Qualifying],
        Constructor(qualifying::top_ten_rate)
    ),
    metric_def!(
        "constructor_qualifying_advantage",
        "Places the best car qualified ahead of the field's average",
        Qualifying,
        Positions,
        HigherIsBetter,
        [Races, Qualifying],
        Constructor(qualifying::advantage)
    ),
    metric_def!(
        "constructor_average_pit_stop_time",
        "Average pit stop duration, stops over a minute excluded",
        PitStops,
        Seconds,
        LowerIsBetter,
        [Races, Results, PitStops],
        Constructor(pit_stops::average_time)
    ),
    metric_def!(
        "constructor_fastest_pit_stop",
        "Quickest pit stop",
        PitStops,
        Seconds,
        LowerIsBetter,
        [Races, Results, PitStops],
        Constructor(pit_stops::fastest)
    ),
    metric_def!(
        "constructor_pit_stop_consistency",
        "Standard deviation of pit stop durations",
        PitStops,
        Seconds,
        LowerIsBetter,
        [Races, Results, PitStops],
        Constructor(pit_stops::consistency)
    ),
    metric_def!(
        "constructor_sub_three_second_stops",
        "Pit stops completed in under three seconds",
        PitStops,
        Count,
        HigherIsBetter,
        [Races, Results, PitStops],
        Constructor(pit_stops::sub_three_second_stops)
    ),
    metric_def!(
        "constructor_pit_stop_efficiency",
        "Relative margin of pit stops over the field average",
        PitStops,
        Relative,
        HigherIsBetter,
        [Races, Results, PitStops],
        Constructor(pit_stops::efficiency)
    ),
    metric_def!(
        "constructor_average_pit_stops_per_race",
        "Average pit stops per race with stops",
        PitStops,
        CountPerRace,
        LowerIsBetter,
        [Races, Results, PitStops],
        Constructor(pit_stops::stops_per_race)
    ),
    metric_def!(
        "constructor_pit_stop_time_improvement",
        "Trend of the average stop time through a season",
        PitStops,
        SecondsPerRace,
        LowerIsBetter,
        [Races, Results, PitStops],
        Constructor(pit_stops::time_improvement)
    ),
    metric_def!(
        "constructor_pit_stop_reliability",
        "Share of stops within 20% of the team's average",
        PitStops,
        Fraction,
        HigherIsBetter,
        [Races, Results, PitStops],
        Constructor(pit_stops::reliability)
    ),
    metric_def!(
        "constructor_pit_stop_strategic_success",
        "Spread of stops over the early, middle and late race windows",
        PitStops,
        Index,
        HigherIsBetter,
        [Races, Results, PitStops],
        Constructor(pit_stops::strategic_success)
    ),
    metric_def!(
        "constructor_average_lap_time",
        "Average race lap time",
        LapPerformance,
        Seconds,
        LowerIsBetter,
        [Races, Results, LapTimes],
        Constructor(lap_performance::average_time)
    ),
    metric_def!(
        "constructor_fastest_lap",
        "Quickest race lap",
        LapPerformance,
        Seconds,
        LowerIsBetter,
        [Races, Results, LapTimes],
        Constructor(lap_performance::fastest)
    ),
    metric_def!(
        "constructor_lap_time_consistency",
        "Standard deviation of race lap times after outlier removal",
        LapPerformance,
        Seconds,
        LowerIsBetter,
        [Races, Results, LapTimes],
        Constructor(lap_performance::consistency)
    ),
    metric_def!(
        "constructor_race_pace",
        "Relative margin of the average lap over the field average",
        LapPerformance,
        Relative,
        HigherIsBetter,
        [Races, Results, LapTimes],
        Constructor(lap_performance::race_pace)
    ),
    metric_def!(
        "constructor_lap_time_improvement",
        "Pace gained from the first to the last five laps of a stint",
        LapPerformance,
        Seconds,
        HigherIsBetter,
        [Races, Results, LapTimes],
        Constructor(lap_performance::lap_time_improvement)
    ),
    metric_def!(
        "constructor_tire_management",
        "Lap time lost every ten laps over long stints",
        LapPerformance,
        SecondsPerTenLaps,
        LowerIsBetter,
        [Races, Results, LapTimes],
        Constructor(lap_performance::tire_management)
    ),
    metric_def!(
        "constructor_competitive_lap_rate",
        "Share of laps within 3% of the race's fastest lap",
        LapPerformance,
        Fraction,
        HigherIsBetter,
        [Races, Results, LapTimes],
        Constructor(lap_performance::competitive_lap_rate)
    ),
    metric_def!(
        "constructor_lap_time_variability",
        "Average coefficient of variation of stint lap times",
        LapPerformance,
        Fraction,
        LowerIsBetter,
        [Races, Results, LapTimes],
        Constructor(lap_performance::lap_time_variability)
    ),
    metric_def!(
        "constructor_pace_dominance",
        "Share of races with the quickest average lap of all teams",
        LapPerformance,
        Fraction,
        HigherIsBetter,
        [Races, Results, LapTimes],
        Constructor(lap_performance::pace_dominance)
    ),
    metric_def!(
        "constructor_fuel_adjusted_pace",
        "Average lap time corrected for fuel load",
        LapPerformance,
        Seconds,
        LowerIsBetter,
        [Races, Results, LapTimes],
        Constructor(lap_performance::fuel_adjusted_pace)
    ),
];

#[cfg(test)]
mod tests {
    use crate::metrics::Measurement;
    use crate::tables::{ConstructorId, SeasonFilter, TableStore, TableStoreBuilder};

    const ONE: ConstructorId = ConstructorId(1);
    const TWO: ConstructorId = ConstructorId(2);
    const S2021: SeasonFilter = SeasonFilter::Season(2021);

    fn close(m: &Measurement, expected: f64) -> bool {
        (m.expect_f64() - expected).abs() < 1e-9
    }

    /// Five races in 2021 and one in 2022. Drivers 1 and 2 race for constructor 1,
    /// drivers 3 and 4 for constructor 2.
    fn store() -> TableStore {
        let mut b = TableStoreBuilder::new("v")
            .race(1, 2021, 1)
            .race(2, 2021, 2)
            .race(3, 2021, 3)
            .race(4, 2021, 4)
            .race(5, 2021, 5)
            .race(6, 2022, 1)
            .driver(1, "AAA", "Alpha")
            .driver(2, "BBB", "Bravo")
            .driver(3, "CCC", "Charlie")
            .driver(4, "DDD", "Delta")
            .constructor(1, "One")
            .constructor(2, "Two");

        // (race, [(driver, position, points, status)])
        let results: [(u32, [(u32, Option<u8>, f64, u32); 4]); 6] = [
            (1, [(1, Some(1), 25.0, 1), (2, Some(2), 18.0, 1), (3, Some(3), 15.0, 1), (4, None, 0.0, 5)]),
            (2, [(3, Some(1), 25.0, 1), (1, Some(2), 18.0, 1), (4, Some(3), 15.0, 1), (2, None, 0.0, 3)]),
            (3, [(1, Some(1), 25.0, 1), (3, Some(2), 18.0, 1), (2, Some(3), 15.0, 1), (4, Some(4), 12.0, 1)]),
            (4, [(1, Some(1), 25.0, 1), (2, Some(2), 18.0, 1), (3, Some(3), 15.0, 1), (4, Some(4), 12.0, 1)]),
            (5, [(4, Some(1), 25.0, 1), (3, Some(2), 18.0, 1), (1, Some(3), 15.0, 1), (2, Some(4), 12.0, 1)]),
            (6, [(1, Some(1), 25.0, 1), (2, Some(2), 18.0, 1), (3, Some(3), 15.0, 1), (4, Some(4), 12.0, 1)]),
        ];
        for (race, cars) in results {
            for (driver, position, points, status) in cars {
                let team = if driver <= 2 { 1 } else { 2 };
                b = b.result(race, driver, team, position, position, points, status);
            }
        }

        for (race, order) in [(1, [1, 2, 3, 4]), (2, [3, 1, 4, 2]), (3, [1, 3, 2, 4])] {
            for (slot, driver) in (1..).zip(order) {
                let team = if driver <= 2 { 1 } else { 2 };
                b = b.qualifying(race, driver, team, Some(slot));
            }
        }

        b = b
            .pit_stop(1, 1, 1, 10, Some(2_500))
            .pit_stop(1, 2, 1, 20, Some(3_500))
            .pit_stop(1, 3, 1, 12, Some(3_000))
            .pit_stop(1, 4, 1, 45, Some(80_000))
            .pit_stop(2, 1, 1, 18, Some(2_800))
            .pit_stop(2, 1, 2, 42, Some(3_200))
            .pit_stop(2, 2, 1, 14, Some(4_000))
            .pit_stop(2, 3, 1, 30, Some(3_000));

        for lap in 1..=12 {
            b = b
                .lap(1, 1, lap, if lap % 2 == 1 { 90_000 } else { 90_500 })
                .lap(1, 2, lap, 91_000)
                .lap(1, 3, lap, 92_000);
        }

        b.build()
    }

    #[test]
    fn test_race_performance() {
        let store = store();
        assert!(close(&super::race_performance::win_rate(&store, ONE, S2021), 0.6));
        assert!(close(&super::race_performance::podium_rate(&store, ONE, S2021), 1.0));
        assert!(close(&super::race_performance::one_two_finishes(&store, ONE, S2021), 2.0));
        assert!(close(&super::race_performance::podium_lockouts(&store, ONE, S2021), 3.0));
        assert!(close(&super::race_performance::double_podiums(&store, ONE, S2021), 3.0));
        assert!(close(&super::race_performance::average_finish(&store, ONE, S2021), 8.0 / 5.0));
        assert!(close(&super::race_performance::front_row_lockouts(&store, ONE, S2021), 1.0));
    }

    #[test]
    fn test_reliability() {
        let store = store();
        assert!(close(&super::reliability::dnf_rate(&store, ONE, S2021), 0.1));
        assert!(close(&super::reliability::mechanical_failure_rate(&store, ONE, S2021), 0.0));
        assert!(close(&super::reliability::mechanical_failure_rate(&store, TWO, S2021), 0.1));
        assert!(close(&super::reliability::finish_rate(&store, ONE, S2021), 0.8));
        assert!(close(&super::reliability::reliability_index(&store, ONE, S2021), 0.9));
        // 2021: 9 of 10, 2022: 2 of 2
        assert!(close(&super::reliability::average_reliability(&store, ONE, SeasonFilter::Career), 0.95));
    }

    #[test]
    fn test_championship() {
        let store = store();
        assert!(close(&super::championship::position(&store, ONE, S2021), 1.0));
        assert!(close(&super::championship::position(&store, TWO, S2021), 2.0));
        assert!(close(&super::championship::championship_wins(&store, ONE, SeasonFilter::Career), 2.0));
        assert!(close(&super::championship::top_three_finishes(&store, TWO, SeasonFilter::Career), 2.0));
        assert!(close(&super::championship::points_per_race(&store, ONE, S2021), 34.2));
        assert!(close(&super::championship::points_per_season(&store, ONE, SeasonFilter::Career), (171.0 + 43.0) / 2.0));
    }

    #[test]
    fn test_competitiveness() {
        let store = store();
        assert!(close(&super::competitiveness::win_streak(&store, ONE, S2021), 2.0));
        assert!(close(
            &super::competitiveness::season_dominance(&store, ONE, S2021),
            0.4 * 0.6 + 0.35 * (171.0 / 220.0) + 0.25
        ));
        assert!(close(&super::competitiveness::seasonal_improvement(&store, ONE, S2021), -0.7));

        let index = super::competitiveness::consistency_index(&store, ONE, S2021).expect_f64();
        assert!(index > 0.70 && index < 0.71, "{index}");

        let rating = super::competitiveness::competitiveness_rating(&store, ONE, S2021).expect_f64();
        assert!((0.0..=1.0).contains(&rating));
    }

    #[test]
    fn test_season_only_metrics_reject_career() {
        let store = store();
        for m in [
            super::competitiveness::season_dominance(&store, ONE, SeasonFilter::Career),
            super::competitiveness::seasonal_improvement(&store, ONE, SeasonFilter::Career),
            super::pit_stops::time_improvement(&store, ONE, SeasonFilter::Career),
        ] {
            assert!(matches!(m, Measurement::Insufficient { sample_size: 0, .. }));
        }
    }

    #[test]
    fn test_qualifying() {
        let store = store();
        assert!(close(&super::qualifying::pole_rate(&store, ONE, S2021), 2.0 / 3.0));
        assert!(close(&super::qualifying::average_position(&store, ONE, S2021), 4.0 / 3.0));
        assert!(close(&super::qualifying::consistency(&store, ONE, S2021), (2.0_f64 / 9.0).sqrt()));
        assert!(close(&super::qualifying::advantage(&store, ONE, S2021), 7.0 / 6.0));
        assert!(close(&super::qualifying::front_row_rate(&store, TWO, S2021), 2.0 / 3.0));
    }

    #[test]
    fn test_pit_stops() {
        let store = store();
        assert!(close(&super::pit_stops::average_time(&store, ONE, S2021), 3.2));
        assert!(close(&super::pit_stops::fastest(&store, ONE, S2021), 2.5));
        assert!(close(&super::pit_stops::sub_three_second_stops(&store, ONE, S2021), 2.0));
        assert!(close(&super::pit_stops::reliability(&store, ONE, S2021), 0.8));
        assert!(close(&super::pit_stops::stops_per_race(&store, ONE, S2021), 2.5));
        assert!(close(
            &super::pit_stops::efficiency(&store, ONE, S2021),
            -(10.0 / 3.0 - 3.25) / 3.25 / 2.0
        ));
        assert!(close(&super::pit_stops::strategic_success(&store, ONE, S2021), (2.0_f64 / 9.0).sqrt() / 2.0));

        // the 80 second stop is not a service stop
        assert!(close(&super::pit_stops::average_time(&store, TWO, S2021), 3.0));
    }

    #[test]
    fn test_lap_performance() {
        let store = store();
        assert!(close(&super::lap_performance::average_time(&store, ONE, S2021), 90.625));
        assert!(close(&super::lap_performance::fastest(&store, ONE, S2021), 90.0));
        assert!(close(&super::lap_performance::competitive_lap_rate(&store, ONE, S2021), 1.0));
        assert!(close(&super::lap_performance::pace_dominance(&store, ONE, S2021), 1.0));
        assert!(close(&super::lap_performance::pace_dominance(&store, TWO, S2021), 0.0));
        assert!(close(&super::lap_performance::lap_time_improvement(&store, ONE, S2021), -0.05));

        let field = (90.25 + 91.0 + 92.0) / 3.0;
        assert!(close(&super::lap_performance::race_pace(&store, ONE, S2021), -(90.625 - field) / field));

        // stints are 12 laps long, too short to judge tyre wear
        assert!(matches!(
            super::lap_performance::tire_management(&store, ONE, S2021),
            Measurement::Insufficient { .. }
        ));
    }

    #[test]
    fn test_telemetry_free_season_is_insufficient() {
        let store = store();
        let m = super::lap_performance::average_time(&store, ONE, SeasonFilter::Season(2022));
        assert!(matches!(m, Measurement::Insufficient { sample_size: 0, .. }));
    }
}
