use super::row_parser::{parse_num, parse_optional_num, parse_optional_position};
use super::{ConstructorId, DriverId, RaceId, StatusId, define_rows, define_table};

define_rows! {
    /// One driver's result in one race.
    ///
    /// `position` is `None` when the driver was not classified (a DNF). `grid` is
    /// `None` for pit-lane starts.
    ResultRow {
        pub race_id: RaceId = "raceId",
        pub driver_id: DriverId = "driverId",
        pub constructor_id: ConstructorId = "constructorId",
        pub grid: Option<u8> = "grid",
        pub position: Option<u8> = "position",
        pub position_order: u16 = "positionOrder",
        pub points: f64 = "points",
        pub laps: u16 = "laps",
        pub fastest_lap_rank: Option<u8> = "rank",
        pub status_id: StatusId = "statusId",
    }
}

impl ResultRow {
    #[must_use]
    pub const fn is_classified(&self) -> bool {
        self.position.is_some()
    }

    #[must_use]
    pub fn is_podium(&self) -> bool {
        self.position.is_some_and(|p| p <= 3)
    }

    #[must_use]
    pub fn is_win(&self) -> bool {
        self.position == Some(1)
    }

    #[must_use]
    pub fn scored_points(&self) -> bool {
        self.points > 0.0
    }
}

define_table! {
    results => ResultRow {
        fn convert_row(csv_row) -> Result<ResultRow> {
            let points: f64 = parse_num(csv_row.points, "points")?;
            if !points.is_finite() || points < 0.0 {
                return Err(ohno::app_err!("points out of range: '{}'", csv_row.points));
            }

            Ok(ResultRow {
                race_id: RaceId(parse_num(csv_row.race_id, "raceId")?),
                driver_id: DriverId(parse_num(csv_row.driver_id, "driverId")?),
                constructor_id: ConstructorId(parse_num(csv_row.constructor_id, "constructorId")?),
                grid: parse_optional_position(csv_row.grid, "grid")?,
                position: parse_optional_position(csv_row.position, "position")?,
                position_order: parse_num(csv_row.position_order, "positionOrder")?,
                points,
                laps: parse_optional_num(csv_row.laps, "laps")?.unwrap_or(0),
                fastest_lap_rank: parse_optional_position(csv_row.fastest_lap_rank, "rank")?,
                status_id: StatusId(parse_num(csv_row.status_id, "statusId")?),
            })
        }
    }
}
