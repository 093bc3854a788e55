use super::row_parser::{parse_num, parse_optional_lap_time, parse_optional_position};
use super::{ConstructorId, DriverId, RaceId, define_rows, define_table};

define_rows! {
    /// One driver's qualifying session result. Session times are in seconds.
    QualifyingRow {
        pub race_id: RaceId = "raceId",
        pub driver_id: DriverId = "driverId",
        pub constructor_id: ConstructorId = "constructorId",
        pub position: Option<u8> = "position",
        pub q1: Option<f64> = "q1",
        pub q2: Option<f64> = "q2",
        pub q3: Option<f64> = "q3",
    }
}

define_table! {
    qualifying => QualifyingRow {
        fn convert_row(csv_row) -> Result<QualifyingRow> {
            Ok(QualifyingRow {
                race_id: RaceId(parse_num(csv_row.race_id, "raceId")?),
                driver_id: DriverId(parse_num(csv_row.driver_id, "driverId")?),
                constructor_id: ConstructorId(parse_num(csv_row.constructor_id, "constructorId")?),
                position: parse_optional_position(csv_row.position, "position")?,
                q1: parse_optional_lap_time(csv_row.q1, "q1")?,
                q2: parse_optional_lap_time(csv_row.q2, "q2")?,
                q3: parse_optional_lap_time(csv_row.q3, "q3")?,
            })
        }
    }
}
