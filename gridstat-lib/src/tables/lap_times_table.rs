use super::row_parser::{parse_num, parse_optional_position};
use super::{DriverId, RaceId, define_rows, define_table};

define_rows! {
    LapTimeRow {
        pub race_id: RaceId = "raceId",
        pub driver_id: DriverId = "driverId",
        pub lap: u16 = "lap",
        pub position: Option<u8> = "position",
        pub millis: u32 = "milliseconds",
    }
}

impl LapTimeRow {
    #[must_use]
    pub fn seconds(&self) -> f64 {
        f64::from(self.millis) / 1000.0
    }
}

define_table! {
    lap_times => LapTimeRow {
        fn convert_row(csv_row) -> Result<LapTimeRow> {
            let millis: u32 = parse_num(csv_row.millis, "milliseconds")?;
            if millis == 0 {
                return Err(ohno::app_err!("lap time of zero milliseconds"));
            }

            Ok(LapTimeRow {
                race_id: RaceId(parse_num(csv_row.race_id, "raceId")?),
                driver_id: DriverId(parse_num(csv_row.driver_id, "driverId")?),
                lap: parse_num(csv_row.lap, "lap")?,
                position: parse_optional_position(csv_row.position, "position")?,
                millis,
            })
        }
    }
}
