use super::row_parser::{parse_num, parse_optional_num};
use super::{DriverId, RaceId, define_rows, define_table};

define_rows! {
    PitStopRow {
        pub race_id: RaceId = "raceId",
        pub driver_id: DriverId = "driverId",
        pub stop: u8 = "stop",
        pub lap: u16 = "lap",
        pub millis: Option<u32> = "milliseconds",
    }
}

impl PitStopRow {
    /// Stationary-plus-lane time in seconds, when recorded.
    #[must_use]
    pub fn seconds(&self) -> Option<f64> {
        self.millis.map(|ms| f64::from(ms) / 1000.0)
    }
}

define_table! {
    pit_stops => PitStopRow {
        fn convert_row(csv_row) -> Result<PitStopRow> {
            Ok(PitStopRow {
                race_id: RaceId(parse_num(csv_row.race_id, "raceId")?),
                driver_id: DriverId(parse_num(csv_row.driver_id, "driverId")?),
                stop: parse_num(csv_row.stop, "stop")?,
                lap: parse_num(csv_row.lap, "lap")?,
                millis: parse_optional_num(csv_row.millis, "milliseconds")?,
            })
        }
    }
}
