use super::row_parser::{parse_date, parse_num, parse_text};
use super::{CircuitId, RaceId, define_rows, define_table};
use chrono::NaiveDate;
use compact_str::CompactString;

define_rows! {
    /// A single race weekend.
    RaceRow {
        pub id: RaceId = "raceId",
        pub season: u16 = "year",
        pub round: u8 = "round",
        pub circuit_id: CircuitId = "circuitId",
        pub name: CompactString = "name",
        pub date: NaiveDate = "date",
    }
}

define_table! {
    races => RaceRow {
        fn convert_row(csv_row) -> Result<RaceRow> {
            Ok(RaceRow {
                id: RaceId(parse_num(csv_row.id, "raceId")?),
                season: parse_num(csv_row.season, "year")?,
                round: parse_num(csv_row.round, "round")?,
                circuit_id: CircuitId(parse_num(csv_row.circuit_id, "circuitId")?),
                name: parse_text(csv_row.name),
                date: parse_date(csv_row.date, "date")?,
            })
        }
    }
}
