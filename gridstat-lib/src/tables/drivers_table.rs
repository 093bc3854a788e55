use super::row_parser::{parse_num, parse_optional_date, parse_optional_text, parse_text};
use super::{DriverId, define_rows, define_table};
use chrono::NaiveDate;
use compact_str::CompactString;

define_rows! {
    DriverRow {
        pub id: DriverId = "driverId",
        pub reference: CompactString = "driverRef",
        pub code: Option<CompactString> = "code",
        pub forename: CompactString = "forename",
        pub surname: CompactString = "surname",
        pub birth_date: Option<NaiveDate> = "dob",
        pub nationality: CompactString = "nationality",
    }
}

impl DriverRow {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.forename, self.surname)
    }
}

define_table! {
    drivers => DriverRow {
        fn convert_row(csv_row) -> Result<DriverRow> {
            Ok(DriverRow {
                id: DriverId(parse_num(csv_row.id, "driverId")?),
                reference: parse_text(csv_row.reference),
                code: parse_optional_text(csv_row.code),
                forename: parse_text(csv_row.forename),
                surname: parse_text(csv_row.surname),
                birth_date: parse_optional_date(csv_row.birth_date, "dob")?,
                nationality: parse_text(csv_row.nationality),
            })
        }
    }
}
