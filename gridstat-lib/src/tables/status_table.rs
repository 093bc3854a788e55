use super::row_parser::{parse_num, parse_text};
use super::{FinishStatus, StatusId, define_rows, define_table};
use compact_str::CompactString;

define_rows! {
    /// A finishing status as written in the dataset (e.g. `Finished`, `+1 Lap`, `Gearbox`).
    StatusRow {
        pub id: StatusId = "statusId",
        pub text: CompactString = "status",
    }
}

impl StatusRow {
    #[must_use]
    pub fn kind(&self) -> FinishStatus {
        FinishStatus::classify(&self.text)
    }
}

define_table! {
    status => StatusRow {
        fn convert_row(csv_row) -> Result<StatusRow> {
            Ok(StatusRow {
                id: StatusId(parse_num(csv_row.id, "statusId")?),
                text: parse_text(csv_row.text),
            })
        }
    }
}
