use super::row_parser::{parse_num, parse_text};
use super::{ConstructorId, define_rows, define_table};
use compact_str::CompactString;

define_rows! {
    ConstructorRow {
        pub id: ConstructorId = "constructorId",
        pub reference: CompactString = "constructorRef",
        pub name: CompactString = "name",
        pub nationality: CompactString = "nationality",
    }
}

define_table! {
    constructors => ConstructorRow {
        fn convert_row(csv_row) -> Result<ConstructorRow> {
            Ok(ConstructorRow {
                id: ConstructorId(parse_num(csv_row.id, "constructorId")?),
                reference: parse_text(csv_row.reference),
                name: parse_text(csv_row.name),
                nationality: parse_text(csv_row.nationality),
            })
        }
    }
}
