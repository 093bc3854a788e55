use super::IntegrityWarning;
use crate::Result;
use csv::{Reader, StringRecord};
use ohno::{IntoAppError, bail};
use serde::de::Deserialize;
use serde::Serialize;
use std::io::Read;
use strum::{Display, EnumIter};

const LOG_TARGET: &str = "    tables";

/// Identifies one of the source tables of the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, Display, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TableId {
    Races,
    Drivers,
    Constructors,
    Status,
    Results,
    Qualifying,
    LapTimes,
    PitStops,
}

impl TableId {
    /// File name of the table within the dataset directory.
    #[must_use]
    pub const fn csv_name(self) -> &'static str {
        match self {
            Self::Races => "races.csv",
            Self::Drivers => "drivers.csv",
            Self::Constructors => "constructors.csv",
            Self::Status => "status.csv",
            Self::Results => "results.csv",
            Self::Qualifying => "qualifying.csv",
            Self::LapTimes => "lap_times.csv",
            Self::PitStops => "pit_stops.csv",
        }
    }

    /// Telemetry tables may legitimately be missing from a dataset.
    #[must_use]
    pub const fn is_optional(self) -> bool {
        matches!(self, Self::Qualifying | Self::LapTimes | Self::PitStops)
    }
}

pub trait Table {
    type CsvRow<'a>: Deserialize<'a>;
    type Row;

    const ID: TableId;
    const COLUMNS: &'static [&'static str];

    /// Converts a raw CSV row into its typed form.
    fn convert_row(csv_row: &Self::CsvRow<'_>) -> Result<Self::Row>;
}

/// Reads every row of a table from CSV text.
///
/// Rows that fail to parse are dropped and reported through `warnings`. A missing
/// column or a structurally broken file is an error.
pub fn read_rows<T: Table>(reader: impl Read, warnings: &mut Vec<IntegrityWarning>) -> Result<Vec<T::Row>> {
    let csv_name = T::ID.csv_name();
    let mut csv_reader = Reader::from_reader(reader);

    let headers = csv_reader
        .headers()
        .into_app_err_with(|| format!("reading the header of '{csv_name}'"))?
        .clone();

    for column in T::COLUMNS {
        if !headers.iter().any(|h| h == *column) {
            bail!("'{csv_name}' is missing required column '{column}'");
        }
    }

    let mut rows = Vec::new();
    let mut record = StringRecord::new();
    while csv_reader
        .read_record(&mut record)
        .into_app_err_with(|| format!("reading '{csv_name}'"))?
    {
        let line = record.position().map_or(0, csv::Position::line);
        let converted = record
            .deserialize::<T::CsvRow<'_>>(Some(&headers))
            .into_app_err("malformed row")
            .and_then(|csv_row| T::convert_row(&csv_row));

        match converted {
            Ok(row) => rows.push(row),
            Err(e) => {
                log::debug!(target: LOG_TARGET, "Dropping line {line} of '{csv_name}': {e:#}");
                warnings.push(IntegrityWarning::malformed(T::ID, line, format!("{e:#}")));
            }
        }
    }

    Ok(rows)
}

/// Generates a CSV row struct and a typed row struct from a single row definition.
///
/// Creates:
/// - `Csv{RowName}` - Struct for deserializing from CSV, with all fields as `&'a str`
/// - `{RowName}` - Typed row struct with the specified field types
/// - `{RowName}::CSV_COLUMNS` - The CSV header names the row requires
///
/// Each field names the CSV column it is read from. See `races_table.rs` for usage.
macro_rules! define_rows {
    (
        $(#[$row_meta:meta])*
        $row_name:ident {
            $(
                $(#[$field_meta:meta])*
                $vis:vis $field:ident: $field_type:ty = $column:literal
            ),* $(,)?
        }
    ) => {
        pastey::paste! {
            #[derive(Debug, serde::Deserialize)]
            pub struct [<Csv $row_name>]<'a> {
                $(
                    #[serde(rename = $column, borrow)]
                    pub $field: &'a str,
                )*
            }
        }

        $(#[$row_meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $row_name {
            $(
                $(#[$field_meta])*
                $vis $field: $field_type,
            )*
        }

        impl $row_name {
            pub const CSV_COLUMNS: &'static [&'static str] = &[$($column),*];
        }
    };
}

/// Generates a table marker type and its `Table` implementation from a `snake_case` name.
///
/// Creates `{Name}Table`, bound to `TableId::{Name}` and to the row type produced by
/// `define_rows!`. The body converts one `Csv{RowName}` into a typed row.
macro_rules! define_table {
    (
        $name_snake:ident => $row:ident {
            fn convert_row($csv_param:ident) -> Result<$row_ret:ty>
                $convert_body:block
        }
    ) => {
        pastey::paste! {
            #[derive(Debug, Clone, Copy, Default)]
            pub struct [<$name_snake:camel Table>];

            impl super::Table for [<$name_snake:camel Table>] {
                type CsvRow<'a> = [<Csv $row>]<'a>;
                type Row = $row_ret;

                const ID: super::TableId = super::TableId::[<$name_snake:camel>];
                const COLUMNS: &'static [&'static str] = $row::CSV_COLUMNS;

                fn convert_row($csv_param: &Self::CsvRow<'_>) -> crate::Result<Self::Row>
                    $convert_body
            }
        }
    };
}

pub(crate) use define_rows;
pub(crate) use define_table;
