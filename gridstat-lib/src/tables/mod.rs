//! Dataset loading, integrity checks, and indexed lookups
//!
//! The dataset is a directory of CSV tables in the Ergast layout. Each table is described
//! once with `define_rows!` (the columns it needs and their typed form) and `define_table!`
//! (how a raw row becomes a typed one). [`TableStore`] reads every table, drops rows that
//! fail to parse or reference missing races, drivers or constructors, and builds the
//! indices metrics query.
//!
//! # Availability
//!
//! Races, drivers, constructors, status and results are required. Qualifying, lap times
//! and pit stops are telemetry tables that older datasets lack; when one is missing the
//! store records it as not loaded and the engine reports metrics needing it as unavailable.
//!
//! # Integrity
//!
//! Every dropped row becomes an [`IntegrityWarning`]. Loading only fails when a required
//! table is missing, or a present table is unreadable or lacks a required column.

mod constructors_table;
mod drivers_table;
mod finish_status;
mod ids;
mod integrity;
mod lap_times_table;
mod pit_stops_table;
mod qualifying_table;
mod races_table;
mod results_table;
mod row_parser;
mod season_filter;
mod status_table;
mod table;
mod table_store;

use table::{define_rows, define_table};

pub use constructors_table::{ConstructorRow, ConstructorsTable};
pub use drivers_table::{DriverRow, DriversTable};
pub use finish_status::FinishStatus;
pub use ids::{CircuitId, ConstructorId, DriverId, RaceId, StatusId};
pub use integrity::IntegrityWarning;
pub use lap_times_table::{LapTimeRow, LapTimesTable};
pub use pit_stops_table::{PitStopRow, PitStopsTable};
pub use qualifying_table::{QualifyingRow, QualifyingTable};
pub use races_table::{RaceRow, RacesTable};
pub use results_table::{ResultRow, ResultsTable};
pub use season_filter::SeasonFilter;
pub use status_table::{StatusRow, StatusTable};
pub use table::{Table, TableId, read_rows};
pub use table_store::{CarKeyed, RaceKeyed, StoredTable, TableStore};
#[cfg(any(debug_assertions, test))]
pub use table_store::TableStoreBuilder;
