use super::table::read_rows;
use super::{
    ConstructorId, ConstructorRow, ConstructorsTable, DriverId, DriverRow, DriversTable, FinishStatus, IntegrityWarning,
    LapTimeRow, LapTimesTable, PitStopRow, PitStopsTable, QualifyingRow, QualifyingTable, RaceId, RaceRow, RacesTable,
    ResultRow, ResultsTable, SeasonFilter, StatusId, StatusRow, StatusTable, Table, TableId,
};
use crate::{HashMap, HashSet, Result};
use camino::Utf8Path;
use compact_str::CompactString;
use ohno::IntoAppError;
use sha2::{Digest, Sha256};
use std::io::ErrorKind;
use std::time::Instant;
use strum::IntoEnumIterator;

const LOG_TARGET: &str = "    tables";

/// Rows of a table that carry a race foreign key.
pub trait RaceKeyed {
    fn race_id(&self) -> RaceId;
}

/// Rows that identify a single car in a single race.
pub trait CarKeyed: RaceKeyed {
    fn driver_id(&self) -> DriverId;
}

macro_rules! keyed_rows {
    ($($row:ty),* $(,)?) => {
        $(
            impl RaceKeyed for $row {
                fn race_id(&self) -> RaceId {
                    self.race_id
                }
            }

            impl CarKeyed for $row {
                fn driver_id(&self) -> DriverId {
                    self.driver_id
                }
            }
        )*
    };
}

keyed_rows!(ResultRow, QualifyingRow, LapTimeRow, PitStopRow);

/// A table whose rows are held by the [`TableStore`].
pub trait StoredTable: Table {
    fn stored(store: &TableStore) -> &[Self::Row];
}

macro_rules! stored_tables {
    ($($table:ty => $field:ident),* $(,)?) => {
        $(
            impl StoredTable for $table {
                fn stored(store: &TableStore) -> &[Self::Row] {
                    &store.$field
                }
            }
        )*
    };
}

stored_tables!(
    RacesTable => races,
    DriversTable => drivers,
    ConstructorsTable => constructors,
    StatusTable => statuses,
    ResultsTable => results,
    QualifyingTable => qualifying,
    LapTimesTable => lap_times,
    PitStopsTable => pit_stops,
);

/// Rows as read from the source, before integrity checks and indexing.
#[derive(Debug, Default)]
struct RawTables {
    races: Vec<RaceRow>,
    drivers: Vec<DriverRow>,
    constructors: Vec<ConstructorRow>,
    statuses: Vec<StatusRow>,
    results: Vec<ResultRow>,
    qualifying: Vec<QualifyingRow>,
    lap_times: Vec<LapTimeRow>,
    pit_stops: Vec<PitStopRow>,
}

/// The loaded dataset, indexed for the lookups metrics perform.
///
/// A store is immutable once built. Every per-race index lists rows in chronological
/// race order (season, then round), so iterating an index visits races oldest first.
/// Lookups never fail: an unknown id yields `None` or an empty iterator.
#[derive(Debug)]
pub struct TableStore {
    races: Vec<RaceRow>,
    drivers: Vec<DriverRow>,
    constructors: Vec<ConstructorRow>,
    statuses: Vec<StatusRow>,
    results: Vec<ResultRow>,
    qualifying: Vec<QualifyingRow>,
    lap_times: Vec<LapTimeRow>,
    pit_stops: Vec<PitStopRow>,

    race_index: HashMap<RaceId, usize>,
    driver_index: HashMap<DriverId, usize>,
    constructor_index: HashMap<ConstructorId, usize>,
    status_kinds: HashMap<StatusId, FinishStatus>,

    results_by_race: HashMap<RaceId, Vec<usize>>,
    results_by_driver: HashMap<DriverId, Vec<usize>>,
    results_by_constructor: HashMap<ConstructorId, Vec<usize>>,
    result_by_car: HashMap<(RaceId, DriverId), usize>,

    qualifying_by_race: HashMap<RaceId, Vec<usize>>,
    qualifying_by_driver: HashMap<DriverId, Vec<usize>>,
    qualifying_by_constructor: HashMap<ConstructorId, Vec<usize>>,

    laps_by_race: HashMap<RaceId, Vec<usize>>,
    pit_stops_by_race: HashMap<RaceId, Vec<usize>>,

    loaded: HashSet<TableId>,
    warnings: Vec<IntegrityWarning>,
    version: CompactString,
    min_season: u16,
}

impl TableStore {
    /// Loads every table from `dataset_dir`.
    ///
    /// Core tables must be present. Telemetry tables that are missing are recorded as
    /// not loaded. Races before `min_season` are excluded along with every row that
    /// references them.
    ///
    /// # Errors
    ///
    /// Fails when a core table is missing, or when any present table cannot be read
    /// or lacks a required column.
    pub fn load(dataset_dir: &Utf8Path, min_season: u16) -> Result<Self> {
        let start = Instant::now();
        let mut hasher = Sha256::new();
        let mut loaded = HashSet::default();
        let mut warnings = Vec::new();

        let mut reader = FileReader {
            dir: dataset_dir,
            hasher: &mut hasher,
            loaded: &mut loaded,
            warnings: &mut warnings,
        };

        let raw = RawTables {
            races: reader.read::<RacesTable>()?,
            drivers: reader.read::<DriversTable>()?,
            constructors: reader.read::<ConstructorsTable>()?,
            statuses: reader.read::<StatusTable>()?,
            results: reader.read::<ResultsTable>()?,
            qualifying: reader.read::<QualifyingTable>()?,
            lap_times: reader.read::<LapTimesTable>()?,
            pit_stops: reader.read::<PitStopsTable>()?,
        };

        // The cutoff changes every result, so it is part of the version as well
        hasher.update(min_season.to_le_bytes());
        let version = CompactString::new(hex::encode(hasher.finalize()));
        let store = Self::assemble(raw, loaded, warnings, version, min_season);

        log::info!(
            target: LOG_TARGET,
            "Loaded {} races, {} results and {} laps from '{dataset_dir}' in {:.2?}",
            store.races.len(),
            store.results.len(),
            store.lap_times.len(),
            start.elapsed()
        );

        Ok(store)
    }

    #[expect(clippy::too_many_lines, reason = "One linear pass per table reads best in one place")]
    fn assemble(
        raw: RawTables,
        loaded: HashSet<TableId>,
        mut warnings: Vec<IntegrityWarning>,
        version: CompactString,
        min_season: u16,
    ) -> Self {
        let RawTables {
            mut races,
            drivers,
            constructors,
            statuses,
            results,
            qualifying,
            lap_times,
            pit_stops,
        } = raw;

        // race ids outside the window are skipped without a warning
        let known_race_ids: HashSet<RaceId> = races.iter().map(|r| r.id).collect();
        races.retain(|r| r.season >= min_season);
        races.sort_by_key(|r| (r.season, r.round, r.id));

        let races = dedup_by_id(races, TableId::Races, |r| r.id, &mut warnings);
        let drivers = dedup_by_id(drivers, TableId::Drivers, |d| d.id, &mut warnings);
        let constructors = dedup_by_id(constructors, TableId::Constructors, |c| c.id, &mut warnings);
        let statuses = dedup_by_id(statuses, TableId::Status, |s| s.id, &mut warnings);

        let race_index: HashMap<_, _> = races.iter().enumerate().map(|(i, r)| (r.id, i)).collect();
        let driver_index: HashMap<_, _> = drivers.iter().enumerate().map(|(i, d)| (d.id, i)).collect();
        let constructor_index: HashMap<_, _> = constructors.iter().enumerate().map(|(i, c)| (c.id, i)).collect();
        let status_kinds: HashMap<_, _> = statuses.iter().map(|s| (s.id, s.kind())).collect();

        let refs = References {
            known_race_ids: &known_race_ids,
            race_index: &race_index,
            driver_index: &driver_index,
            constructor_index: &constructor_index,
        };

        let mut seen_cars = HashSet::default();
        let mut results: Vec<ResultRow> = results
            .into_iter()
            .filter(|r| {
                refs.check(TableId::Results, r.race_id, r.driver_id, Some(r.constructor_id), &mut warnings)
                    && check_status(r, &status_kinds, &mut warnings)
                    && check_unique_car(r, &mut seen_cars, &mut warnings)
            })
            .collect();

        let mut qualifying: Vec<QualifyingRow> = qualifying
            .into_iter()
            .filter(|q| refs.check(TableId::Qualifying, q.race_id, q.driver_id, Some(q.constructor_id), &mut warnings))
            .collect();

        let mut lap_times: Vec<LapTimeRow> = lap_times
            .into_iter()
            .filter(|l| refs.check(TableId::LapTimes, l.race_id, l.driver_id, None, &mut warnings))
            .collect();

        let mut pit_stops: Vec<PitStopRow> = pit_stops
            .into_iter()
            .filter(|p| refs.check(TableId::PitStops, p.race_id, p.driver_id, None, &mut warnings))
            .collect();

        // chronological order first, so every index built below inherits it
        let ordinal = |id: RaceId| race_index.get(&id).copied().unwrap_or(usize::MAX);
        results.sort_by_key(|r| (ordinal(r.race_id), r.position_order, r.driver_id));
        qualifying.sort_by_key(|q| (ordinal(q.race_id), q.position.unwrap_or(u8::MAX), q.driver_id));
        lap_times.sort_by_key(|l| (ordinal(l.race_id), l.driver_id, l.lap));
        pit_stops.sort_by_key(|p| (ordinal(p.race_id), p.driver_id, p.stop));

        let mut results_by_race: HashMap<RaceId, Vec<usize>> = HashMap::default();
        let mut results_by_driver: HashMap<DriverId, Vec<usize>> = HashMap::default();
        let mut results_by_constructor: HashMap<ConstructorId, Vec<usize>> = HashMap::default();
        let mut result_by_car = crate::hash_map_with_capacity(results.len());
        for (i, r) in results.iter().enumerate() {
            results_by_race.entry(r.race_id).or_default().push(i);
            results_by_driver.entry(r.driver_id).or_default().push(i);
            results_by_constructor.entry(r.constructor_id).or_default().push(i);
            let _ = result_by_car.insert((r.race_id, r.driver_id), i);
        }

        let mut qualifying_by_race: HashMap<RaceId, Vec<usize>> = HashMap::default();
        let mut qualifying_by_driver: HashMap<DriverId, Vec<usize>> = HashMap::default();
        let mut qualifying_by_constructor: HashMap<ConstructorId, Vec<usize>> = HashMap::default();
        for (i, q) in qualifying.iter().enumerate() {
            qualifying_by_race.entry(q.race_id).or_default().push(i);
            qualifying_by_driver.entry(q.driver_id).or_default().push(i);
            qualifying_by_constructor.entry(q.constructor_id).or_default().push(i);
        }

        let mut laps_by_race: HashMap<RaceId, Vec<usize>> = HashMap::default();
        for (i, l) in lap_times.iter().enumerate() {
            laps_by_race.entry(l.race_id).or_default().push(i);
        }

        let mut pit_stops_by_race: HashMap<RaceId, Vec<usize>> = HashMap::default();
        for (i, p) in pit_stops.iter().enumerate() {
            pit_stops_by_race.entry(p.race_id).or_default().push(i);
        }

        summarize_warnings(&warnings);

        Self {
            races,
            drivers,
            constructors,
            statuses,
            results,
            qualifying,
            lap_times,
            pit_stops,
            race_index,
            driver_index,
            constructor_index,
            status_kinds,
            results_by_race,
            results_by_driver,
            results_by_constructor,
            result_by_car,
            qualifying_by_race,
            qualifying_by_driver,
            qualifying_by_constructor,
            laps_by_race,
            pit_stops_by_race,
            loaded,
            warnings,
            version,
            min_season,
        }
    }

    /// Tag identifying the dataset contents, used to key cached results.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    #[must_use]
    pub const fn min_season(&self) -> u16 {
        self.min_season
    }

    #[must_use]
    pub fn is_loaded(&self, table: TableId) -> bool {
        self.loaded.contains(&table)
    }

    /// Tables in declaration order, paired with whether they were loaded.
    pub fn table_availability(&self) -> impl Iterator<Item = (TableId, bool)> + '_ {
        TableId::iter().map(|t| (t, self.is_loaded(t)))
    }

    /// Rows dropped during loading.
    #[must_use]
    pub fn integrity_warnings(&self) -> &[IntegrityWarning] {
        &self.warnings
    }

    /// Rows of table `T` accepted by `predicate`, in stored order.
    pub fn rows_for<'a, T: StoredTable>(&'a self, predicate: impl Fn(&T::Row) -> bool + 'a) -> impl Iterator<Item = &'a T::Row> + 'a
    where
        T::Row: 'a,
    {
        T::stored(self).iter().filter(move |row| predicate(row))
    }

    /// Inner join of race-keyed rows onto their race.
    pub fn join_races<'a, R, I>(&'a self, rows: I) -> impl Iterator<Item = (&'a RaceRow, &'a R)> + 'a
    where
        R: RaceKeyed + 'a,
        I: IntoIterator<Item = &'a R>,
        I::IntoIter: 'a,
    {
        rows.into_iter().filter_map(|row| self.race(row.race_id()).map(|race| (race, row)))
    }

    /// Inner join of car-keyed rows onto the result of the same car in the same race.
    ///
    /// This is how lap and pit rows learn which constructor the car belonged to.
    pub fn join_results<'a, R, I>(&'a self, rows: I) -> impl Iterator<Item = (&'a ResultRow, &'a R)> + 'a
    where
        R: CarKeyed + 'a,
        I: IntoIterator<Item = &'a R>,
        I::IntoIter: 'a,
    {
        rows.into_iter()
            .filter_map(|row| self.result_for(row.race_id(), row.driver_id()).map(|result| (result, row)))
    }

    #[must_use]
    pub fn race(&self, id: RaceId) -> Option<&RaceRow> {
        self.race_index.get(&id).map(|&i| &self.races[i])
    }

    #[must_use]
    pub fn driver(&self, id: DriverId) -> Option<&DriverRow> {
        self.driver_index.get(&id).map(|&i| &self.drivers[i])
    }

    #[must_use]
    pub fn constructor(&self, id: ConstructorId) -> Option<&ConstructorRow> {
        self.constructor_index.get(&id).map(|&i| &self.constructors[i])
    }

    /// Races matching `filter`, oldest first.
    pub fn races_in(&self, filter: SeasonFilter) -> impl Iterator<Item = &RaceRow> + '_ {
        self.races.iter().filter(move |r| filter.matches(r.season))
    }

    /// Position of a race in chronological order.
    #[must_use]
    pub fn race_ordinal(&self, id: RaceId) -> Option<usize> {
        self.race_index.get(&id).copied()
    }

    #[must_use]
    pub fn race_season(&self, id: RaceId) -> Option<u16> {
        self.race(id).map(|r| r.season)
    }

    /// Distinct seasons present in the store, oldest first.
    #[must_use]
    pub fn seasons(&self) -> Vec<u16> {
        let mut seasons: Vec<u16> = self.races.iter().map(|r| r.season).collect();
        seasons.dedup();
        seasons
    }

    /// Classification of a result's finishing status.
    #[must_use]
    pub fn finish_status(&self, result: &ResultRow) -> FinishStatus {
        self.status_kinds.get(&result.status_id).copied().unwrap_or(FinishStatus::Other)
    }

    /// Every result of a driver, DNFs included, oldest first.
    pub fn results_for_driver(&self, driver: DriverId, filter: SeasonFilter) -> impl Iterator<Item = &ResultRow> + '_ {
        self.indexed(&self.results, self.results_by_driver.get(&driver), filter)
    }

    /// Every result of a constructor's cars, DNFs included, oldest first.
    pub fn results_for_constructor(&self, constructor: ConstructorId, filter: SeasonFilter) -> impl Iterator<Item = &ResultRow> + '_ {
        self.indexed(&self.results, self.results_by_constructor.get(&constructor), filter)
    }

    /// Results of one race, in finishing order.
    pub fn results_for_race(&self, race: RaceId) -> impl Iterator<Item = &ResultRow> + '_ {
        self.indexed(&self.results, self.results_by_race.get(&race), SeasonFilter::Career)
    }

    #[must_use]
    pub fn result_for(&self, race: RaceId, driver: DriverId) -> Option<&ResultRow> {
        self.result_by_car.get(&(race, driver)).map(|&i| &self.results[i])
    }

    pub fn qualifying_for_driver(&self, driver: DriverId, filter: SeasonFilter) -> impl Iterator<Item = &QualifyingRow> + '_ {
        self.indexed(&self.qualifying, self.qualifying_by_driver.get(&driver), filter)
    }

    pub fn qualifying_for_constructor(
        &self,
        constructor: ConstructorId,
        filter: SeasonFilter,
    ) -> impl Iterator<Item = &QualifyingRow> + '_ {
        self.indexed(&self.qualifying, self.qualifying_by_constructor.get(&constructor), filter)
    }

    /// Qualifying results of one race, in grid order.
    pub fn qualifying_for_race(&self, race: RaceId) -> impl Iterator<Item = &QualifyingRow> + '_ {
        self.indexed(&self.qualifying, self.qualifying_by_race.get(&race), SeasonFilter::Career)
    }

    /// Laps of one race, grouped by driver and ordered by lap number.
    pub fn lap_times_for_race(&self, race: RaceId) -> impl Iterator<Item = &LapTimeRow> + '_ {
        self.indexed(&self.lap_times, self.laps_by_race.get(&race), SeasonFilter::Career)
    }

    /// Pit stops of one race, grouped by driver and ordered by stop number.
    pub fn pit_stops_for_race(&self, race: RaceId) -> impl Iterator<Item = &PitStopRow> + '_ {
        self.indexed(&self.pit_stops, self.pit_stops_by_race.get(&race), SeasonFilter::Career)
    }

    fn indexed<'a, R: RaceKeyed>(
        &'a self,
        rows: &'a [R],
        index: Option<&'a Vec<usize>>,
        filter: SeasonFilter,
    ) -> impl Iterator<Item = &'a R> + 'a {
        index
            .into_iter()
            .flatten()
            .map(move |&i| &rows[i])
            .filter(move |row| self.race_season(row.race_id()).is_some_and(|s| filter.matches(s)))
    }
}

struct FileReader<'a> {
    dir: &'a Utf8Path,
    hasher: &'a mut Sha256,
    loaded: &'a mut HashSet<TableId>,
    warnings: &'a mut Vec<IntegrityWarning>,
}

impl FileReader<'_> {
    fn read<T: Table>(&mut self) -> Result<Vec<T::Row>> {
        let path = self.dir.join(T::ID.csv_name());
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound && T::ID.is_optional() => {
                log::info!(target: LOG_TARGET, "Table '{path}' not present, metrics needing it are unavailable");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e).into_app_err_with(|| format!("reading table '{path}'")),
        };

        self.hasher.update(T::ID.csv_name().as_bytes());
        self.hasher.update(&bytes);

        let rows = read_rows::<T>(bytes.as_slice(), self.warnings).into_app_err_with(|| format!("loading table '{path}'"))?;
        let _ = self.loaded.insert(T::ID);
        log::debug!(target: LOG_TARGET, "Read {} rows from '{path}'", rows.len());
        Ok(rows)
    }
}

struct References<'a> {
    known_race_ids: &'a HashSet<RaceId>,
    race_index: &'a HashMap<RaceId, usize>,
    driver_index: &'a HashMap<DriverId, usize>,
    constructor_index: &'a HashMap<ConstructorId, usize>,
}

impl References<'_> {
    /// Checks the foreign keys of a row, recording a warning when one dangles.
    fn check(
        &self,
        table: TableId,
        race: RaceId,
        driver: DriverId,
        constructor: Option<ConstructorId>,
        warnings: &mut Vec<IntegrityWarning>,
    ) -> bool {
        if !self.race_index.contains_key(&race) {
            if !self.known_race_ids.contains(&race) {
                warnings.push(IntegrityWarning::dangling(table, 0, "race", race));
            }
            return false;
        }

        if !self.driver_index.contains_key(&driver) {
            warnings.push(IntegrityWarning::dangling(table, 0, "driver", driver));
            return false;
        }

        if let Some(constructor) = constructor
            && !self.constructor_index.contains_key(&constructor)
        {
            warnings.push(IntegrityWarning::dangling(table, 0, "constructor", constructor));
            return false;
        }

        true
    }
}

fn check_status(result: &ResultRow, status_kinds: &HashMap<StatusId, FinishStatus>, warnings: &mut Vec<IntegrityWarning>) -> bool {
    if status_kinds.contains_key(&result.status_id) {
        return true;
    }

    warnings.push(IntegrityWarning::dangling(TableId::Results, 0, "status", result.status_id));
    false
}

fn check_unique_car(result: &ResultRow, seen: &mut HashSet<(RaceId, DriverId)>, warnings: &mut Vec<IntegrityWarning>) -> bool {
    if seen.insert((result.race_id, result.driver_id)) {
        return true;
    }

    warnings.push(IntegrityWarning::malformed(
        TableId::Results,
        0,
        format!("duplicate result for driver {} in race {}", result.driver_id, result.race_id),
    ));
    false
}

fn dedup_by_id<R, K: Eq + core::hash::Hash + core::fmt::Display>(
    rows: Vec<R>,
    table: TableId,
    key: impl Fn(&R) -> K,
    warnings: &mut Vec<IntegrityWarning>,
) -> Vec<R> {
    let mut seen = HashSet::default();
    rows.into_iter()
        .filter(|row| {
            let id = key(row);
            if seen.contains(&id) {
                warnings.push(IntegrityWarning::malformed(table, 0, format!("duplicate id {id}")));
                false
            } else {
                let _ = seen.insert(id);
                true
            }
        })
        .collect()
}

fn summarize_warnings(warnings: &[IntegrityWarning]) {
    for table in TableId::iter() {
        let dropped: Vec<_> = warnings.iter().filter(|w| w.table == table).collect();
        if let Some(first) = dropped.first() {
            log::warn!(
                target: LOG_TARGET,
                "Dropped {} row(s) from '{}', first: {}",
                dropped.len(),
                table.csv_name(),
                first.reason
            );
        }
    }
}

/// Builds a [`TableStore`] in memory.
///
/// Rows go through the same integrity checks and indexing as a store loaded from disk.
/// Core tables count as loaded; a telemetry table counts as loaded once a row for it was
/// added or it was explicitly marked present. The builder starts with a small set of
/// common status codes: 1 `Finished`, 2 `Disqualified`, 3 `Accident`, 4 `Collision`,
/// 5 `Engine`, 6 `Gearbox`, 11 `+1 Lap` and 12 `+2 Laps`.
#[cfg(any(debug_assertions, test))]
#[derive(Debug)]
pub struct TableStoreBuilder {
    raw: RawTables,
    loaded: HashSet<TableId>,
    version: CompactString,
    min_season: u16,
}

#[cfg(any(debug_assertions, test))]
impl TableStoreBuilder {
    #[must_use]
    pub fn new(version: impl Into<CompactString>) -> Self {
        let loaded = TableId::iter().filter(|t| !t.is_optional()).collect();
        let statuses = [
            (1, "Finished"),
            (2, "Disqualified"),
            (3, "Accident"),
            (4, "Collision"),
            (5, "Engine"),
            (6, "Gearbox"),
            (11, "+1 Lap"),
            (12, "+2 Laps"),
        ]
        .into_iter()
        .map(|(id, text)| StatusRow {
            id: StatusId(id),
            text: text.into(),
        })
        .collect();

        Self {
            raw: RawTables {
                statuses,
                ..RawTables::default()
            },
            loaded,
            version: version.into(),
            min_season: 0,
        }
    }

    #[must_use]
    pub const fn min_season(mut self, min_season: u16) -> Self {
        self.min_season = min_season;
        self
    }

    /// Marks a telemetry table as present even when it has no rows.
    #[must_use]
    pub fn with_table(mut self, table: TableId) -> Self {
        let _ = self.loaded.insert(table);
        self
    }

    #[must_use]
    pub fn race(mut self, id: u32, season: u16, round: u8) -> Self {
        let date = chrono::NaiveDate::from_ymd_opt(i32::from(season), 1, 1)
            .and_then(|d| d.checked_add_days(chrono::Days::new(u64::from(round) * 14)))
            .unwrap_or_default();

        self.raw.races.push(RaceRow {
            id: RaceId(id),
            season,
            round,
            circuit_id: super::CircuitId(id),
            name: compact_str::format_compact!("Round {round} of {season}"),
            date,
        });
        self
    }

    #[must_use]
    pub fn driver(mut self, id: u32, code: &str, surname: &str) -> Self {
        self.raw.drivers.push(DriverRow {
            id: DriverId(id),
            reference: surname.to_ascii_lowercase().into(),
            code: Some(code.into()),
            forename: "Test".into(),
            surname: surname.into(),
            birth_date: None,
            nationality: "Nowhere".into(),
        });
        self
    }

    #[must_use]
    pub fn constructor(mut self, id: u32, name: &str) -> Self {
        self.raw.constructors.push(ConstructorRow {
            id: ConstructorId(id),
            reference: name.to_ascii_lowercase().into(),
            name: name.into(),
            nationality: "Nowhere".into(),
        });
        self
    }

    #[must_use]
    pub fn status(mut self, id: u32, text: &str) -> Self {
        self.raw.statuses.push(StatusRow {
            id: StatusId(id),
            text: text.into(),
        });
        self
    }

    /// Adds a result. Classified cars complete 50 laps, others 20.
    #[must_use]
    #[expect(clippy::too_many_arguments, reason = "Mirrors the columns of a result row")]
    pub fn result(
        self,
        race: u32,
        driver: u32,
        constructor: u32,
        grid: Option<u8>,
        position: Option<u8>,
        points: f64,
        status: u32,
    ) -> Self {
        let laps = if position.is_some() { 50 } else { 20 };
        self.result_row(ResultRow {
            race_id: RaceId(race),
            driver_id: DriverId(driver),
            constructor_id: ConstructorId(constructor),
            grid,
            position,
            position_order: position.map_or(99, u16::from),
            points,
            laps,
            fastest_lap_rank: None,
            status_id: StatusId(status),
        })
    }

    #[must_use]
    pub fn result_row(mut self, row: ResultRow) -> Self {
        self.raw.results.push(row);
        self
    }

    #[must_use]
    pub fn qualifying(mut self, race: u32, driver: u32, constructor: u32, position: Option<u8>) -> Self {
        self.raw.qualifying.push(QualifyingRow {
            race_id: RaceId(race),
            driver_id: DriverId(driver),
            constructor_id: ConstructorId(constructor),
            position,
            q1: None,
            q2: None,
            q3: None,
        });
        self.with_table(TableId::Qualifying)
    }

    #[must_use]
    pub fn lap(mut self, race: u32, driver: u32, lap: u16, millis: u32) -> Self {
        self.raw.lap_times.push(LapTimeRow {
            race_id: RaceId(race),
            driver_id: DriverId(driver),
            lap,
            position: None,
            millis,
        });
        self.with_table(TableId::LapTimes)
    }

    #[must_use]
    pub fn pit_stop(mut self, race: u32, driver: u32, stop: u8, lap: u16, millis: Option<u32>) -> Self {
        self.raw.pit_stops.push(PitStopRow {
            race_id: RaceId(race),
            driver_id: DriverId(driver),
            stop,
            lap,
            millis,
        });
        self.with_table(TableId::PitStops)
    }

    #[must_use]
    pub fn build(self) -> TableStore {
        TableStore::assemble(self.raw, self.loaded, Vec::new(), self.version, self.min_season)
    }
}
