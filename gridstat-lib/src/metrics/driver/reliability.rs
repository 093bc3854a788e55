use crate::metrics::stats::ratio;
use crate::metrics::{MetaValue, Measurement};
use crate::tables::{DriverId, FinishStatus, SeasonFilter, TableStore};
use std::collections::BTreeMap;

struct Tally {
    entries: usize,
    dnfs: usize,
    mechanical: usize,
    by_status: BTreeMap<compact_str::CompactString, MetaValue>,
}

fn tally(tables: &TableStore, driver: DriverId, season: SeasonFilter) -> Tally {
    let mut t = Tally {
        entries: 0,
        dnfs: 0,
        mechanical: 0,
        by_status: BTreeMap::new(),
    };

    let mut counts: BTreeMap<compact_str::CompactString, u64> = BTreeMap::new();
    for result in tables.results_for_driver(driver, season) {
        t.entries += 1;
        if result.is_classified() {
            continue;
        }

        t.dnfs += 1;
        let status = tables.finish_status(result);
        if status == FinishStatus::Mechanical {
            t.mechanical += 1;
        }
        *counts.entry(status.to_string().into()).or_default() += 1;
    }

    t.by_status = counts.into_iter().map(|(k, v)| (k, MetaValue::UInt(v))).collect();
    t
}

pub fn dnf_rate(tables: &TableStore, driver: DriverId, season: SeasonFilter) -> Measurement {
    let t = tally(tables, driver, season);
    ratio(t.dnfs, t.entries).map_or_else(
        || Measurement::insufficient(0, "no race entries"),
        |rate| Measurement::float(rate, t.entries).with("dnfs", t.dnfs).with("dnf_causes", MetaValue::Map(t.by_status)),
    )
}

pub fn finish_rate(tables: &TableStore, driver: DriverId, season: SeasonFilter) -> Measurement {
    let t = tally(tables, driver, season);
    let finishes = t.entries - t.dnfs;
    ratio(finishes, t.entries).map_or_else(
        || Measurement::insufficient(0, "no race entries"),
        |rate| Measurement::float(rate, t.entries).with("finishes", finishes),
    )
}

pub fn mechanical_failure_rate(tables: &TableStore, driver: DriverId, season: SeasonFilter) -> Measurement {
    let t = tally(tables, driver, season);
    ratio(t.mechanical, t.entries).map_or_else(
        || Measurement::insufficient(0, "no race entries"),
        |rate| Measurement::float(rate, t.entries).with("mechanical_failures", t.mechanical),
    )
}
