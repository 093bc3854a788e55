use crate::metrics::stats::ratio;
use crate::metrics::{MetaValue, Measurement};
use crate::tables::{DriverId, ResultRow, SeasonFilter, TableStore};
use compact_str::CompactString;
use core::cmp::Ordering;
use std::collections::BTreeMap;

#[derive(Default)]
struct HeadToHead {
    ahead: usize,
    total: usize,
    by_teammate: BTreeMap<CompactString, (u64, u64)>,
}

impl HeadToHead {
    fn record(&mut self, tables: &TableStore, teammate: DriverId, ahead: bool) {
        self.total += 1;
        if ahead {
            self.ahead += 1;
        }

        let name = tables
            .driver(teammate)
            .map_or_else(|| compact_str::format_compact!("{teammate}"), |d| d.reference.clone());
        let entry = self.by_teammate.entry(name).or_default();
        entry.0 += u64::from(ahead);
        entry.1 += 1;
    }

    fn into_measurement(self, what: &str) -> Measurement {
        let breakdown = self
            .by_teammate
            .into_iter()
            .map(|(name, (ahead, total))| {
                let record = BTreeMap::from([
                    (CompactString::const_new("ahead"), MetaValue::UInt(ahead)),
                    (CompactString::const_new("comparisons"), MetaValue::UInt(total)),
                ]);
                (name, MetaValue::Map(record))
            })
            .collect();

        ratio(self.ahead, self.total).map_or_else(
            || Measurement::insufficient(0, compact_str::format_compact!("no {what} alongside a teammate")),
            |rate| {
                Measurement::float(rate, self.total)
                    .with("ahead", self.ahead)
                    .with("behind", self.total - self.ahead)
                    .with("teammates", MetaValue::Map(breakdown))
            },
        )
    }
}

/// Share of qualifying sessions in which the driver out-qualified a teammate.
///
/// Teammates are the other drivers of the same constructor in the same session, so a
/// driver switching teams mid-season is compared against the new teammates from then on.
pub fn qualifying_comparison(tables: &TableStore, driver: DriverId, season: SeasonFilter) -> Measurement {
    let mut h2h = HeadToHead::default();

    for mine in tables.qualifying_for_driver(driver, season) {
        let Some(my_pos) = mine.position else { continue };
        for theirs in tables
            .qualifying_for_race(mine.race_id)
            .filter(|q| q.constructor_id == mine.constructor_id && q.driver_id != driver)
        {
            if let Some(their_pos) = theirs.position {
                h2h.record(tables, theirs.driver_id, my_pos < their_pos);
            }
        }
    }

    h2h.into_measurement("qualifying sessions")
}

/// Who came out ahead: a finisher beats a non-finisher, two non-finishers are ranked by
/// laps completed, and equal laps are no comparison at all.
fn race_outcome(mine: &ResultRow, theirs: &ResultRow) -> Option<bool> {
    match (mine.position, theirs.position) {
        (Some(a), Some(b)) => Some(a < b),
        (Some(_), None) => Some(true),
        (None, Some(_)) => Some(false),
        (None, None) => match mine.laps.cmp(&theirs.laps) {
            Ordering::Greater => Some(true),
            Ordering::Less => Some(false),
            Ordering::Equal => None,
        },
    }
}

/// Share of races in which the driver finished ahead of a teammate.
pub fn race_comparison(tables: &TableStore, driver: DriverId, season: SeasonFilter) -> Measurement {
    let mut h2h = HeadToHead::default();

    for mine in tables.results_for_driver(driver, season) {
        for theirs in tables
            .results_for_race(mine.race_id)
            .filter(|r| r.constructor_id == mine.constructor_id && r.driver_id != driver)
        {
            if let Some(ahead) = race_outcome(mine, theirs) {
                h2h.record(tables, theirs.driver_id, ahead);
            }
        }
    }

    h2h.into_measurement("races")
}
