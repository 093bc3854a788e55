//! Championship standings derived from race points.
//!
//! The dataset carries no standings tables, so final positions are rebuilt from the
//! results of a season: total points descending, then wins descending, then the
//! earliest first win, then id.

use crate::tables::{ConstructorId, DriverId, ResultRow, SeasonFilter, TableStore};
use core::cmp::Ordering;
use core::hash::Hash;

#[derive(Debug, Clone, PartialEq)]
pub struct Standing<K> {
    pub id: K,
    pub position: u32,
    pub points: f64,
    pub wins: u32,
    pub races: u32,
}

#[derive(Debug)]
struct Tally<K> {
    id: K,
    points: f64,
    wins: u32,
    races: u32,
    first_win: Option<usize>,
}

fn standings<K>(tables: &TableStore, season: u16, key: impl Fn(&ResultRow) -> K) -> Vec<Standing<K>>
where
    K: Copy + Eq + Hash + Ord,
{
    let mut tallies: Vec<Tally<K>> = Vec::new();
    let mut slots = crate::HashMap::<K, usize>::default();
    let mut counted = crate::HashSet::<(K, crate::tables::RaceId)>::default();

    for (ordinal, race) in tables.races_in(SeasonFilter::Season(season)).enumerate() {
        for result in tables.results_for_race(race.id) {
            let id = key(result);
            let slot = *slots.entry(id).or_insert_with(|| {
                tallies.push(Tally {
                    id,
                    points: 0.0,
                    wins: 0,
                    races: 0,
                    first_win: None,
                });
                tallies.len() - 1
            });

            let tally = &mut tallies[slot];
            tally.points += result.points;
            if counted.insert((id, race.id)) {
                tally.races += 1;
            }

            if result.is_win() {
                tally.wins += 1;
                let _ = tally.first_win.get_or_insert(ordinal);
            }
        }
    }

    tallies.sort_by(|a, b| {
        b.points
            .total_cmp(&a.points)
            .then_with(|| b.wins.cmp(&a.wins))
            .then_with(|| match (a.first_win, b.first_win) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            })
            .then_with(|| a.id.cmp(&b.id))
    });

    tallies
        .into_iter()
        .zip(1..)
        .map(|(t, position)| Standing {
            id: t.id,
            position,
            points: t.points,
            wins: t.wins,
            races: t.races,
        })
        .collect()
}

#[must_use]
pub fn driver_standings(tables: &TableStore, season: u16) -> Vec<Standing<DriverId>> {
    standings(tables, season, |r| r.driver_id)
}

#[must_use]
pub fn constructor_standings(tables: &TableStore, season: u16) -> Vec<Standing<ConstructorId>> {
    standings(tables, season, |r| r.constructor_id)
}

/// Seasons within `filter` in which `id` took part, with its standing in each.
pub fn seasons_of<K: Copy + Eq>(
    tables: &TableStore,
    filter: SeasonFilter,
    id: K,
    table_for: impl Fn(&TableStore, u16) -> Vec<Standing<K>>,
) -> Vec<(u16, Standing<K>)> {
    tables
        .seasons()
        .into_iter()
        .filter(|s| filter.matches(*s))
        .filter_map(|season| {
            table_for(tables, season)
                .into_iter()
                .find(|s| s.id == id)
                .map(|standing| (season, standing))
        })
        .collect()
}
