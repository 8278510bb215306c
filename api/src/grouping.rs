//! Display grouping derived from composite pool and league names.
//!
//! Pool names encode a hierarchy as `"Group - Sub"` or
//! `"Region - Division - Pool"`. The backend sends no explicit group, so the
//! group is parsed from the shape of the name by [`group_pool_name`].

use crate::{Pool, TeamInfo};
use std::collections::BTreeMap;

/// Group for names that carry no hierarchy.
pub const OTHER_GROUP: &str = "Andet";

const SEPARATOR: &str = " - ";

/// Group name → pools, keys and pools sorted by name.
pub type GroupedPools = BTreeMap<String, Vec<Pool>>;

/// The display group a pool name belongs to.
///
/// - three or more segments: the first two, e.g. `"Lunar Ligaen - Herrer"`
/// - two segments ending in a sub-pool letter `A`–`P`: the first segment
/// - two segments otherwise: the whole name
/// - one segment: [`OTHER_GROUP`]
pub fn group_pool_name(name: &str) -> String {
    let segments: Vec<&str> = name.split(SEPARATOR).collect();
    match segments.as_slice() {
        [first, second, _, ..] => format!("{first}{SEPARATOR}{second}"),
        [first, suffix] if is_sub_pool_letter(suffix) => (*first).to_owned(),
        [_, _] => name.to_owned(),
        _ => OTHER_GROUP.to_owned(),
    }
}

fn is_sub_pool_letter(segment: &str) -> bool {
    matches!(segment.as_bytes(), [b'A'..=b'P'])
}

pub fn group_pools_by_name(pools: impl IntoIterator<Item = Pool>) -> GroupedPools {
    let mut groups = GroupedPools::new();
    for pool in pools {
        groups.entry(group_pool_name(&pool.name)).or_default().push(pool);
    }
    for pools in groups.values_mut() {
        pools.sort_by(|a, b| a.name.cmp(&b.name));
    }
    groups
}

/// Teams keyed by league name, in input order within each league. Teams with
/// no league name land in [`OTHER_GROUP`].
pub fn group_teams_by_league<T>(teams: &[T]) -> BTreeMap<String, Vec<T>>
where
    T: AsRef<TeamInfo> + Clone,
{
    let mut groups: BTreeMap<String, Vec<T>> = BTreeMap::new();
    for team in teams {
        let league = team.as_ref().team_league_name.trim();
        let key = if league.is_empty() { OTHER_GROUP } else { league };
        groups.entry(key.to_owned()).or_default().push(team.clone());
    }
    groups
}
