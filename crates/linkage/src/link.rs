use std::collections::{BTreeSet, HashMap};

use log::debug;

use crate::config::MatchConfig;
use crate::matcher::fuzzy_overlap;
use crate::model::{CanonicalGroup, LinkedPair};

/// Left outer join of dataset A's groups against dataset B's on canonical
/// name, with the address overlap filled in for every pair.
///
/// Every A group yields exactly one pair, in A's order. A keys with no B
/// group carry no B name, no B locations and an empty overlap.
pub fn link_groups(
    groups_a: &[CanonicalGroup],
    groups_b: &[CanonicalGroup],
    config: &MatchConfig,
) -> Vec<LinkedPair> {
    let right_map: HashMap<&str, &CanonicalGroup> = groups_b
        .iter()
        .map(|g| (g.canonical_name.as_str(), g))
        .collect();

    groups_a
        .iter()
        .map(|left| {
            let right = right_map.get(left.canonical_name.as_str()).copied();
            let overlapping_locations =
                fuzzy_overlap(&left.locations, right.map(|r| &r.locations), config);

            debug!(
                "key '{}': {} A record(s) at {} location(s), {} B record(s) at {} location(s), {} overlapping",
                left.canonical_name,
                left.record_count,
                left.locations.len(),
                right.map_or(0, |r| r.record_count),
                right.map_or(0, |r| r.locations.len()),
                overlapping_locations.len()
            );

            LinkedPair {
                canonical_name: left.canonical_name.clone(),
                display_name_a: left.display_name.clone(),
                display_name_b: right.map(|r| r.display_name.clone()),
                locations_a: left.locations.clone(),
                locations_b: right.map(|r| r.locations.clone()).unwrap_or_else(BTreeSet::new),
                overlapping_locations,
            }
        })
        .collect()
}
