use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::model::{CanonicalGroup, Grouping, NormalizedRecord};

struct GroupAcc<'a> {
    display_name: &'a str,
    locations: BTreeSet<String>,
    record_count: usize,
    names: HashSet<&'a str>,
}

/// Group records by canonical name.
///
/// The first record seen for a key supplies the display name. Locations are
/// the distinct normalized addresses under the key, the empty address
/// included. Alongside the groups, count the distinct non-empty display names
/// per key so one-to-many collapses can be reported later.
pub fn group_records(records: &[NormalizedRecord]) -> Grouping {
    let mut groups: BTreeMap<&str, GroupAcc<'_>> = BTreeMap::new();

    for rec in records {
        let entry = groups
            .entry(rec.canonical_name.as_str())
            .or_insert_with(|| GroupAcc {
                display_name: rec.display_name.as_str(),
                locations: BTreeSet::new(),
                record_count: 0,
                names: HashSet::new(),
            });
        entry.locations.insert(rec.normalized_address.clone());
        entry.record_count += 1;
        if !rec.display_name.is_empty() {
            entry.names.insert(rec.display_name.as_str());
        }
    }

    let mut name_counts = BTreeMap::new();
    let groups = groups
        .into_iter()
        .map(|(key, acc)| {
            name_counts.insert(key.to_string(), acc.names.len());
            CanonicalGroup {
                canonical_name: key.to_string(),
                display_name: acc.display_name.to_string(),
                locations: acc.locations,
                record_count: acc.record_count,
            }
        })
        .collect();

    Grouping { groups, name_counts }
}
