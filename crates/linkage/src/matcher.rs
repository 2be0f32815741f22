use std::collections::BTreeSet;

use crate::config::{EmptyAddressPolicy, MatchConfig};
use crate::similarity::{rounded_ratio, sort_tokens};

/// Addresses from `addresses_a` that have at least one counterpart in
/// `addresses_b` scoring at or above the threshold.
///
/// The scan over B stops at the first hit, so this is "has a close
/// counterpart", not a one-to-one assignment. An absent B side (no group
/// with this key) yields an empty set.
pub fn fuzzy_overlap(
    addresses_a: &BTreeSet<String>,
    addresses_b: Option<&BTreeSet<String>>,
    config: &MatchConfig,
) -> BTreeSet<String> {
    let Some(addresses_b) = addresses_b else {
        return BTreeSet::new();
    };
    let skip_blank = config.empty_addresses == EmptyAddressPolicy::Exclude;

    // Token-sort each B candidate once.
    let candidates: Vec<String> = addresses_b
        .iter()
        .map(|b| sort_tokens(b))
        .filter(|b| !(skip_blank && b.is_empty()))
        .collect();

    let mut overlap = BTreeSet::new();
    for addr_a in addresses_a {
        let sorted_a = sort_tokens(addr_a);
        if skip_blank && sorted_a.is_empty() {
            continue;
        }
        if candidates
            .iter()
            .any(|b| rounded_ratio(&sorted_a, b) >= config.threshold)
        {
            overlap.insert(addr_a.clone());
        }
    }
    overlap
}
