use log::info;

use crate::config::OneToManyDenominator;
use crate::model::{Grouping, LinkageMetrics, LinkedPair};

fn rate(count: usize, base: usize) -> f64 {
    if base == 0 {
        0.0
    } else {
        count as f64 / base as f64 * 100.0
    }
}

/// Match, unmatched and one-to-many rates over the linked pairs.
///
/// The one-to-many count comes from dataset B's grouping (keys that
/// collapsed several distinct names). By default it is divided by the number
/// of pairs, which is anchored on dataset A.
pub fn compute_metrics(
    pairs: &[LinkedPair],
    grouping_b: &Grouping,
    denominator: OneToManyDenominator,
) -> LinkageMetrics {
    let total_pairs = pairs.len();
    let matched_count = pairs.iter().filter(|p| p.is_matched()).count();
    let unmatched_count = total_pairs - matched_count;
    let one_to_many_count = grouping_b.one_to_many_count();
    let one_to_many_base = match denominator {
        OneToManyDenominator::JoinedPairs => total_pairs,
        OneToManyDenominator::DatasetBKeys => grouping_b.groups.len(),
    };

    LinkageMetrics {
        total_pairs,
        matched_count,
        unmatched_count,
        one_to_many_count,
        one_to_many_base,
        match_rate: rate(matched_count, total_pairs),
        unmatched_rate: rate(unmatched_count, total_pairs),
        one_to_many_rate: rate(one_to_many_count, one_to_many_base),
    }
}

/// Operator-facing metrics block.
pub fn log_metrics(metrics: &LinkageMetrics) {
    info!("--- Matching Metrics ---");
    info!(
        "Match Rate: {:.2}% ({} records)",
        metrics.match_rate, metrics.matched_count
    );
    info!(
        "Unmatched Records: {:.2}% ({} records)",
        metrics.unmatched_rate, metrics.unmatched_count
    );
    info!(
        "One-to-Many Matches: {:.2}% ({} cases)",
        metrics.one_to_many_rate, metrics.one_to_many_count
    );
    info!("------------------------");
}
