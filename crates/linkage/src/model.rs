use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::config::{EmptyAddressPolicy, OneToManyDenominator};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One row from a source dataset, as read. Missing or short cells are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    pub company: Option<String>,
    /// Address components in configured column order.
    pub address_components: Vec<Option<String>>,
    pub zip: Option<String>,
}

/// Rows of both datasets, already parsed.
#[derive(Debug, Clone, Default)]
pub struct LinkageInput {
    pub records_a: Vec<RawRecord>,
    pub records_b: Vec<RawRecord>,
    pub stats_a: ExtractStats,
    pub stats_b: ExtractStats,
}

/// Data-quality counters gathered while reading one dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExtractStats {
    pub rows: usize,
    pub missing_company: usize,
    pub missing_address_cells: usize,
    pub missing_zip: usize,
}

// ---------------------------------------------------------------------------
// Normalization + Grouping
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRecord {
    /// Grouping and join key.
    pub canonical_name: String,
    /// Company name as it appeared in the source (empty when missing).
    pub display_name: String,
    pub normalized_address: String,
    /// Whitespace-free zip; only populated when the dataset has a zip column.
    pub zip: Option<String>,
}

/// All records of one dataset sharing a canonical name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalGroup {
    pub canonical_name: String,
    /// First-seen company name for this key.
    pub display_name: String,
    pub locations: BTreeSet<String>,
    pub record_count: usize,
}

/// Output of grouping one dataset.
#[derive(Debug, Clone, Default)]
pub struct Grouping {
    /// One group per canonical name, ordered by key.
    pub groups: Vec<CanonicalGroup>,
    /// Number of distinct non-empty display names seen under each key.
    pub name_counts: BTreeMap<String, usize>,
}

impl Grouping {
    /// Keys that collapsed more than one distinct company name.
    pub fn one_to_many_count(&self) -> usize {
        self.name_counts.values().filter(|&&n| n > 1).count()
    }
}

// ---------------------------------------------------------------------------
// Linkage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkedPair {
    pub canonical_name: String,
    pub display_name_a: String,
    pub display_name_b: Option<String>,
    pub locations_a: BTreeSet<String>,
    pub locations_b: BTreeSet<String>,
    /// Subset of `locations_a` with a close enough counterpart in `locations_b`.
    pub overlapping_locations: BTreeSet<String>,
}

impl LinkedPair {
    pub fn is_matched(&self) -> bool {
        self.display_name_b.is_some()
    }
}

// ---------------------------------------------------------------------------
// Metrics + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkageMetrics {
    pub total_pairs: usize,
    pub matched_count: usize,
    pub unmatched_count: usize,
    pub one_to_many_count: usize,
    /// Divisor used for `one_to_many_rate`.
    pub one_to_many_base: usize,
    pub match_rate: f64,
    pub unmatched_rate: f64,
    pub one_to_many_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LinkageMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
    pub threshold: u8,
    pub empty_addresses: EmptyAddressPolicy,
    pub one_to_many_denominator: OneToManyDenominator,
}

/// Data-quality counters of both datasets, as carried into the report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExtractReport {
    pub dataset_a: ExtractStats,
    pub dataset_b: ExtractStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct LinkageResult {
    pub meta: LinkageMeta,
    pub extract: ExtractReport,
    pub metrics: LinkageMetrics,
    pub pairs: Vec<LinkedPair>,
}
