use log::{info, warn};

use crate::config::{DatasetConfig, LinkageConfig, DATASET_A, DATASET_B};
use crate::error::{LinkageError, Stage};
use crate::group::group_records;
use crate::link::link_groups;
use crate::metrics::{compute_metrics, log_metrics};
use crate::model::{
    ExtractReport, ExtractStats, Grouping, LinkageInput, LinkageMeta, LinkageResult, LinkedPair,
    RawRecord,
};
use crate::normalize::normalize_records;

/// Canonical groups of both datasets.
#[derive(Debug, Clone)]
pub struct Transformed {
    pub grouping_a: Grouping,
    pub grouping_b: Grouping,
}

/// Run the full pipeline (transform, match, metrics) on pre-loaded records.
pub fn run(config: &LinkageConfig, input: &LinkageInput) -> Result<LinkageResult, LinkageError> {
    config.validate().map_err(|e| e.in_stage(Stage::Transform))?;

    let transformed = transform(config, input);
    let pairs = match_groups(config, &transformed);

    let metrics = compute_metrics(
        &pairs,
        &transformed.grouping_b,
        config.metrics.one_to_many_denominator,
    );
    log_metrics(&metrics);

    Ok(LinkageResult {
        meta: LinkageMeta {
            config_name: config.name.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            threshold: config.matching.threshold,
            empty_addresses: config.matching.empty_addresses,
            one_to_many_denominator: config.metrics.one_to_many_denominator,
        },
        extract: ExtractReport {
            dataset_a: input.stats_a,
            dataset_b: input.stats_b,
        },
        metrics,
        pairs,
    })
}

// ---------------------------------------------------------------------------
// Stages
// ---------------------------------------------------------------------------

/// Parse both datasets' CSV text into raw records.
pub fn extract(
    config: &LinkageConfig,
    csv_a: &str,
    csv_b: &str,
) -> Result<LinkageInput, LinkageError> {
    info!("extracting data...");
    let (records_a, stats_a) = load_csv_records(&config.dataset_a, &config.company_column, csv_a)
        .map_err(|e| e.in_stage(Stage::Extract))?;
    let (records_b, stats_b) = load_csv_records(&config.dataset_b, &config.company_column, csv_b)
        .map_err(|e| e.in_stage(Stage::Extract))?;

    for (label, stats) in [(DATASET_A, &stats_a), (DATASET_B, &stats_b)] {
        if stats.missing_company > 0 {
            warn!(
                "{label}: {} of {} row(s) have no company name",
                stats.missing_company, stats.rows
            );
        }
        info!(
            "{label}: {} row(s), {} empty address cell(s), {} empty zip(s)",
            stats.rows, stats.missing_address_cells, stats.missing_zip
        );
    }
    info!("data extracted successfully");

    Ok(LinkageInput {
        records_a,
        records_b,
        stats_a,
        stats_b,
    })
}

/// Normalize and group both datasets.
pub fn transform(config: &LinkageConfig, input: &LinkageInput) -> Transformed {
    info!("transforming data...");

    info!("normalizing data...");
    let normalized_a = normalize_records(&input.records_a, &config.dataset_a);
    let normalized_b = normalize_records(&input.records_b, &config.dataset_b);
    info!("data normalized successfully");

    let grouping_a = group_records(&normalized_a);
    let grouping_b = group_records(&normalized_b);
    info!(
        "data transformed successfully: {} canonical key(s) in {DATASET_A}, {} in {DATASET_B}",
        grouping_a.groups.len(),
        grouping_b.groups.len()
    );

    Transformed { grouping_a, grouping_b }
}

/// Join the groupings and compute address overlap per pair.
pub fn match_groups(config: &LinkageConfig, transformed: &Transformed) -> Vec<LinkedPair> {
    info!("matching data...");
    let pairs = link_groups(
        &transformed.grouping_a.groups,
        &transformed.grouping_b.groups,
        &config.matching,
    );
    info!("data was matched successfully: {} pair(s)", pairs.len());
    pairs
}

// ---------------------------------------------------------------------------
// CSV ingestion
// ---------------------------------------------------------------------------

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(|v| v.to_string())
}

/// Parse one dataset's CSV text into raw records.
///
/// The company column is required. Address columns are required, except the
/// zip column, which may be absent even when it is listed as an address
/// column. Empty cells and short rows read as missing values.
pub fn load_csv_records(
    dataset: &DatasetConfig,
    company_column: &str,
    csv_data: &str,
) -> Result<(Vec<RawRecord>, ExtractStats), LinkageError> {
    let csv_err = |e: csv::Error| LinkageError::Csv {
        dataset: dataset.label.clone(),
        message: e.to_string(),
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_data.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let position = |name: &str| headers.iter().position(|h| h == name);
    let require = |name: &str| -> Result<usize, LinkageError> {
        position(name).ok_or_else(|| LinkageError::MissingColumn {
            dataset: dataset.label.clone(),
            column: name.into(),
        })
    };

    let company_idx = require(company_column)?;
    let zip_idx = dataset.zip_column.as_deref().and_then(|zip| position(zip));

    let mut address_idx = Vec::with_capacity(dataset.address_columns.len());
    for col in &dataset.address_columns {
        if dataset.zip_column.as_deref() == Some(col.as_str()) {
            address_idx.push(zip_idx);
        } else {
            address_idx.push(Some(require(col)?));
        }
    }

    let mut stats = ExtractStats::default();
    let mut records = Vec::new();

    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        let cell = |idx: Option<usize>| non_empty(idx.and_then(|i| record.get(i)));

        let company = cell(Some(company_idx));
        let address_components: Vec<Option<String>> =
            address_idx.iter().map(|&idx| cell(idx)).collect();
        let zip = cell(zip_idx);

        stats.rows += 1;
        if company.is_none() {
            stats.missing_company += 1;
        }
        stats.missing_address_cells += address_components.iter().filter(|c| c.is_none()).count();
        if dataset.zip_column.is_some() && zip.is_none() {
            stats.missing_zip += 1;
        }

        records.push(RawRecord {
            company,
            address_components,
            zip,
        });
    }

    Ok((records, stats))
}
