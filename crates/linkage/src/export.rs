use std::collections::BTreeSet;

use crate::error::LinkageError;
use crate::model::{LinkageResult, LinkedPair};

/// Separator for list-valued output columns.
pub const LIST_SEPARATOR: &str = "; ";

/// Key column name in the output table.
pub const KEY_COLUMN: &str = "clean_name";

fn join_list(items: &BTreeSet<String>) -> String {
    items
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR)
}

/// Output header. Company columns are named after the input's company
/// column, with `_ds2` marking dataset B.
pub fn csv_headers(company_column: &str) -> [String; 6] {
    [
        KEY_COLUMN.to_string(),
        company_column.to_string(),
        format!("{company_column}_ds2"),
        "locations_ds1".to_string(),
        "locations_ds2".to_string(),
        "overlapping_locations".to_string(),
    ]
}

/// Render the linked pairs as a CSV table, entirely in memory.
///
/// Empty lists and unmatched B names become empty cells.
pub fn render_csv(pairs: &[LinkedPair], company_column: &str) -> Result<String, LinkageError> {
    let csv_err = |e: csv::Error| LinkageError::Csv {
        dataset: "output".into(),
        message: e.to_string(),
    };

    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(csv_headers(company_column)).map_err(csv_err)?;

    for pair in pairs {
        let locations_a = join_list(&pair.locations_a);
        let locations_b = join_list(&pair.locations_b);
        let overlapping = join_list(&pair.overlapping_locations);
        writer
            .write_record([
                pair.canonical_name.as_str(),
                pair.display_name_a.as_str(),
                pair.display_name_b.as_deref().unwrap_or(""),
                locations_a.as_str(),
                locations_b.as_str(),
                overlapping.as_str(),
            ])
            .map_err(csv_err)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| LinkageError::Io(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| LinkageError::Io(e.to_string()))
}

/// Pretty JSON report of a full run.
pub fn render_json(result: &LinkageResult) -> Result<String, LinkageError> {
    serde_json::to_string_pretty(result)
        .map_err(|e| LinkageError::Io(format!("JSON serialization error: {e}")))
}
