//! `complink run` / `complink validate`: config-driven company linkage.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;

use complink_linkage::config::DatasetConfig;
use complink_linkage::export::{render_csv, render_json};
use complink_linkage::{LinkageConfig, LinkageError, LinkageResult, Stage};

use crate::CliError;

/// Read and parse a config file. Returns the config together with the
/// directory its relative paths resolve against.
fn load_config(config_path: &Path) -> Result<(LinkageConfig, PathBuf), CliError> {
    let config_str = fs::read_to_string(config_path).map_err(|e| {
        CliError::input(format!("cannot read config {}: {e}", config_path.display()))
    })?;
    let config = LinkageConfig::from_toml(&config_str).map_err(CliError::linkage)?;
    let base_dir = config_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    Ok((config, base_dir))
}

fn read_dataset(base_dir: &Path, dataset: &DatasetConfig) -> Result<String, CliError> {
    let path = base_dir.join(&dataset.file);
    fs::read_to_string(&path).map_err(|e| {
        CliError::linkage(
            LinkageError::Io(format!("cannot read {} ({}): {e}", path.display(), dataset.label))
                .in_stage(Stage::Extract),
        )
    })
}

fn tmp_sibling(path: &Path) -> Result<PathBuf, LinkageError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| LinkageError::Io(format!("not a file path: {}", path.display())))?;
    let mut tmp_name = file_name.to_os_string();
    tmp_name.push(".tmp");
    Ok(path.with_file_name(tmp_name))
}

fn remove_all(paths: &[PathBuf]) {
    for path in paths {
        let _ = fs::remove_file(path);
    }
}

/// Write every `(path, contents)` to a temp sibling first, then rename them
/// all into place. Nothing is renamed unless every temp file was written,
/// and temp files are removed on failure.
fn write_all_atomic(outputs: &[(&Path, String)]) -> Result<(), LinkageError> {
    let mut staged: Vec<PathBuf> = Vec::with_capacity(outputs.len());
    for (path, contents) in outputs {
        let tmp_path = match tmp_sibling(path) {
            Ok(tmp_path) => tmp_path,
            Err(e) => {
                remove_all(&staged);
                return Err(e);
            }
        };
        if let Err(e) = fs::write(&tmp_path, contents) {
            remove_all(&staged);
            let _ = fs::remove_file(&tmp_path);
            return Err(LinkageError::Io(format!("cannot write {}: {e}", tmp_path.display())));
        }
        staged.push(tmp_path);
    }

    for (i, (path, _)) in outputs.iter().enumerate() {
        if let Err(e) = fs::rename(&staged[i], path) {
            remove_all(&staged[i..]);
            return Err(LinkageError::Io(format!(
                "cannot move output into {}: {e}",
                path.display()
            )));
        }
    }
    Ok(())
}

/// Load stage: render the CSV table (and JSON report, if asked for), then
/// write them out together.
fn load(
    config: &LinkageConfig,
    result: &LinkageResult,
    csv_path: &Path,
    report_path: Option<&Path>,
) -> Result<(), LinkageError> {
    info!("loading data...");
    let mut outputs = vec![(csv_path, render_csv(&result.pairs, &config.company_column)?)];
    if let Some(path) = report_path {
        outputs.push((path, render_json(result)?));
    }

    write_all_atomic(&outputs)?;
    info!("data was loaded. file {} created", csv_path.display());
    if let Some(path) = report_path {
        info!("report written to {}", path.display());
    }
    Ok(())
}

pub fn cmd_run(
    config_path: PathBuf,
    output: Option<PathBuf>,
    report: Option<PathBuf>,
    json_output: bool,
    threshold: Option<u8>,
) -> Result<(), CliError> {
    let (mut config, base_dir) = load_config(&config_path)?;
    if let Some(threshold) = threshold {
        config = config.with_threshold(threshold);
    }

    // Extract
    let csv_a = read_dataset(&base_dir, &config.dataset_a)?;
    let csv_b = read_dataset(&base_dir, &config.dataset_b)?;
    let input = complink_linkage::extract(&config, &csv_a, &csv_b).map_err(CliError::linkage)?;

    // Transform + match
    let result = complink_linkage::run(&config, &input).map_err(CliError::linkage)?;

    // Load. Paths from flags are taken as given, paths from the config
    // resolve against its directory.
    let csv_path = output.unwrap_or_else(|| base_dir.join(&config.output.csv));
    let report_path = report.or_else(|| config.output.json.as_ref().map(|p| base_dir.join(p)));
    load(&config, &result, &csv_path, report_path.as_deref())
        .map_err(|e| CliError::linkage(e.in_stage(Stage::Load)))?;

    if json_output {
        let json_str = render_json(&result).map_err(|e| CliError::output(e.to_string()))?;
        println!("{json_str}");
    }

    // Human summary to stderr
    let m = &result.metrics;
    eprintln!(
        "linked {} compan{} from {}: {} matched ({:.2}%), {} unmatched ({:.2}%), {} one-to-many key(s) in {}",
        m.total_pairs,
        if m.total_pairs == 1 { "y" } else { "ies" },
        config.dataset_a.label,
        m.matched_count,
        m.match_rate,
        m.unmatched_count,
        m.unmatched_rate,
        m.one_to_many_count,
        config.dataset_b.label,
    );
    eprintln!("wrote {}", csv_path.display());
    if let Some(path) = report_path {
        eprintln!("wrote {}", path.display());
    }

    Ok(())
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let (config, base_dir) = load_config(&config_path)?;

    for dataset in [&config.dataset_a, &config.dataset_b] {
        let path = base_dir.join(&dataset.file);
        if !path.is_file() {
            return Err(CliError::input(format!(
                "{}: file not found: {}",
                dataset.label,
                path.display()
            ))
            .with_hint("dataset paths resolve against the config file's directory"));
        }
    }

    eprintln!(
        "valid: '{}' on column '{}', {} address column(s) in {}, {} in {}{}, threshold {}",
        config.name,
        config.company_column,
        config.dataset_a.address_columns.len(),
        config.dataset_a.label,
        config.dataset_b.address_columns.len(),
        config.dataset_b.label,
        config
            .dataset_b
            .zip_column
            .as_deref()
            .map(|zip| format!(" (zip '{zip}')"))
            .unwrap_or_default(),
        config.matching.threshold,
    );
    Ok(())
}
