// End-to-end tests for the complink binary.
// Run with: cargo test -p complink-cli --test cli_tests

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn complink(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_complink"));
    cmd.current_dir(dir);
    cmd.env_remove("RUST_LOG");
    cmd
}

fn stderr(out: &Output) -> String {
    String::from_utf8_lossy(&out.stderr).into_owned()
}

const DATASET_A: &str = "\
custname,sStreet1,sCity
Acme Inc,123 Main St,Toronto
Zenith Group,1 Elm Ave,Ottawa
";

const DATASET_B: &str = "\
custname,address1,city
ACME,123 main st,toronto
ACME Corp.,500 Bay St,Toronto
";

const CONFIG: &str = r#"
name = "cli test"

[dataset_a]
file = "a.csv"
address_columns = ["sStreet1", "sCity"]

[dataset_b]
file = "b.csv"
address_columns = ["address1", "city"]
"#;

/// Temp dir holding both datasets and a config.
fn workspace(config: &str) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.csv"), DATASET_A).unwrap();
    fs::write(dir.path().join("b.csv"), DATASET_B).unwrap();
    fs::write(dir.path().join("link.toml"), config).unwrap();
    dir
}

// -------------------------------------------------------------------------
// run
// -------------------------------------------------------------------------

#[test]
fn run_writes_default_csv() {
    let dir = workspace(CONFIG);
    let out = complink(dir.path()).args(["run", "link.toml"]).output().unwrap();
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let csv = fs::read_to_string(dir.path().join("matching_results.csv")).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines,
        vec![
            "clean_name,custname,custname_ds2,locations_ds1,locations_ds2,overlapping_locations",
            "acme,Acme Inc,ACME,\"123 main st, toronto\",\"123 main st, toronto; 500 bay st, toronto\",\"123 main st, toronto\"",
            "zenith,Zenith Group,,\"1 elm ave, ottawa\",,",
        ]
    );
    assert!(!dir.path().join("matching_results.csv.tmp").exists());

    let err = stderr(&out);
    assert!(err.contains("--- Matching Metrics ---"), "stderr: {err}");
    assert!(err.contains("Match Rate: 50.00% (1 records)"), "stderr: {err}");
    assert!(err.contains("Unmatched Records: 50.00% (1 records)"), "stderr: {err}");
    assert!(err.contains("One-to-Many Matches: 50.00% (1 cases)"), "stderr: {err}");
    assert!(err.contains("data was loaded. file"), "stderr: {err}");
    assert!(err.contains("linked 2 companies from dataset_a"), "stderr: {err}");
}

#[test]
fn run_from_another_directory_resolves_against_config() {
    let dir = workspace(CONFIG);
    let elsewhere = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("link.toml");

    let out = complink(elsewhere.path())
        .arg("run")
        .arg(&config_path)
        .output()
        .unwrap();
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(dir.path().join("matching_results.csv").exists());
    assert!(!elsewhere.path().join("matching_results.csv").exists());
}

#[test]
fn run_json_to_stdout() {
    let dir = workspace(CONFIG);
    let out = complink(dir.path())
        .args(["run", "link.toml", "--json"])
        .output()
        .unwrap();
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["meta"]["config_name"], "cli test");
    assert_eq!(report["meta"]["threshold"], 85);
    assert_eq!(report["metrics"]["total_pairs"], 2);
    assert_eq!(report["metrics"]["matched_count"], 1);
    assert_eq!(report["pairs"][0]["canonical_name"], "acme");
    assert!(report["pairs"][1]["display_name_b"].is_null());
    assert_eq!(report["extract"]["dataset_a"]["rows"], 2);
    assert_eq!(report["extract"]["dataset_b"]["missing_company"], 0);
}

#[test]
fn run_flags_override_config() {
    let dir = workspace(CONFIG);
    let out = complink(dir.path())
        .args([
            "run",
            "link.toml",
            "--output",
            "custom.csv",
            "--report",
            "report.json",
            "--threshold",
            "100",
        ])
        .output()
        .unwrap();
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(dir.path().join("custom.csv").exists());
    assert!(!dir.path().join("matching_results.csv").exists());

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("report.json")).unwrap()).unwrap();
    assert_eq!(report["meta"]["threshold"], 100);
    // exact address still overlaps at 100
    assert_eq!(report["pairs"][0]["overlapping_locations"][0], "123 main st, toronto");
}

#[test]
fn run_writes_configured_report() {
    let config = format!("{CONFIG}\n[output]\ncsv = \"out.csv\"\njson = \"out.json\"\n");
    let dir = workspace(&config);
    let out = complink(dir.path()).args(["run", "link.toml"]).output().unwrap();
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert!(dir.path().join("out.csv").exists());
    assert!(dir.path().join("out.json").exists());
}

// -------------------------------------------------------------------------
// Failures
// -------------------------------------------------------------------------

#[test]
fn missing_column_exits_4_without_output() {
    let config = CONFIG.replace("[\"address1\", \"city\"]", "[\"address1\", \"town\"]");
    let dir = workspace(&config);
    fs::write(dir.path().join("matching_results.csv"), "previous").unwrap();

    let out = complink(dir.path()).args(["run", "link.toml"]).output().unwrap();
    assert_eq!(out.status.code(), Some(4));

    let err = stderr(&out);
    assert!(
        err.contains("error: extract stage failed: dataset 'dataset_b': missing column 'town'"),
        "stderr: {err}"
    );
    assert!(err.contains("hint:"), "stderr: {err}");
    assert_eq!(
        fs::read_to_string(dir.path().join("matching_results.csv")).unwrap(),
        "previous"
    );
}

#[test]
fn unwritable_report_leaves_no_output() {
    let dir = workspace(CONFIG);
    let out = complink(dir.path())
        .args(["run", "link.toml", "--report", "no_such_dir/report.json"])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(5));
    assert!(stderr(&out).contains("error: load stage failed"));
    assert!(!dir.path().join("matching_results.csv").exists());
    assert!(!dir.path().join("matching_results.csv.tmp").exists());
    assert!(!dir.path().join("no_such_dir").exists());
}

#[test]
fn missing_dataset_file_exits_4() {
    let dir = workspace(CONFIG);
    fs::remove_file(dir.path().join("b.csv")).unwrap();

    let out = complink(dir.path()).args(["run", "link.toml"]).output().unwrap();
    assert_eq!(out.status.code(), Some(4));
    assert!(stderr(&out).contains("extract stage failed"));
    assert!(!dir.path().join("matching_results.csv").exists());
}

#[test]
fn invalid_config_exits_3() {
    let dir = workspace(&format!("{CONFIG}\n[matching]\nthreshold = 150\n"));
    let out = complink(dir.path()).args(["run", "link.toml"]).output().unwrap();
    assert_eq!(out.status.code(), Some(3));
    assert!(stderr(&out).contains("threshold must be between 0 and 100"));
}

#[test]
fn unknown_config_key_exits_3() {
    let dir = workspace(&format!("colour = \"blue\"\n{CONFIG}"));
    let out = complink(dir.path()).args(["run", "link.toml"]).output().unwrap();
    assert_eq!(out.status.code(), Some(3));
    assert!(stderr(&out).contains("config parse error"));
}

#[test]
fn missing_config_exits_4() {
    let dir = tempfile::tempdir().unwrap();
    let out = complink(dir.path()).args(["run", "nope.toml"]).output().unwrap();
    assert_eq!(out.status.code(), Some(4));
    assert!(stderr(&out).contains("cannot read config"));
}

#[test]
fn out_of_range_threshold_flag_is_usage_error() {
    let dir = workspace(CONFIG);
    let out = complink(dir.path())
        .args(["run", "link.toml", "--threshold", "101"])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(2));
}

// -------------------------------------------------------------------------
// validate
// -------------------------------------------------------------------------

#[test]
fn validate_accepts_good_config() {
    let dir = workspace(CONFIG);
    let out = complink(dir.path()).args(["validate", "link.toml"]).output().unwrap();
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    let err = stderr(&out);
    assert!(err.contains("valid: 'cli test' on column 'custname'"), "stderr: {err}");
    assert!(err.contains("(zip 'zip')"), "stderr: {err}");
    assert!(!dir.path().join("matching_results.csv").exists());
}

#[test]
fn validate_reports_missing_dataset() {
    let dir = workspace(CONFIG);
    fs::remove_file(dir.path().join("a.csv")).unwrap();
    let out = complink(dir.path()).args(["validate", "link.toml"]).output().unwrap();
    assert_eq!(out.status.code(), Some(4));
    assert!(stderr(&out).contains("dataset_a: file not found"));
}
