use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::LinkageError;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

pub const DEFAULT_COMPANY_COLUMN: &str = "custname";
pub const DEFAULT_ADDRESS_COLUMNS_A: [&str; 6] =
    ["sStreet1", "sStreet2", "sCity", "sProvState", "sCountry", "sPostalZip"];
pub const DEFAULT_ADDRESS_COLUMNS_B: [&str; 7] =
    ["address1", "address2", "address3", "city", "state", "country", "zip"];
pub const DEFAULT_ZIP_COLUMN: &str = "zip";
pub const DEFAULT_THRESHOLD: u8 = 85;
pub const DEFAULT_OUTPUT_CSV: &str = "matching_results.csv";

/// Label used for dataset A in logs and errors.
pub const DATASET_A: &str = "dataset_a";
/// Label used for dataset B in logs and errors.
pub const DATASET_B: &str = "dataset_b";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct LinkageConfig {
    pub name: String,
    /// Company-name column, shared by both datasets.
    pub company_column: String,
    pub dataset_a: DatasetConfig,
    pub dataset_b: DatasetConfig,
    pub matching: MatchConfig,
    pub metrics: MetricsConfig,
    pub output: OutputConfig,
}

// ---------------------------------------------------------------------------
// Dataset
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct DatasetConfig {
    pub label: String,
    pub file: String,
    /// Address component columns, in join order.
    pub address_columns: Vec<String>,
    /// Postal/zip column. Optional in the input even when configured.
    pub zip_column: Option<String>,
}

impl DatasetConfig {
    pub fn dataset_a(file: impl Into<String>) -> Self {
        Self {
            label: DATASET_A.into(),
            file: file.into(),
            address_columns: DEFAULT_ADDRESS_COLUMNS_A.iter().map(|c| c.to_string()).collect(),
            zip_column: None,
        }
    }

    pub fn dataset_b(file: impl Into<String>) -> Self {
        Self {
            label: DATASET_B.into(),
            file: file.into(),
            address_columns: DEFAULT_ADDRESS_COLUMNS_B.iter().map(|c| c.to_string()).collect(),
            zip_column: Some(DEFAULT_ZIP_COLUMN.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Matching + Metrics + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyAddressPolicy {
    /// Blank addresses never take part in overlap detection.
    #[default]
    Exclude,
    /// Blank addresses are compared like any other string (blank vs blank = 100).
    Include,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct MatchConfig {
    #[serde(default = "default_threshold")]
    pub threshold: u8,
    #[serde(default)]
    pub empty_addresses: EmptyAddressPolicy,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            empty_addresses: EmptyAddressPolicy::default(),
        }
    }
}

fn default_threshold() -> u8 {
    DEFAULT_THRESHOLD
}

/// What the one-to-many count is divided by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OneToManyDenominator {
    /// Number of linked pairs (dataset-A keys). Matches historical reports.
    #[default]
    JoinedPairs,
    /// Number of dataset-B canonical keys.
    DatasetBKeys,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct MetricsConfig {
    #[serde(default)]
    pub one_to_many_denominator: OneToManyDenominator,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_csv")]
    pub csv: String,
    #[serde(default)]
    pub json: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv: default_output_csv(),
            json: None,
        }
    }
}

fn default_output_csv() -> String {
    DEFAULT_OUTPUT_CSV.into()
}

// ---------------------------------------------------------------------------
// TOML shape
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default = "default_name")]
    name: String,
    #[serde(default)]
    company_column: Option<String>,
    dataset_a: DatasetFile,
    dataset_b: DatasetFile,
    #[serde(default)]
    matching: MatchConfig,
    #[serde(default)]
    metrics: MetricsConfig,
    #[serde(default)]
    output: OutputConfig,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DatasetFile {
    file: String,
    #[serde(default)]
    address_columns: Option<Vec<String>>,
    /// `""` disables the zip column.
    #[serde(default)]
    zip_column: Option<String>,
}

impl DatasetFile {
    fn merge_into(self, mut base: DatasetConfig) -> DatasetConfig {
        base.file = self.file;
        if let Some(cols) = self.address_columns {
            base.address_columns = cols;
        }
        match self.zip_column {
            Some(zip) if zip.is_empty() => base.zip_column = None,
            Some(zip) => base.zip_column = Some(zip),
            None => {}
        }
        base
    }
}

fn default_name() -> String {
    "company-linkage".into()
}

// ---------------------------------------------------------------------------
// Construct + Parse + Validate
// ---------------------------------------------------------------------------

impl LinkageConfig {
    /// Config for two dataset files with every other setting at its default.
    pub fn new(dataset_a: impl Into<String>, dataset_b: impl Into<String>) -> Self {
        Self {
            name: default_name(),
            company_column: DEFAULT_COMPANY_COLUMN.into(),
            dataset_a: DatasetConfig::dataset_a(dataset_a),
            dataset_b: DatasetConfig::dataset_b(dataset_b),
            matching: MatchConfig::default(),
            metrics: MetricsConfig::default(),
            output: OutputConfig::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_company_column(mut self, column: impl Into<String>) -> Self {
        self.company_column = column.into();
        self
    }

    pub fn with_address_columns_a<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dataset_a.address_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_address_columns_b<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dataset_b.address_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_zip_column_b(mut self, column: Option<String>) -> Self {
        self.dataset_b.zip_column = column;
        self
    }

    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.matching.threshold = threshold;
        self
    }

    pub fn with_empty_addresses(mut self, policy: EmptyAddressPolicy) -> Self {
        self.matching.empty_addresses = policy;
        self
    }

    pub fn with_one_to_many_denominator(mut self, denominator: OneToManyDenominator) -> Self {
        self.metrics.one_to_many_denominator = denominator;
        self
    }

    pub fn with_output_csv(mut self, path: impl Into<String>) -> Self {
        self.output.csv = path.into();
        self
    }

    pub fn with_output_json(mut self, path: Option<String>) -> Self {
        self.output.json = path;
        self
    }

    pub fn from_toml(input: &str) -> Result<Self, LinkageError> {
        let file: ConfigFile =
            toml::from_str(input).map_err(|e| LinkageError::ConfigParse(e.to_string()))?;

        let config = Self {
            name: file.name,
            company_column: file
                .company_column
                .unwrap_or_else(|| DEFAULT_COMPANY_COLUMN.into()),
            dataset_a: file.dataset_a.merge_into(DatasetConfig::dataset_a("")),
            dataset_b: file.dataset_b.merge_into(DatasetConfig::dataset_b("")),
            matching: file.matching,
            metrics: file.metrics,
            output: file.output,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), LinkageError> {
        if self.matching.threshold > 100 {
            return Err(LinkageError::ConfigValidation(format!(
                "threshold must be between 0 and 100, got {}",
                self.matching.threshold
            )));
        }

        if self.company_column.trim().is_empty() {
            return Err(LinkageError::ConfigValidation(
                "company_column must not be empty".into(),
            ));
        }

        if self.output.csv.trim().is_empty() {
            return Err(LinkageError::ConfigValidation(
                "output csv path must not be empty".into(),
            ));
        }

        for dataset in [&self.dataset_a, &self.dataset_b] {
            if dataset.file.trim().is_empty() {
                return Err(LinkageError::ConfigValidation(format!(
                    "{}: file must not be empty",
                    dataset.label
                )));
            }
            if dataset.address_columns.is_empty() {
                return Err(LinkageError::ConfigValidation(format!(
                    "{}: at least one address column is required",
                    dataset.label
                )));
            }
            let mut seen = HashSet::new();
            for col in &dataset.address_columns {
                if col.trim().is_empty() {
                    return Err(LinkageError::ConfigValidation(format!(
                        "{}: address column names must not be empty",
                        dataset.label
                    )));
                }
                if !seen.insert(col.as_str()) {
                    return Err(LinkageError::ConfigValidation(format!(
                        "{}: duplicate address column '{col}'",
                        dataset.label
                    )));
                }
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
