//! Text canonicalization for company names, addresses and zip codes.
//!
//! Everything here is total: missing values become empty strings and no
//! input is rejected.

use std::sync::OnceLock;

use regex::Regex;

use crate::config::DatasetConfig;
use crate::model::{NormalizedRecord, RawRecord};

/// Legal/corporate tokens dropped from company names.
pub const LEGAL_SUFFIXES: [&str; 12] = [
    "inc",
    "ltd",
    "llc",
    "corp",
    "management",
    "systems",
    "lp",
    "reit",
    "holding",
    "holdings",
    "group",
    "canada",
];

/// Separator between address components.
pub const ADDRESS_SEPARATOR: &str = ", ";

fn punctuation_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\w\s]").expect("punctuation pattern"))
}

fn suffix_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let pattern = format!(r"\b(?:{})\b", LEGAL_SUFFIXES.join("|"));
        Regex::new(&pattern).expect("suffix pattern")
    })
}

/// Canonical company key: lowercase, strip punctuation, drop legal suffix
/// tokens, trim.
///
/// Punctuation goes first so that `"Corp."` still loses its suffix. Only
/// whole tokens are removed: `"Groupware"` keeps its `group`.
pub fn normalize_name(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let no_punct = punctuation_re().replace_all(&lowered, "");
    let no_suffix = suffix_re().replace_all(&no_punct, "");
    no_suffix.trim().to_string()
}

/// Join the non-empty, trimmed, lowercased components with `", "`,
/// keeping their order. Missing components count as empty.
pub fn normalize_address<'a, I>(components: I) -> String
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    components
        .into_iter()
        .map(|c| c.unwrap_or("").trim().to_lowercase())
        .filter(|c| !c.is_empty())
        .collect::<Vec<_>>()
        .join(ADDRESS_SEPARATOR)
}

/// Zip with every whitespace character removed. Missing becomes empty.
pub fn normalize_zip(raw: Option<&str>) -> String {
    raw.unwrap_or("").chars().filter(|c| !c.is_whitespace()).collect()
}

/// Normalize one record.
///
/// `zip_slot` is the position of the zip column inside the address
/// components, if it is one of them: that component is replaced by the
/// normalized zip before the address is joined. `keep_zip` controls whether
/// the normalized zip is carried on the result at all.
pub fn normalize_record(raw: &RawRecord, zip_slot: Option<usize>, keep_zip: bool) -> NormalizedRecord {
    let display_name = raw.company.clone().unwrap_or_default();
    let zip = normalize_zip(raw.zip.as_deref());

    let normalized_address = normalize_address(
        raw.address_components
            .iter()
            .enumerate()
            .map(|(i, c)| if Some(i) == zip_slot { Some(zip.as_str()) } else { c.as_deref() }),
    );

    NormalizedRecord {
        canonical_name: normalize_name(&display_name),
        display_name,
        normalized_address,
        zip: keep_zip.then_some(zip),
    }
}

/// Normalize every record of one dataset.
pub fn normalize_records(records: &[RawRecord], dataset: &DatasetConfig) -> Vec<NormalizedRecord> {
    let zip_slot = dataset
        .zip_column
        .as_ref()
        .and_then(|zip| dataset.address_columns.iter().position(|c| c == zip));
    let keep_zip = dataset.zip_column.is_some();

    records
        .iter()
        .map(|r| normalize_record(r, zip_slot, keep_zip))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_strips_suffix_and_punctuation() {
        assert_eq!(normalize_name("Acme Inc"), "acme");
        assert_eq!(normalize_name("Acme Group"), "acme");
        assert_eq!(normalize_name("ACME Corp."), "acme");
        assert_eq!(normalize_name("Maple Leaf Holdings Canada Ltd."), "maple leaf");
        assert_eq!(normalize_name("  O'Brien & Sons, LLC "), "obrien  sons");
    }

    #[test]
    fn name_keeps_embedded_suffix_text() {
        assert_eq!(normalize_name("Groupware Inc"), "groupware");
        assert_eq!(normalize_name("Incline Systems"), "incline");
        assert_eq!(normalize_name("Canadago"), "canadago");
    }

    #[test]
    fn name_of_only_suffixes_is_empty() {
        assert_eq!(normalize_name("Group Holdings Inc."), "");
        assert_eq!(normalize_name(""), "");
    }

    #[test]
    fn name_is_idempotent() {
        for raw in ["Acme Inc", "The Group Company", "Zenith-Group, L.L.C.", "Éclair Corp"] {
            let once = normalize_name(raw);
            assert_eq!(normalize_name(&once), once, "input {raw:?}");
        }
    }

    #[test]
    fn name_keeps_unicode_letters() {
        assert_eq!(normalize_name("Société Générale Inc."), "société générale");
    }

    #[test]
    fn address_skips_empty_components() {
        let parts = ["123 Main St", "", "Toronto", "", "ON", "CA", ""];
        assert_eq!(
            normalize_address(parts.iter().map(|p| Some(*p))),
            "123 main st, toronto, on, ca"
        );
    }

    #[test]
    fn address_missing_pattern_does_not_matter() {
        let a = normalize_address([Some(" 9 King St "), None, Some("Ottawa")]);
        let b = normalize_address([Some("9 king st"), Some("   "), Some("OTTAWA"), None]);
        assert_eq!(a, "9 king st, ottawa");
        assert_eq!(a, b);
    }

    #[test]
    fn address_all_missing_is_empty() {
        assert_eq!(normalize_address([None, Some(""), Some("  ")]), "");
    }

    #[test]
    fn zip_removes_all_whitespace() {
        assert_eq!(normalize_zip(Some(" M5V 2T6\t")), "M5V2T6");
        assert_eq!(normalize_zip(None), "");
    }

    #[test]
    fn record_substitutes_normalized_zip_into_address() {
        let raw = RawRecord {
            company: Some("Northwind Systems".into()),
            address_components: vec![
                Some("1 Bay St".into()),
                None,
                Some("Toronto".into()),
                Some("M5J 2X2".into()),
            ],
            zip: Some("M5J 2X2".into()),
        };
        let rec = normalize_record(&raw, Some(3), true);
        assert_eq!(rec.canonical_name, "northwind");
        assert_eq!(rec.display_name, "Northwind Systems");
        assert_eq!(rec.normalized_address, "1 bay st, toronto, m5j2x2");
        assert_eq!(rec.zip.as_deref(), Some("M5J2X2"));
    }

    #[test]
    fn record_missing_company_falls_back_to_empty() {
        let raw = RawRecord {
            company: None,
            address_components: vec![Some("1 Bay St".into())],
            zip: None,
        };
        let rec = normalize_record(&raw, None, false);
        assert_eq!(rec.canonical_name, "");
        assert_eq!(rec.display_name, "");
        assert!(rec.zip.is_none());
    }

    #[test]
    fn records_use_dataset_zip_layout() {
        let dataset = DatasetConfig::dataset_b("b.csv");
        let mut components = vec![None; dataset.address_columns.len()];
        components[0] = Some("5 Elm Ave".to_string());
        components[6] = Some("K1A 0B1".to_string());
        let raw = RawRecord {
            company: Some("Elm".into()),
            address_components: components,
            zip: Some("K1A 0B1".into()),
        };
        let out = normalize_records(&[raw], &dataset);
        assert_eq!(out[0].normalized_address, "5 elm ave, k1a0b1");
        assert_eq!(out[0].zip.as_deref(), Some("K1A0B1"));
    }
}
