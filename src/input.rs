use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer};
use std::io::Read;

/// One identifier to screen, with whatever claim context the input carried.
#[derive(Debug, Clone)]
pub struct InputEntry {
    pub npi: String,
    pub cpt_code: Option<String>,
    pub claim_state: Option<String>,
}

impl InputEntry {
    pub fn bare(npi: impl Into<String>) -> Self {
        Self {
            npi: npi.into(),
            cpt_code: None,
            claim_state: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ClaimRow {
    #[serde(rename = "NPI")]
    npi: String,
    #[serde(rename = "CPT", default, deserialize_with = "empty_string_as_none")]
    cpt_code: Option<String>,
    #[serde(rename = "State", default, deserialize_with = "empty_string_as_none")]
    claim_state: Option<String>,
}

/// Tabular input: an NPI column plus optional CPT and State columns.
/// Absent columns and blank cells both mean "no claim context".
pub fn read_claims_csv<R: Read>(reader: R) -> Result<Vec<InputEntry>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut entries = Vec::new();
    for record in csv_reader.deserialize::<ClaimRow>() {
        let row = record.context("Failed reading claims CSV row")?;
        entries.push(InputEntry {
            npi: row.npi,
            cpt_code: row.cpt_code,
            claim_state: row.claim_state,
        });
    }
    Ok(entries)
}

/// Free-form input: one NPI per line, blank lines skipped.
pub fn read_npi_list(text: &str) -> Vec<InputEntry> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(InputEntry::bare)
        .collect()
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_csv_carries_claim_context() {
        let csv = "NPI,CPT,State\n1234567890,93000,IA\n";
        let entries = read_claims_csv(csv.as_bytes()).expect("valid claims CSV");

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].npi, "1234567890");
        assert_eq!(entries[0].cpt_code.as_deref(), Some("93000"));
        assert_eq!(entries[0].claim_state.as_deref(), Some("IA"));
    }

    #[test]
    fn claims_csv_without_optional_columns_parses() {
        let csv = "NPI\n1234567890\n9876543210\n";
        let entries = read_claims_csv(csv.as_bytes()).expect("valid claims CSV");

        assert_eq!(entries.len(), 2);
        assert!(entries[0].cpt_code.is_none());
        assert!(entries[0].claim_state.is_none());
    }

    #[test]
    fn blank_context_cells_mean_no_context() {
        let csv = "NPI,CPT,State\n1234567890,,  \n";
        let entries = read_claims_csv(csv.as_bytes()).expect("valid claims CSV");

        assert!(entries[0].cpt_code.is_none());
        assert!(entries[0].claim_state.is_none());
    }

    #[test]
    fn claims_csv_without_npi_column_errors() {
        let csv = "CPT,State\n93000,IA\n";
        assert!(read_claims_csv(csv.as_bytes()).is_err());
    }

    #[test]
    fn npi_list_trims_and_skips_blank_lines() {
        let entries = read_npi_list("1234567890\n\n  9876543210  \n\n");

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].npi, "1234567890");
        assert_eq!(entries[1].npi, "9876543210");
        assert!(entries[1].cpt_code.is_none());
    }
}
