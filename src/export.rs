use anyhow::{Context, Result};
use csv::Writer;

use crate::assess::AssessmentResult;

pub const RESULT_HEADER: [&str; 8] = [
    "NPI",
    "Provider Name",
    "Status",
    "Taxonomy",
    "License State",
    "Organization Name",
    "Risk Score",
    "Risk Flags",
];

// Display defaults for fields the registry did not supply. Rendering
// concern only; the scoring rules test the optional fields themselves.
pub const STATUS_UNKNOWN: &str = "Unknown";
pub const NO_TAXONOMY: &str = "No taxonomy";

/// Serializes the ordered results to CSV bytes, header first. Rows that
/// short-circuited (invalid format, no match) leave the enrichment
/// columns empty. No disk or network I/O happens here.
pub fn results_to_csv(results: &[AssessmentResult]) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    {
        let mut writer = Writer::from_writer(&mut buf);
        writer
            .write_record(RESULT_HEADER)
            .context("Failed writing results CSV header")?;

        for result in results {
            let score = result.risk_score.to_string();
            let flags = result.flags_joined();
            let record: [&str; 8] = match &result.profile {
                Some(profile) => [
                    &result.npi,
                    &profile.name,
                    profile.status.as_deref().unwrap_or(STATUS_UNKNOWN),
                    profile.taxonomy.as_deref().unwrap_or(NO_TAXONOMY),
                    profile.license_state.as_deref().unwrap_or(""),
                    profile.organization_name.as_deref().unwrap_or(""),
                    &score,
                    &flags,
                ],
                None => [&result.npi, "", "", "", "", "", &score, &flags],
            };
            writer
                .write_record(record)
                .with_context(|| format!("Failed writing results row for {}", result.npi))?;
        }

        writer.flush().context("Failed flushing results CSV")?;
    }
    Ok(buf)
}
