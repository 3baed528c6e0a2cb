use crate::denylist::Denylists;
use crate::npi::ProfileRecord;

pub const FLAG_INVALID_FORMAT: &str = "Invalid NPI format";
pub const FLAG_NO_MATCH: &str = "No match (fake or invalid NPI)";
pub const FLAG_INACTIVE: &str = "Inactive provider";
pub const FLAG_MISSING_NAME: &str = "Missing name";
pub const FLAG_MISSING_TAXONOMY: &str = "Missing taxonomy";
pub const FLAG_DECEASED: &str = "Deceased provider";
pub const FLAG_INCARCERATED: &str = "Provider in prison";
pub const FLAG_CPT_MISMATCH: &str = "CPT/taxonomy mismatch";
pub const FLAG_CROSS_STATE: &str = "Cross-state billing anomaly";

/// NPPES enumeration status code for an active provider.
pub const ACTIVE_STATUS: &str = "A";

// Taxonomy substring paired with the CPT prefix it is allowed to bill.
// Anything off this list with claim context present counts as a mismatch.
const COMPATIBLE_TAXONOMY_CPT: &[(&str, &str)] = &[("Psychiatry", "29"), ("Cardiology", "93")];

/// One screened row. `profile` is None for the two short-circuit outcomes
/// (malformed identifier, no registry match); those rows export without
/// enrichment columns.
#[derive(Debug, Clone)]
pub struct AssessmentResult {
    pub npi: String,
    pub profile: Option<ProfileRecord>,
    pub risk_score: u32,
    pub risk_flags: Vec<&'static str>,
}

impl AssessmentResult {
    /// Terminal result for a token that never reached the registry.
    pub fn invalid_format(npi: impl Into<String>) -> Self {
        Self {
            npi: npi.into(),
            profile: None,
            risk_score: 100,
            risk_flags: vec![FLAG_INVALID_FORMAT],
        }
    }

    pub fn flags_joined(&self) -> String {
        self.risk_flags.join(", ")
    }
}

/// Rule-based scorer. Rules fire independently and additively, in a fixed
/// order, with no cap; only the no-match rule short-circuits. NotFound and
/// Failed lookups both arrive here as `record: None`.
pub fn assess(
    npi: &str,
    record: Option<ProfileRecord>,
    denylists: &Denylists,
    cpt_code: Option<&str>,
    claim_state: Option<&str>,
) -> AssessmentResult {
    let Some(record) = record else {
        return AssessmentResult {
            npi: npi.to_string(),
            profile: None,
            risk_score: 100,
            risk_flags: vec![FLAG_NO_MATCH],
        };
    };

    let mut flags = Vec::new();
    let mut score = 0u32;

    if record.status.as_deref() != Some(ACTIVE_STATUS) {
        flags.push(FLAG_INACTIVE);
        score += 70;
    }
    if record.name.trim().is_empty() {
        flags.push(FLAG_MISSING_NAME);
        score += 10;
    }
    if record.taxonomy.is_none() {
        flags.push(FLAG_MISSING_TAXONOMY);
        score += 10;
    }
    if denylists.is_deceased(npi) {
        flags.push(FLAG_DECEASED);
        score += 70;
    }
    if denylists.is_incarcerated(npi) {
        flags.push(FLAG_INCARCERATED);
        score += 90;
    }
    if let (Some(cpt), Some(taxonomy)) = (cpt_code, record.taxonomy.as_deref()) {
        if !cpt_compatible(taxonomy, cpt) {
            flags.push(FLAG_CPT_MISMATCH);
            score += 30;
        }
    }
    if let (Some(claim), Some(license)) = (claim_state, record.license_state.as_deref()) {
        if claim != license {
            flags.push(FLAG_CROSS_STATE);
            score += 25;
        }
    }

    AssessmentResult {
        npi: npi.to_string(),
        profile: Some(record),
        risk_score: score,
        risk_flags: flags,
    }
}

fn cpt_compatible(taxonomy: &str, cpt_code: &str) -> bool {
    COMPATIBLE_TAXONOMY_CPT
        .iter()
        .any(|(specialty, prefix)| taxonomy.contains(specialty) && cpt_code.starts_with(prefix))
}
