use anyhow::{Context, Result, bail};
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;

/// NPIs must be all-digit tokens before they are allowed anywhere near the
/// registry. No length or check-digit constraint is enforced.
pub fn is_valid_npi(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
}

#[derive(Debug, Deserialize)]
pub struct NpiApiResponse {
    #[serde(default)]
    pub results: Vec<NpiResult>,
}

#[derive(Debug, Deserialize)]
pub struct NpiResult {
    basic: Option<NpiBasic>,
    #[serde(default)]
    taxonomies: Vec<NpiTaxonomy>,
    #[serde(default)]
    addresses: Vec<NpiAddress>,
}

#[derive(Debug, Default, Deserialize)]
struct NpiBasic {
    name: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    status: Option<String>,
    organization_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NpiTaxonomy {
    desc: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NpiAddress {
    state: Option<String>,
}

/// Normalized profile fields for one matched NPI. Fields the registry did
/// not supply are None; display defaults are applied at export time, not
/// here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileRecord {
    pub name: String,
    pub status: Option<String>,
    pub taxonomy: Option<String>,
    pub license_state: Option<String>,
    pub organization_name: Option<String>,
}

impl ProfileRecord {
    pub fn from_api(result: NpiResult) -> Self {
        let basic = result.basic.unwrap_or_default();
        Self {
            name: derive_display_name(&basic),
            status: clean(basic.status),
            taxonomy: result
                .taxonomies
                .into_iter()
                .next()
                .and_then(|taxonomy| clean(taxonomy.desc)),
            license_state: result
                .addresses
                .into_iter()
                .next()
                .and_then(|address| clean(address.state)),
            organization_name: clean(basic.organization_name),
        }
    }
}

/// The combined name field wins when the registry supplies one; otherwise
/// first and last name joined with a single space, trimmed.
fn derive_display_name(basic: &NpiBasic) -> String {
    if let Some(name) = basic
        .name
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
    {
        return name.to_string();
    }

    let first = basic.first_name.as_deref().map(str::trim).unwrap_or("");
    let last = basic.last_name.as_deref().map(str::trim).unwrap_or("");
    format!("{first} {last}").trim().to_string()
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToOwned::to_owned)
}

/// Outcome of one registry lookup. Failures are captured rather than
/// raised: scoring treats them like a miss, while the cause stays
/// available for run reporting.
#[derive(Debug, Clone)]
pub enum LookupOutcome {
    Found(ProfileRecord),
    NotFound,
    Failed(String),
}

/// Transport seam for the registry call. The HTTP implementation only ever
/// yields Found or NotFound; transport-level errors surface as Err and are
/// turned into Failed by the memoizing client.
pub trait ProfileSource {
    async fn fetch(&self, npi: &str) -> Result<LookupOutcome>;
}

pub struct HttpRegistry {
    client: Client,
    base_url: String,
    version: String,
}

impl HttpRegistry {
    pub fn new(client: Client, base_url: String, version: String) -> Self {
        Self {
            client,
            base_url,
            version,
        }
    }
}

impl ProfileSource for HttpRegistry {
    async fn fetch(&self, npi: &str) -> Result<LookupOutcome> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("version", self.version.as_str()), ("number", npi)])
            .send()
            .await
            .with_context(|| format!("Registry request failed for {npi}"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!(
                "Registry returned status {} for {}. Body: {}",
                status,
                npi,
                truncate_for_log(&body)
            );
        }

        let body: NpiApiResponse = response
            .json()
            .await
            .with_context(|| format!("Invalid registry JSON for {npi}"))?;
        Ok(match body.results.into_iter().next() {
            Some(result) => LookupOutcome::Found(ProfileRecord::from_api(result)),
            None => LookupOutcome::NotFound,
        })
    }
}

/// Memoizing wrapper around a profile source. One network call per
/// distinct NPI per run; all three outcomes are cached, including
/// failures. The cache lives and dies with the run.
pub struct RegistryClient<S> {
    source: S,
    cache: HashMap<String, LookupOutcome>,
}

impl<S: ProfileSource> RegistryClient<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            cache: HashMap::new(),
        }
    }

    pub async fn lookup(&mut self, npi: &str) -> LookupOutcome {
        if let Some(hit) = self.cache.get(npi) {
            return hit.clone();
        }
        let outcome = match self.source.fetch(npi).await {
            Ok(outcome) => outcome,
            Err(err) => LookupOutcome::Failed(err.to_string()),
        };
        self.cache.insert(npi.to_string(), outcome.clone());
        outcome
    }
}

fn truncate_for_log(text: &str) -> String {
    let trimmed = text.trim();
    let max_len = 300usize;
    if trimmed.len() <= max_len {
        trimmed.to_string()
    } else {
        format!("{}...", &trimmed[..max_len])
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{StubSource, active_record};
    use super::*;

    fn first_result(json: &str) -> NpiResult {
        let response: NpiApiResponse = serde_json::from_str(json).expect("valid registry JSON");
        response.results.into_iter().next().expect("one result")
    }

    #[test]
    fn accepts_all_digit_tokens_only() {
        assert!(is_valid_npi("1518983506"));
        assert!(!is_valid_npi("abc123"));
        assert!(!is_valid_npi(""));
        assert!(!is_valid_npi("1518 983506"));
        assert!(!is_valid_npi("15189835O6"));
    }

    #[test]
    fn combined_name_field_wins() {
        let record = ProfileRecord::from_api(first_result(
            r#"{"results":[{"basic":{"name":"REYES CARDIOLOGY","first_name":"Jane","last_name":"Reyes"}}]}"#,
        ));
        assert_eq!(record.name, "REYES CARDIOLOGY");
    }

    #[test]
    fn name_falls_back_to_first_and_last() {
        let record = ProfileRecord::from_api(first_result(
            r#"{"results":[{"basic":{"first_name":" Jane ","last_name":"Reyes"}}]}"#,
        ));
        assert_eq!(record.name, "Jane Reyes");

        let record = ProfileRecord::from_api(first_result(
            r#"{"results":[{"basic":{"last_name":"Reyes"}}]}"#,
        ));
        assert_eq!(record.name, "Reyes");
    }

    #[test]
    fn whitespace_only_fields_normalize_to_absent() {
        let record = ProfileRecord::from_api(first_result(
            r#"{"results":[{
                "basic":{"status":"  ","organization_name":""},
                "taxonomies":[{"desc":"   "}],
                "addresses":[{"state":""}]
            }]}"#,
        ));

        assert_eq!(record.name, "");
        assert!(record.status.is_none());
        assert!(record.taxonomy.is_none());
        assert!(record.license_state.is_none());
        assert!(record.organization_name.is_none());
    }

    #[test]
    fn populated_result_maps_every_field() {
        let record = ProfileRecord::from_api(first_result(
            r#"{"results":[{
                "basic":{
                    "first_name":"Jane","last_name":"Reyes","status":"A",
                    "organization_name":"Reyes Cardiology PLC"
                },
                "taxonomies":[{"desc":"Cardiology"}],
                "addresses":[{"state":"IA"}]
            }]}"#,
        ));

        assert_eq!(record, active_record());
    }

    #[test]
    fn missing_results_key_parses_as_empty() {
        let response: NpiApiResponse = serde_json::from_str("{}").expect("valid registry JSON");
        assert!(response.results.is_empty());
    }

    #[tokio::test]
    async fn lookups_are_memoized_per_identifier() {
        let (source, calls) = StubSource::with_profiles([("1234567890", active_record())]);
        let mut client = RegistryClient::new(source);

        let first = client.lookup("1234567890").await;
        let second = client.lookup("1234567890").await;
        client.lookup("9876543210").await;

        assert_eq!(calls.get(), 2);
        assert!(matches!(first, LookupOutcome::Found(_)));
        assert!(matches!(second, LookupOutcome::Found(_)));
    }

    #[tokio::test]
    async fn failed_lookups_are_cached_too() {
        let (source, calls) = StubSource::failing();
        let mut client = RegistryClient::new(source);

        let first = client.lookup("1234567890").await;
        let second = client.lookup("1234567890").await;

        assert_eq!(calls.get(), 1);
        assert!(matches!(first, LookupOutcome::Failed(_)));
        assert!(matches!(second, LookupOutcome::Failed(_)));
    }
}
