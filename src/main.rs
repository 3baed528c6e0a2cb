mod args;
mod assess;
mod batch;
mod constants;
mod denylist;
mod export;
mod input;
mod npi;

use anyhow::{Context, Result};
use clap::Parser;
use reqwest::Client;
use std::fs;
use std::path::Path;
use std::time::Duration;

use args::Args;
use batch::run_batch;
use constants::{DEFAULT_OUTPUT_FILE, NPPES_API_DOC_URL, NPPES_RATE_LIMIT_NOTICE_URL};
use denylist::Denylists;
use export::results_to_csv;
use input::{InputEntry, read_claims_csv, read_npi_list};
use npi::{HttpRegistry, RegistryClient};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    println!("NPI API references:");
    println!("  - {}", NPPES_RATE_LIMIT_NOTICE_URL);
    println!("  - {}", NPPES_API_DOC_URL);

    let entries = load_entries(&args)?;
    println!("Screening {} NPIs.", entries.len());

    let client = Client::builder()
        .user_agent("npi-screener/0.1")
        .timeout(Duration::from_secs(args.request_timeout_secs))
        .build()
        .context("Failed creating HTTP client")?;
    let registry = HttpRegistry::new(client, args.api_base_url.clone(), args.api_version.clone());
    let mut registry_client = RegistryClient::new(registry);
    let denylists = Denylists::seeded();

    let results = run_batch(&entries, &mut registry_client, &denylists).await;

    let high = results.iter().filter(|r| r.risk_score >= 90).count();
    let elevated = results
        .iter()
        .filter(|r| r.risk_score >= 70 && r.risk_score < 90)
        .count();
    let low = results.len() - high - elevated;
    println!("Check complete.");
    println!("Risk bands: high={high} elevated={elevated} low={low}");

    let bytes = results_to_csv(&results)?;
    write_output(&args.output_path, &bytes)?;
    println!("Wrote results CSV {}", args.output_path.display());
    Ok(())
}

// Tabular input wins when both sources are supplied; the list file is not
// read at all in that case.
fn load_entries(args: &Args) -> Result<Vec<InputEntry>> {
    if let Some(csv_path) = &args.input_csv {
        let file = fs::File::open(csv_path)
            .with_context(|| format!("Failed opening claims CSV {}", csv_path.display()))?;
        return read_claims_csv(file)
            .with_context(|| format!("Failed parsing claims CSV {}", csv_path.display()));
    }

    let list_path = args
        .input_list
        .as_ref()
        .context("No input supplied. Pass --input-csv or --input-list")?;
    let text = fs::read_to_string(list_path)
        .with_context(|| format!("Failed reading NPI list {}", list_path.display()))?;
    Ok(read_npi_list(&text))
}

fn write_output(output_path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed creating output dir {}", parent.display()))?;
    }

    let file_name = output_path
        .file_name()
        .and_then(|x| x.to_str())
        .unwrap_or(DEFAULT_OUTPUT_FILE);
    let tmp_path = output_path.with_file_name(format!("{file_name}.tmp"));

    fs::write(&tmp_path, bytes)
        .with_context(|| format!("Failed writing temp results CSV {}", tmp_path.display()))?;
    fs::rename(&tmp_path, output_path).with_context(|| {
        format!(
            "Failed moving temp results {} to {}",
            tmp_path.display(),
            output_path.display()
        )
    })?;
    Ok(())
}
