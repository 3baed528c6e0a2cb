use clap::{ArgGroup, Parser};

use crate::constants::{
    DEFAULT_API_VERSION, DEFAULT_NPI_API_BASE_URL, DEFAULT_OUTPUT_FILE,
    DEFAULT_REQUEST_TIMEOUT_SECS,
};

#[derive(Debug, Parser)]
#[command(name = "npi_screener")]
#[command(about = "Screen batches of NPIs against the NPPES registry and flag phantom-provider risk")]
#[command(group(ArgGroup::new("input").required(true).multiple(true)))]
pub struct Args {
    /// Claims CSV with an NPI column and optional CPT and State columns.
    /// Takes precedence over --input-list when both are given.
    #[arg(long, group = "input")]
    pub input_csv: Option<std::path::PathBuf>,

    /// Plain text file with one NPI per line.
    #[arg(long, group = "input")]
    pub input_list: Option<std::path::PathBuf>,

    /// Results CSV output path.
    #[arg(long, default_value = DEFAULT_OUTPUT_FILE)]
    pub output_path: std::path::PathBuf,

    /// NPI API base URL.
    #[arg(long, default_value = DEFAULT_NPI_API_BASE_URL)]
    pub api_base_url: String,

    /// NPI API version query parameter.
    #[arg(long, default_value = DEFAULT_API_VERSION)]
    pub api_version: String,

    /// Per-request timeout in seconds for registry lookups.
    #[arg(long, default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    pub request_timeout_secs: u64,
}
