pub const DEFAULT_NPI_API_BASE_URL: &str = "https://npiregistry.cms.hhs.gov/api/";
pub const DEFAULT_API_VERSION: &str = "2.1";
pub const DEFAULT_OUTPUT_FILE: &str = "phantom_provider_results.csv";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 5;

pub const NPPES_RATE_LIMIT_NOTICE_URL: &str = "https://npiregistry.cms.hhs.gov/";
pub const NPPES_API_DOC_URL: &str = "https://npiregistry.cms.hhs.gov/api-page";
