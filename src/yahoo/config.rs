use std::time::Duration;

// -----------------------------------------------
// YAHOO FINANCE API ENDPOINTS
// -----------------------------------------------
pub const BASE_URL: &str = "https://query1.finance.yahoo.com";

pub fn options_url(symbol: &str) -> String {
    format!(
        "{}/v7/finance/options/{}",
        BASE_URL,
        urlencoding::encode(symbol) // URL-encode the symbol
    )
}

pub fn options_expiry_url(symbol: &str, epoch: i64) -> String {
    format!(
        "{}/v7/finance/options/{}?date={}",
        BASE_URL,
        urlencoding::encode(symbol),
        epoch
    )
}

pub fn chart_url(symbol: &str, range: &str) -> String {
    format!(
        "{}/v8/finance/chart/{}?range={}&interval=1d",
        BASE_URL,
        urlencoding::encode(symbol),
        range
    )
}

// -----------------------------------------------
// TICKERS TO FETCH
// -----------------------------------------------
pub const TICKERS: &[&str] = &["CALM", "ONDS", "RKLB", "UBER", "NFLX", "V"];

// -----------------------------------------------
// CHAIN FETCH SETTINGS
// -----------------------------------------------
/// Expirations beyond this horizon are skipped.
pub const MAX_EXPIRY_DAYS: i64 = 45;

/// Last-resort price when both oracle lookups fail.
pub const FALLBACK_PRICE: f64 = 90.0;

/// Delay between per-expiration requests.
pub const EXPIRY_DELAY_MS: u64 = 200;

/// Delay between tickers.
pub const TICKER_DELAY_MS: u64 = 1_000;

// -----------------------------------------------
// OUTPUT
// -----------------------------------------------
pub const DEFAULT_OUTPUT_DIR: &str = "data/yfoc";

/// Directory for chain CSVs, overridable via YF_OUTPUT_DIR.
pub fn get_output_dir() -> String {
    std::env::var("YF_OUTPUT_DIR").unwrap_or_else(|_| DEFAULT_OUTPUT_DIR.to_string())
}

// -----------------------------------------------
// HTTP CLIENT CONFIG
// -----------------------------------------------
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
                               AppleWebKit/537.36 (KHTML, like Gecko) \
                               Chrome/131.0.0.0 Safari/537.36";

pub const ACCEPT_LANGUAGES: &[&str] = &[
    "en-US,en;q=0.9",
    "en-GB,en;q=0.8",
    "en-IN,en;q=0.9",
];

pub const HTTP_TIMEOUT: Duration = Duration::from_secs(20);

// -----------------------------------------------
// RETRY CONFIG
// -----------------------------------------------
pub const RETRY_BASE_DELAY_MS: u64 = 200;
pub const RETRY_FACTOR: u64 = 2;
pub const RETRY_MAX_DELAY_SECS: u64 = 3;
pub const RETRY_MAX_ATTEMPTS: usize = 3;
