use std::time::Duration;

// -----------------------------------------------
// ALPACA API ENDPOINTS
// -----------------------------------------------
pub const TRADING_BASE_URL: &str = "https://paper-api.alpaca.markets";
pub const DATA_BASE_URL: &str = "https://data.alpaca.markets";

pub fn contracts_url() -> String {
    format!("{}/v2/options/contracts", TRADING_BASE_URL)
}

pub fn snapshots_url() -> String {
    format!("{}/v1beta1/options/snapshots", DATA_BASE_URL)
}

// -----------------------------------------------
// CREDENTIALS (environment)
// -----------------------------------------------
pub const API_KEY_ENV: &str = "ALPACA_API_KEY";
pub const SECRET_KEY_ENV: &str = "ALPACA_SECRET_KEY";

pub const HEADER_API_KEY_ID: &str = "APCA-API-KEY-ID";
pub const HEADER_API_SECRET_KEY: &str = "APCA-API-SECRET-KEY";

// -----------------------------------------------
// TICKERS TO FETCH
// -----------------------------------------------
pub const TICKERS: &[&str] = &["CALM", "RKLB", "NFLX", "UBER", "ONDS", "V"];

// -----------------------------------------------
// DISCOVERY WINDOW
// -----------------------------------------------
pub const DEFAULT_EXP_DAYS: i64 = 45;
pub const DEFAULT_STRIKE_PCT: f64 = 0.3;

/// Expiry horizon in days, overridable via OC_EXP_DAYS.
pub fn get_exp_days() -> i64 {
    std::env::var("OC_EXP_DAYS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_EXP_DAYS)
}

/// Strike window as a fraction of spot, overridable via OC_STRIKE_PCT.
pub fn get_strike_pct() -> f64 {
    std::env::var("OC_STRIKE_PCT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_STRIKE_PCT)
}

// -----------------------------------------------
// FREE-TIER LIMITS
// -----------------------------------------------
/// Contracts per ticker that get snapshot data. Rows beyond the cap keep
/// zeroed market fields.
pub const SNAPSHOT_CONTRACT_CAP: usize = 50;

/// Symbols per snapshot request.
pub const SNAPSHOT_BATCH_SIZE: usize = 20;

// -----------------------------------------------
// HTTP CLIENT CONFIG
// -----------------------------------------------
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(20);

// -----------------------------------------------
// RETRY CONFIG
// -----------------------------------------------
pub const RETRY_BASE_DELAY_MS: u64 = 200;
pub const RETRY_FACTOR: u64 = 2;
pub const RETRY_MAX_DELAY_SECS: u64 = 3;
pub const RETRY_MAX_ATTEMPTS: usize = 3;
