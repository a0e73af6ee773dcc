use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// -----------------------------------------------
// CANONICAL ROW SCHEMA
// -----------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "UPPERCASE", deserialize = "lowercase"))]
pub enum OptionType {
    Call,
    Put,
}

/// One option contract reading, as written to CSV. Column order in the
/// output file follows the field order here.
#[derive(Debug, Clone, Serialize)]
pub struct OptionRow {
    pub ticker: String,
    pub option_code: String,
    pub strike: f64,
    pub exp_date: NaiveDate,
    #[serde(rename = "type")]
    pub option_type: OptionType,
    pub bid: f64,
    pub ask: f64,
    pub last_price: f64,
    pub mid_price: f64,
    pub volume: u64,
    pub open_interest: u64,
    pub iv: f64,
    pub timestamp: NaiveDateTime,
    pub snapshot_date: NaiveDate,
}

/// Mid is only meaningful when at least one side of the book is quoted.
pub fn mid_price(bid: f64, ask: f64) -> f64 {
    if bid > 0.0 || ask > 0.0 {
        (bid + ask) / 2.0
    } else {
        0.0
    }
}
