use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::models::OptionType;

// -----------------------------------------------
// CONTRACT DISCOVERY (trading API)
// -----------------------------------------------

/// One listed option contract. The trading API encodes its numeric fields
/// as strings.
#[derive(Debug, Clone, Deserialize)]
pub struct OptionContract {
    pub symbol: String,

    pub expiration_date: NaiveDate,

    #[serde(rename = "type")]
    pub contract_type: OptionType,

    pub strike_price: String,

    pub open_interest: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ContractsPage {
    pub option_contracts: Vec<OptionContract>,
    pub next_page_token: Option<String>,
}

/// The contracts endpoint answers with either a paginated object or a bare
/// contract array, depending on account plan.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ContractsResponse {
    Paged(ContractsPage),
    Bare(Vec<OptionContract>),
}

impl ContractsResponse {
    /// Split into this page's contracts and the continuation token, if any.
    pub fn into_page(self) -> (Vec<OptionContract>, Option<String>) {
        match self {
            ContractsResponse::Paged(page) => (page.option_contracts, page.next_page_token),
            ContractsResponse::Bare(contracts) => (contracts, None),
        }
    }
}

// -----------------------------------------------
// SNAPSHOTS (market data API)
// -----------------------------------------------

#[derive(Debug, Deserialize)]
pub struct SnapshotsResponse {
    #[serde(default)]
    pub snapshots: HashMap<String, OptionSnapshot>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionSnapshot {
    pub latest_quote: Option<LatestQuote>,
    pub latest_trade: Option<LatestTrade>,
    pub implied_volatility: Option<f64>,
    pub daily_bar: Option<DailyBar>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LatestQuote {
    #[serde(rename = "bp")]
    pub bid_price: Option<f64>,

    #[serde(rename = "ap")]
    pub ask_price: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LatestTrade {
    #[serde(rename = "p")]
    pub price: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DailyBar {
    #[serde(rename = "v")]
    pub volume: Option<u64>,
}
