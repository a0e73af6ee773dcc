use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};

use super::models::{OptionContract, OptionSnapshot};
use crate::models::{OptionRow, mid_price};

// -----------------------------------------------
// DISCOVERY WINDOW
// -----------------------------------------------

/// Strike window around the current price: `price * (1 ± pct)`.
pub fn strike_bounds(price: f64, pct: f64) -> (f64, f64) {
    (price * (1.0 - pct), price * (1.0 + pct))
}

// -----------------------------------------------
// SNAPSHOT BATCHING
// -----------------------------------------------

/// Chunk contract symbols into snapshot request batches, order preserved.
pub fn symbol_batches(symbols: &[String], batch_size: usize) -> Vec<Vec<String>> {
    symbols.chunks(batch_size).map(|chunk| chunk.to_vec()).collect()
}

// -----------------------------------------------
// ROW ASSEMBLY
// -----------------------------------------------

/// Join discovered contracts with their snapshots into canonical rows.
///
/// Every contract yields a row. Contracts with no snapshot (beyond the
/// quota cap, or in a failed batch) keep all market fields at zero.
pub fn assemble_rows(
    ticker: &str,
    contracts: &[OptionContract],
    snapshots: &HashMap<String, OptionSnapshot>,
    fetched_at: NaiveDateTime,
    snapshot_date: NaiveDate,
) -> Vec<OptionRow> {
    contracts
        .iter()
        .map(|contract| {
            let mut bid = 0.0;
            let mut ask = 0.0;
            let mut last_price = 0.0;
            let mut volume = 0u64;
            let mut open_interest = 0u64;
            let mut iv = 0.0;

            if let Some(snap) = snapshots.get(&contract.symbol) {
                if let Some(quote) = &snap.latest_quote {
                    bid = quote.bid_price.unwrap_or(0.0);
                    ask = quote.ask_price.unwrap_or(0.0);
                }
                if let Some(trade) = &snap.latest_trade {
                    last_price = trade.price.unwrap_or(0.0);
                }
                if let Some(bar) = &snap.daily_bar {
                    volume = bar.volume.unwrap_or(0);
                }
                open_interest = contract
                    .open_interest
                    .as_deref()
                    .and_then(|oi| oi.parse().ok())
                    .unwrap_or(0);
                iv = snap.implied_volatility.unwrap_or(0.0);
            }

            OptionRow {
                ticker: ticker.to_string(),
                option_code: contract.symbol.clone(),
                strike: contract.strike_price.parse().unwrap_or(0.0),
                exp_date: contract.expiration_date,
                option_type: contract.contract_type,
                bid,
                ask,
                last_price,
                mid_price: mid_price(bid, ask),
                volume,
                open_interest,
                iv,
                timestamp: fetched_at,
                snapshot_date,
            }
        })
        .collect()
}
