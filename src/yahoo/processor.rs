use chrono::{Duration, NaiveDate, NaiveDateTime};

use super::models::{Expiration, YahooOption};
use crate::models::{OptionRow, OptionType, mid_price};

// -----------------------------------------------
// EXPIRATION HANDLING
// -----------------------------------------------

/// Parse provider epochs into dated expirations. Unparseable entries are
/// dropped.
pub fn parse_expirations(epochs: &[i64]) -> Vec<Expiration> {
    epochs
        .iter()
        .filter_map(|&epoch| {
            chrono::DateTime::from_timestamp(epoch, 0)
                .map(|dt| Expiration { date: dt.date_naive(), epoch })
        })
        .collect()
}

/// Keep expirations up to `today + max_days`, inclusive.
pub fn filter_expirations(
    expirations: Vec<Expiration>,
    today: NaiveDate,
    max_days: i64,
) -> Vec<Expiration> {
    let cutoff = today + Duration::days(max_days);
    expirations.into_iter().filter(|exp| exp.date <= cutoff).collect()
}

// -----------------------------------------------
// CHAIN FLATTENING
// -----------------------------------------------

/// Flatten one expiration's calls and puts into canonical rows: calls
/// first, provider order preserved, one shared fetch timestamp. Contracts
/// with no strike are dropped.
pub fn flatten_chain(
    ticker: &str,
    exp_date: NaiveDate,
    calls: &[YahooOption],
    puts: &[YahooOption],
    fetched_at: NaiveDateTime,
) -> Vec<OptionRow> {
    let mut rows = Vec::with_capacity(calls.len() + puts.len());

    for (options, option_type) in [(calls, OptionType::Call), (puts, OptionType::Put)] {
        for option in options {
            if let Some(row) = to_row(ticker, exp_date, option, option_type, fetched_at) {
                rows.push(row);
            }
        }
    }

    rows
}

fn to_row(
    ticker: &str,
    exp_date: NaiveDate,
    option: &YahooOption,
    option_type: OptionType,
    fetched_at: NaiveDateTime,
) -> Option<OptionRow> {
    let strike = option.strike?;
    let bid = option.bid.unwrap_or(0.0);
    let ask = option.ask.unwrap_or(0.0);

    Some(OptionRow {
        ticker: ticker.to_string(),
        option_code: option.contract_symbol.clone().unwrap_or_default(),
        strike,
        exp_date,
        option_type,
        bid,
        ask,
        last_price: option.last_price.unwrap_or(0.0),
        mid_price: mid_price(bid, ask),
        volume: count_or_zero(option.volume),
        open_interest: count_or_zero(option.open_interest),
        iv: option.implied_volatility.unwrap_or(0.0),
        timestamp: fetched_at,
        snapshot_date: fetched_at.date(),
    })
}

/// Missing counts become 0; negative provider artifacts are clamped.
fn count_or_zero(value: Option<i64>) -> u64 {
    value.map(|v| v.max(0) as u64).unwrap_or(0)
}

// -----------------------------------------------
// PRICE ORACLE
// -----------------------------------------------

/// A quote is usable when present and positive.
pub fn usable_price(price: Option<f64>) -> Option<f64> {
    price.filter(|p| *p > 0.0)
}

/// The oracle's selection rule: a usable fast quote wins, otherwise the
/// latest daily close, otherwise nothing.
pub fn select_price(fast: Option<f64>, close: Option<f64>) -> Option<f64> {
    usable_price(fast).or(close)
}
