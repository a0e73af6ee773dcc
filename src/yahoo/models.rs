use chrono::NaiveDate;
use serde::Deserialize;

// -----------------------------------------------
// OPTIONS CHAIN RESPONSE (v7 API)
// -----------------------------------------------

#[derive(Debug, Deserialize)]
pub struct OptionsResponse {
    #[serde(rename = "optionChain")]
    pub option_chain: OptionChain,
}

#[derive(Debug, Deserialize)]
pub struct OptionChain {
    #[serde(default)]
    pub result: Vec<OptionChainData>,
}

#[derive(Debug, Deserialize)]
pub struct OptionChainData {
    #[serde(rename = "expirationDates", default)]
    pub expiration_dates: Vec<i64>,

    #[serde(default)]
    pub options: Vec<OptionsSlice>,
}

/// Calls and puts for a single expiration.
#[derive(Debug, Deserialize)]
pub struct OptionsSlice {
    #[serde(default)]
    pub calls: Vec<YahooOption>,

    #[serde(default)]
    pub puts: Vec<YahooOption>,
}

/// One quoted contract. Thin chains leave most of these out, so everything
/// except the strike is optional.
#[derive(Debug, Clone, Deserialize)]
pub struct YahooOption {
    #[serde(rename = "contractSymbol")]
    pub contract_symbol: Option<String>,

    pub strike: Option<f64>,

    pub bid: Option<f64>,

    pub ask: Option<f64>,

    #[serde(rename = "lastPrice")]
    pub last_price: Option<f64>,

    pub volume: Option<i64>,

    #[serde(rename = "openInterest")]
    pub open_interest: Option<i64>,

    #[serde(rename = "impliedVolatility")]
    pub implied_volatility: Option<f64>,
}

/// An expiration as the provider reports it: parsed date plus the raw
/// epoch, which the per-expiration request passes back verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expiration {
    pub date: NaiveDate,
    pub epoch: i64,
}

// -----------------------------------------------
// CHART RESPONSE (v8 API, price oracle)
// -----------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ChartResponse {
    pub chart: Chart,
}

#[derive(Debug, Deserialize)]
pub struct Chart {
    pub result: Option<Vec<ChartData>>,
}

#[derive(Debug, Deserialize)]
pub struct ChartData {
    pub meta: ChartMeta,

    #[serde(default)]
    pub indicators: Indicators,
}

#[derive(Debug, Deserialize)]
pub struct ChartMeta {
    #[serde(rename = "regularMarketPrice")]
    pub regular_market_price: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<QuoteBlock>,
}

#[derive(Debug, Deserialize)]
pub struct QuoteBlock {
    /// Daily closes; the provider nulls out days with no trade.
    #[serde(default)]
    pub close: Vec<Option<f64>>,
}

impl ChartResponse {
    /// The fast quote from chart metadata.
    pub fn last_price(&self) -> Option<f64> {
        self.chart
            .result
            .as_ref()?
            .first()?
            .meta
            .regular_market_price
    }

    /// Most recent non-null daily close.
    pub fn last_close(&self) -> Option<f64> {
        self.chart
            .result
            .as_ref()?
            .first()?
            .indicators
            .quote
            .first()?
            .close
            .iter()
            .rev()
            .find_map(|close| *close)
    }
}
