use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use rand::{seq::SliceRandom, thread_rng};
use reqwest::{Client, StatusCode, header};
use tokio_retry::RetryIf;
use tokio_retry::strategy::ExponentialBackoff;

use super::config;
use super::models::{ChartResponse, Expiration, OptionsResponse};
use super::processor;
use crate::models::{OptionRow, OptionType};

// -----------------------------------------------
// FREE PROVIDER CLIENT (chains + price oracle)
// -----------------------------------------------

pub struct YahooClient {
    client: Client,
}

impl YahooClient {
    pub fn new() -> Result<Self> {
        Ok(Self { client: build_client()? })
    }

    // -----------------------------------------------
    // GENERIC FETCH WITH RETRY
    // -----------------------------------------------
    async fn fetch_json(&self, url: &str) -> Result<String> {
        let retry_strategy = ExponentialBackoff::from_millis(config::RETRY_BASE_DELAY_MS)
            .factor(config::RETRY_FACTOR)
            .max_delay(Duration::from_secs(config::RETRY_MAX_DELAY_SECS))
            .take(config::RETRY_MAX_ATTEMPTS);

        RetryIf::spawn(
            retry_strategy,
            || async {
                tracing::debug!("GET {}", url);

                let res = self
                    .client
                    .get(url)
                    .send()
                    .await
                    .context("Request send failed")?;

                let status = res.status();

                if status.is_success() {
                    let text = res.text().await.context("Failed to read response body")?;

                    // Guard against HTML error pages served with a 200
                    let trimmed = text.trim_start();
                    if !trimmed.starts_with('{') && !trimmed.starts_with('[') {
                        let preview: String = text.chars().take(200).collect();
                        anyhow::bail!("Non-JSON response: {}", preview);
                    }

                    Ok(text)
                } else if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                    tracing::warn!("Retryable status {} from {}", status, url);
                    Err(RetryableStatus(status).into())
                } else {
                    let body = res.text().await.unwrap_or_default();
                    let preview: String = body.chars().take(200).collect();
                    anyhow::bail!("Client error HTTP {}: {}", status, preview)
                }
            },
            is_retryable,
        )
        .await
    }

    // -----------------------------------------------
    // PRICE ORACLE
    // -----------------------------------------------

    /// Current price for the discovery window. Falls back to the most
    /// recent daily close, then to a fixed sentinel, so callers always get
    /// a number back.
    pub async fn current_price(&self, ticker: &str) -> f64 {
        match self.try_current_price(ticker).await {
            Ok(price) => price,
            Err(e) => {
                println!(
                    "  ⚠️ Failed to fetch current price for {}: {} (using fallback {})",
                    ticker,
                    e,
                    config::FALLBACK_PRICE
                );
                config::FALLBACK_PRICE
            }
        }
    }

    async fn try_current_price(&self, ticker: &str) -> Result<f64> {
        let fast = self.fetch_chart(ticker, "1d").await?.last_price();
        if let Some(price) = processor::select_price(fast, None) {
            return Ok(price);
        }

        // Fast quote missing or bogus: take the last daily close instead
        let close = self.fetch_chart(ticker, "5d").await?.last_close();
        processor::select_price(fast, close).context("No usable price in chart response")
    }

    async fn fetch_chart(&self, ticker: &str, range: &str) -> Result<ChartResponse> {
        let text = self.fetch_json(&config::chart_url(ticker, range)).await?;
        serde_json::from_str(&text).context("Failed to parse chart response")
    }

    // -----------------------------------------------
    // OPTIONS CHAIN
    // -----------------------------------------------

    /// Expirations the provider lists for `ticker`, raw epochs preserved.
    pub async fn fetch_expirations(&self, ticker: &str) -> Result<Vec<Expiration>> {
        let text = self.fetch_json(&config::options_url(ticker)).await?;
        let response: OptionsResponse = serde_json::from_str(&text)
            .context("Failed to parse options response")?;

        let data = response
            .option_chain
            .result
            .into_iter()
            .next()
            .context("No options data returned")?;

        Ok(processor::parse_expirations(&data.expiration_dates))
    }

    /// One expiration's chain, flattened into canonical rows.
    pub async fn fetch_expiry_chain(
        &self,
        ticker: &str,
        expiration: Expiration,
    ) -> Result<Vec<OptionRow>> {
        let text = self
            .fetch_json(&config::options_expiry_url(ticker, expiration.epoch))
            .await?;
        let response: OptionsResponse = serde_json::from_str(&text)
            .context("Failed to parse option chain")?;

        let slice = response
            .option_chain
            .result
            .into_iter()
            .next()
            .context("No option chain returned")?
            .options
            .into_iter()
            .next()
            .context("Empty option chain")?;

        let fetched_at = Local::now().naive_local();
        Ok(processor::flatten_chain(
            ticker,
            expiration.date,
            &slice.calls,
            &slice.puts,
            fetched_at,
        ))
    }

    // -----------------------------------------------
    // FULL FETCH FOR ONE TICKER
    // -----------------------------------------------

    /// All chains within the horizon for one ticker. Any failure is
    /// absorbed into an empty result so the batch keeps moving.
    pub async fn fetch_option_chain(&self, ticker: &str, max_expiry_days: i64) -> Vec<OptionRow> {
        match self.try_fetch_option_chain(ticker, max_expiry_days).await {
            Ok(rows) => rows,
            Err(e) => {
                println!("❌ Error fetching options chain for {}: {}", ticker, e);
                Vec::new()
            }
        }
    }

    async fn try_fetch_option_chain(
        &self,
        ticker: &str,
        max_expiry_days: i64,
    ) -> Result<Vec<OptionRow>> {
        let expirations = self.fetch_expirations(ticker).await?;
        if expirations.is_empty() {
            println!("No options data available for {}", ticker);
            return Ok(Vec::new());
        }

        let today = Local::now().date_naive();
        let expirations = processor::filter_expirations(expirations, today, max_expiry_days);
        println!(
            "Found {} expiration dates within {} days",
            expirations.len(),
            max_expiry_days
        );

        let mut all_rows: Vec<OptionRow> = Vec::new();
        for expiration in expirations {
            println!("  -> Fetching expiration {}", expiration.date);

            match self.fetch_expiry_chain(ticker, expiration).await {
                Ok(rows) => all_rows.extend(rows),
                Err(e) => println!("  ❌ Error fetching {}: {}", expiration.date, e),
            }

            tokio::time::sleep(Duration::from_millis(config::EXPIRY_DELAY_MS)).await;
        }

        let calls = all_rows.iter().filter(|r| r.option_type == OptionType::Call).count();
        let puts = all_rows.len() - calls;
        println!(
            "✅ {}: {} options fetched (Calls: {}, Puts: {})",
            ticker,
            all_rows.len(),
            calls,
            puts
        );

        Ok(all_rows)
    }
}

// -----------------------------------------------
// RETRY CLASSIFICATION
// -----------------------------------------------

/// Statuses worth re-issuing. Everything else surfaces on the first
/// attempt.
#[derive(Debug)]
struct RetryableStatus(StatusCode);

impl std::fmt::Display for RetryableStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Retryable error: HTTP {}", self.0)
    }
}

impl std::error::Error for RetryableStatus {}

fn is_retryable(error: &anyhow::Error) -> bool {
    error.downcast_ref::<RetryableStatus>().is_some()
}

// -----------------------------------------------
// HTTP CLIENT BUILDER
// -----------------------------------------------

fn build_client() -> Result<Client> {
    let mut headers = header::HeaderMap::new();

    // Browser-like headers, Accept-Language rotated per session
    let lang = config::ACCEPT_LANGUAGES
        .choose(&mut thread_rng())
        .unwrap();
    headers.insert(header::ACCEPT_LANGUAGE, header::HeaderValue::from_str(lang)?);
    headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

    let client = Client::builder()
        .user_agent(config::USER_AGENT)
        .default_headers(headers)
        .cookie_store(true)
        .gzip(true)
        .timeout(config::HTTP_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")?;

    Ok(client)
}
