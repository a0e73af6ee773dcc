use std::collections::HashMap;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{Duration as ChronoDuration, Local};
use reqwest::{Client, StatusCode, header};
use tokio_retry::RetryIf;
use tokio_retry::strategy::ExponentialBackoff;

use super::config;
use super::models::{ContractsResponse, OptionContract, OptionSnapshot, SnapshotsResponse};
use super::processor;
use crate::models::OptionRow;

// -----------------------------------------------
// BROKERAGE CLIENT (trading + market data APIs)
// -----------------------------------------------

pub struct AlpacaClient {
    client: Client,
}

impl AlpacaClient {
    /// Build a client from the two credential environment variables.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(config::API_KEY_ENV)
            .with_context(|| format!("{} not set", config::API_KEY_ENV))?;
        let secret_key = std::env::var(config::SECRET_KEY_ENV)
            .with_context(|| format!("{} not set", config::SECRET_KEY_ENV))?;

        Ok(Self { client: build_client(&api_key, &secret_key)? })
    }

    // -----------------------------------------------
    // GENERIC FETCH WITH RETRY
    // -----------------------------------------------
    async fn fetch_json(&self, url: &str, query: &[(String, String)]) -> Result<String> {
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
                    .query(query)
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
    // CONTRACT DISCOVERY
    // -----------------------------------------------

    /// Enumerate active contracts within the expiry horizon and strike
    /// window, following cursor pagination until the token runs out.
    pub async fn fetch_option_contracts(
        &self,
        ticker: &str,
        exp_days: i64,
        strike_low: f64,
        strike_high: f64,
    ) -> Result<Vec<OptionContract>> {
        let exp_max = Local::now().date_naive() + ChronoDuration::days(exp_days);

        let mut all_contracts: Vec<OptionContract> = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query: Vec<(String, String)> = vec![
                ("underlying_symbols".to_string(), ticker.to_string()),
                ("status".to_string(), "active".to_string()),
                ("expiration_date_lte".to_string(), exp_max.to_string()),
                ("strike_price_gte".to_string(), strike_low.to_string()),
                ("strike_price_lte".to_string(), strike_high.to_string()),
            ];
            if let Some(token) = &page_token {
                query.push(("page_token".to_string(), token.clone()));
            }

            let text = self.fetch_json(&config::contracts_url(), &query).await?;
            let response: ContractsResponse = serde_json::from_str(&text)
                .context("Failed to parse contracts response")?;

            let (contracts, next_token) = response.into_page();
            all_contracts.extend(contracts);

            page_token = next_token;
            if page_token.is_none() {
                break;
            }
        }

        Ok(all_contracts)
    }

    // -----------------------------------------------
    // SNAPSHOT ENRICHMENT
    // -----------------------------------------------

    /// Fetch quote/trade/IV snapshots in fixed-size batches. A failed batch
    /// contributes nothing; the remaining batches still go out.
    pub async fn fetch_snapshots(
        &self,
        ticker: &str,
        symbols: &[String],
    ) -> HashMap<String, OptionSnapshot> {
        let mut all_snapshots = HashMap::new();

        let batches = processor::symbol_batches(symbols, config::SNAPSHOT_BATCH_SIZE);
        for (index, batch) in batches.into_iter().enumerate() {
            let query = vec![("symbols".to_string(), batch.join(","))];

            match self.fetch_snapshot_batch(&query).await {
                Ok(snapshots) => all_snapshots.extend(snapshots),
                Err(e) => {
                    println!("  ⚠️ Batch {} failed for {}: {}", index, ticker, e);
                }
            }
        }

        all_snapshots
    }

    async fn fetch_snapshot_batch(
        &self,
        query: &[(String, String)],
    ) -> Result<HashMap<String, OptionSnapshot>> {
        let text = self.fetch_json(&config::snapshots_url(), query).await?;
        let response: SnapshotsResponse = serde_json::from_str(&text)
            .context("Failed to parse snapshots response")?;
        Ok(response.snapshots)
    }

    // -----------------------------------------------
    // FULL FETCH FOR ONE TICKER
    // -----------------------------------------------

    /// Discovery, capped snapshot enrichment, then row assembly. Returns one
    /// row per discovered contract.
    pub async fn fetch_chain_snapshot(
        &self,
        ticker: &str,
        current_price: f64,
        exp_days: i64,
        strike_pct: f64,
    ) -> Result<Vec<OptionRow>> {
        let (strike_low, strike_high) = processor::strike_bounds(current_price, strike_pct);

        let contracts = self
            .fetch_option_contracts(ticker, exp_days, strike_low, strike_high)
            .await?;

        if contracts.is_empty() {
            return Ok(Vec::new());
        }

        // Free-tier quota: only the first contracts get snapshot data
        let symbols: Vec<String> = contracts
            .iter()
            .take(config::SNAPSHOT_CONTRACT_CAP)
            .map(|c| c.symbol.clone())
            .collect();

        let snapshots = self.fetch_snapshots(ticker, &symbols).await;

        let fetched_at = Local::now().naive_local();
        Ok(processor::assemble_rows(
            ticker,
            &contracts,
            &snapshots,
            fetched_at,
            fetched_at.date(),
        ))
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

fn build_client(api_key: &str, secret_key: &str) -> Result<Client> {
    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::HeaderName::from_bytes(config::HEADER_API_KEY_ID.as_bytes())?,
        header::HeaderValue::from_str(api_key)?,
    );
    headers.insert(
        header::HeaderName::from_bytes(config::HEADER_API_SECRET_KEY.as_bytes())?,
        header::HeaderValue::from_str(secret_key)?,
    );
    headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

    let client = Client::builder()
        .default_headers(headers)
        .timeout(config::HTTP_TIMEOUT)
        .gzip(true)
        .build()
        .context("Failed to build HTTP client")?;

    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const NOT_FOUND: &str =
        "HTTP/1.1 404 Not Found\r\ncontent-length: 9\r\nconnection: close\r\n\r\nnot found";
    const SERVER_ERROR: &str =
        "HTTP/1.1 500 Internal Server Error\r\ncontent-length: 0\r\nconnection: close\r\n\r\n";
    const OK_JSON: &str =
        "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 2\r\nconnection: close\r\n\r\n{}";

    /// Local listener serving the canned responses in order (the last one
    /// repeats), counting requests as they arrive.
    async fn spawn_stub(responses: Vec<&'static str>) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();

        tokio::spawn(async move {
            let mut responses = responses.into_iter();
            let mut last = "";
            loop {
                let Ok((mut socket, _)) = listener.accept().await else { break };
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;
                counter.fetch_add(1, Ordering::SeqCst);

                let response = responses.next().unwrap_or(last);
                last = response;
                let _ = socket.write_all(response.as_bytes()).await;
            }
        });

        (format!("http://{}", addr), hits)
    }

    fn stub_client() -> AlpacaClient {
        AlpacaClient { client: build_client("test-key", "test-secret").unwrap() }
    }

    #[tokio::test]
    async fn test_fetch_json_client_error_is_not_retried() {
        let (url, hits) = spawn_stub(vec![NOT_FOUND]).await;
        let client = stub_client();

        let err = client.fetch_json(&url, &[]).await.unwrap_err();
        assert!(err.to_string().contains("404"));
        assert_eq!(hits.load(Ordering::SeqCst), 1); // fail fast, no retries
    }

    #[tokio::test]
    async fn test_fetch_json_retries_server_errors() {
        let (url, hits) = spawn_stub(vec![SERVER_ERROR, OK_JSON]).await;
        let client = stub_client();

        let text = client.fetch_json(&url, &[]).await.unwrap();
        assert_eq!(text, "{}");
        assert_eq!(hits.load(Ordering::SeqCst), 2); // one retry after the 500
    }

    #[tokio::test]
    #[ignore] // Requires network and ALPACA_API_KEY / ALPACA_SECRET_KEY
    async fn test_fetch_option_contracts_live() {
        let client = AlpacaClient::from_env().unwrap();
        let contracts = client
            .fetch_option_contracts("NFLX", 45, 800.0, 1500.0)
            .await
            .unwrap();

        assert!(!contracts.is_empty());
        for contract in &contracts {
            assert!(contract.symbol.starts_with("NFLX"));
        }
    }

    #[tokio::test]
    #[ignore] // Requires network and ALPACA_API_KEY / ALPACA_SECRET_KEY
    async fn test_fetch_chain_snapshot_live() {
        let client = AlpacaClient::from_env().unwrap();
        let rows = client.fetch_chain_snapshot("NFLX", 1000.0, 45, 0.3).await.unwrap();

        assert!(!rows.is_empty());
        for row in &rows {
            assert_eq!(row.ticker, "NFLX");
            if row.bid > 0.0 || row.ask > 0.0 {
                assert!(row.mid_price > 0.0);
            }
        }
    }
}
