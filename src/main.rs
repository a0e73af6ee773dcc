use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::Local;
use colored::Colorize;

use oc_scraper::alpaca::{self, AlpacaClient};
use oc_scraper::yahoo::{self, YahooClient};
use oc_scraper::{config, logging, output};

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_logging();

    let mode = config::get_execution_mode();
    match mode.as_str() {
        "alpaca" => run_alpaca().await?,
        "yahoo" => run_yahoo().await?,
        "all" => {
            // Brokerage pipeline first; a missing key must not block the
            // free provider run
            if let Err(e) = run_alpaca().await {
                println!("{} Brokerage pipeline failed: {:#}", "✗".red(), e);
            }
            println!();
            run_yahoo().await?;
        }
        _ => {
            eprintln!("Invalid mode: '{}'", mode);
            eprintln!("Set OC_MODE to choose a pipeline:");
            eprintln!("  OC_MODE=alpaca cargo run    # brokerage snapshots");
            eprintln!("  OC_MODE=yahoo cargo run     # free provider chain dumps");
            eprintln!("  OC_MODE=all cargo run       # both, in sequence (default)");
            std::process::exit(1);
        }
    }

    Ok(())
}

// -----------------------------------------------
// PIPELINE A: BROKERAGE SNAPSHOTS
// -----------------------------------------------

/// One CSV per ticker in the working directory: discovered contracts with
/// snapshot quotes for the first batch of them.
async fn run_alpaca() -> Result<()> {
    println!("{}", "=".repeat(60).blue());
    println!("{}", "Options Snapshot Fetch (brokerage)".green().bold());
    println!("{}", "=".repeat(60).blue());

    let alpaca = AlpacaClient::from_env()?;
    let yahoo = YahooClient::new()?;

    let exp_days = alpaca::config::get_exp_days();
    let strike_pct = alpaca::config::get_strike_pct();
    println!(
        "{} Expiry horizon: {} days, strike window: ±{:.0}%",
        "ℹ".blue(),
        exp_days,
        strike_pct * 100.0
    );

    let start_time = Instant::now();
    let mut saved = 0usize;
    let mut skipped: Vec<(String, String)> = Vec::new();

    for &ticker in alpaca::config::TICKERS {
        println!();
        println!("{} Fetching {} options chain...", "→".cyan(), ticker.yellow());

        let current_price = yahoo.current_price(ticker).await;
        println!("{} {} current price: {:.2}", "💰".green(), ticker.yellow(), current_price);

        let rows = match alpaca
            .fetch_chain_snapshot(ticker, current_price, exp_days, strike_pct)
            .await
        {
            Ok(rows) => rows,
            Err(e) => {
                println!("{} {} failed: {}", "✗".red(), ticker.yellow(), e);
                skipped.push((ticker.to_string(), e.to_string()));
                continue;
            }
        };

        println!("{} Found {} contracts for {}", "✓".green(), rows.len(), ticker.yellow());

        let filename = output::snapshot_csv_name(ticker, Local::now().naive_local());
        match output::save_if_any(Path::new("."), &filename, &rows)? {
            Some(path) => {
                println!("{} Saved {} contracts to {}", "✓".green(), rows.len(), path.display());
                saved += 1;
            }
            None => println!("{} No data for {}", "✗".red(), ticker.yellow()),
        }
    }

    let elapsed = start_time.elapsed();

    println!();
    println!("{}", "=".repeat(60).blue());
    println!("{}", "Summary".cyan().bold());
    println!("{}", "=".repeat(60).blue());
    println!("{} Saved: {}", "✓".green(), saved);
    println!("{} Skipped: {}", "✗".red(), skipped.len());
    println!("{} Time taken: {:.2}s", "⏱".yellow(), elapsed.as_secs_f64());

    if !skipped.is_empty() {
        println!();
        println!("{}", "Skipped tickers:".red());
        for (ticker, error) in &skipped {
            println!(
                "  {} {} → {}",
                "✗".red(),
                ticker.yellow(),
                error.chars().take(80).collect::<String>()
            );
        }
    }

    Ok(())
}

// -----------------------------------------------
// PIPELINE B: FREE PROVIDER CHAIN DUMPS
// -----------------------------------------------

/// Full chains for every ticker, one timestamped CSV each under the
/// output directory.
async fn run_yahoo() -> Result<()> {
    println!("{}", "=".repeat(60).blue());
    println!("{}", "Options Chain Fetch (free provider)".green().bold());
    println!("{}", "=".repeat(60).blue());

    let output_dir = yahoo::config::get_output_dir();
    println!("{} Output directory: {}", "ℹ".blue(), output_dir);

    let client = YahooClient::new()?;
    let start_time = Instant::now();
    let mut saved = 0usize;

    for &ticker in yahoo::config::TICKERS {
        println!();
        println!("{}", "=".repeat(60).blue());
        println!("Fetching options chain for {}", ticker.yellow());
        println!("{}", "=".repeat(60).blue());

        let rows = client
            .fetch_option_chain(ticker, yahoo::config::MAX_EXPIRY_DAYS)
            .await;

        let filename = output::chain_csv_name(ticker, Local::now().naive_local());
        match output::save_if_any(Path::new(&output_dir), &filename, &rows)? {
            Some(path) => {
                println!("{} Saved {} records to {}", "✓".green(), rows.len(), path.display());
                saved += 1;
            }
            None => println!("{} No data retrieved for {}", "⚠".yellow(), ticker.yellow()),
        }

        tokio::time::sleep(Duration::from_millis(yahoo::config::TICKER_DELAY_MS)).await;
    }

    let elapsed = start_time.elapsed();

    println!();
    println!("{}", "=".repeat(60).blue());
    println!("{}", "Summary".cyan().bold());
    println!("{}", "=".repeat(60).blue());
    println!("{} Saved: {}/{}", "✓".green(), saved, yahoo::config::TICKERS.len());
    println!("{} Time taken: {:.2}s", "⏱".yellow(), elapsed.as_secs_f64());

    Ok(())
}
