pub mod config;
pub mod models;
pub mod processor;
pub mod yahoo_client;

// Re-exports (public API)
pub use models::{ChartResponse, Expiration, OptionsResponse, YahooOption};
pub use processor::{filter_expirations, flatten_chain, parse_expirations, select_price, usable_price};
pub use yahoo_client::YahooClient;
