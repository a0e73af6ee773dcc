pub mod alpaca;
pub mod config;
pub mod logging;
pub mod models;
pub mod output;
pub mod yahoo;

// Re-exports for convenience
pub use alpaca::AlpacaClient;
pub use models::{OptionRow, OptionType, mid_price};
pub use yahoo::YahooClient;
