pub mod alpaca_client;
pub mod config;
pub mod models;
pub mod processor;

// Re-exports (public API)
pub use alpaca_client::AlpacaClient;
pub use models::{
    ContractsPage, ContractsResponse, DailyBar, LatestQuote, LatestTrade, OptionContract,
    OptionSnapshot, SnapshotsResponse,
};
pub use processor::{assemble_rows, strike_bounds, symbol_batches};
