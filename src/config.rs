// -----------------------------------------------
// RUNTIME CONFIGURATION
// -----------------------------------------------

/// Which pipeline to run. Controlled by the OC_MODE environment variable:
/// "alpaca" (brokerage snapshots), "yahoo" (free chain dumps), or "all".
pub fn get_execution_mode() -> String {
    std::env::var("OC_MODE").unwrap_or_else(|_| "all".to_string())
}
