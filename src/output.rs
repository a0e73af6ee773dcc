use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;

use crate::models::OptionRow;

// -----------------------------------------------
// CSV OUTPUT
// -----------------------------------------------

/// Write rows to `dir/filename`, creating the directory first if needed.
/// Headers come from the row schema, one line per contract.
pub fn write_csv(dir: &Path, filename: &str, rows: &[OptionRow]) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let path = dir.join(filename);
    let mut writer = csv::Writer::from_path(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    for row in rows {
        writer
            .serialize(row)
            .with_context(|| format!("Failed to write row for {}", row.option_code))?;
    }

    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", path.display()))?;

    Ok(path)
}

/// Write rows unless the run produced none. Returns the written path, or
/// None when there was nothing to save.
pub fn save_if_any(dir: &Path, filename: &str, rows: &[OptionRow]) -> Result<Option<PathBuf>> {
    if rows.is_empty() {
        return Ok(None);
    }
    write_csv(dir, filename, rows).map(Some)
}

/// Filename for a brokerage snapshot: `{TICKER}_options_{YYYYMMDD_HHMM}.csv`.
pub fn snapshot_csv_name(ticker: &str, stamp: NaiveDateTime) -> String {
    format!("{}_options_{}.csv", ticker, stamp.format("%Y%m%d_%H%M"))
}

/// Filename for a full chain dump: `{TICKER}_{YYYYMMDD_HHMMSS}.csv`.
pub fn chain_csv_name(ticker: &str, stamp: NaiveDateTime) -> String {
    format!("{}_{}.csv", ticker, stamp.format("%Y%m%d_%H%M%S"))
}
