//! Loading and normalization of the raw mortality record file.

mod contract;

pub use contract::{RawMortalityRow, normalize_rows};

use std::path::Path;

use tracing::debug;

use crate::core::MortalityRecord;
use crate::error::{DashboardError, DashboardResult};

/// Parses a JSON array of raw rows and normalizes it into canonical records.
pub fn load_records_from_str(input: &str) -> DashboardResult<Vec<MortalityRecord>> {
    let rows: Vec<RawMortalityRow> = serde_json::from_str(input)
        .map_err(|err| DashboardError::InvalidData(format!("failed to parse record file: {err}")))?;
    let row_count = rows.len();
    let records = normalize_rows(rows);
    debug!(row_count, record_count = records.len(), "loaded mortality records");
    Ok(records)
}

/// One-shot load of the record file; performed before any view is constructed.
pub fn load_records_from_path(path: impl AsRef<Path>) -> DashboardResult<Vec<MortalityRecord>> {
    let path = path.as_ref();
    let input = std::fs::read_to_string(path).map_err(|source| DashboardError::DataFile {
        path: path.display().to_string(),
        source,
    })?;
    load_records_from_str(&input)
}
