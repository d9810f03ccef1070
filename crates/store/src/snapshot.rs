//! Snapshot loading from a backend table export.

use std::path::Path;

use pulse_core::types::PurchaseRecord;
use pulse_core::{PulseError, PulseResult};
use serde_json::Value;
use tracing::{info, warn};

use crate::adapter::RecordRowAdapter;

/// Read a JSON array export of the backend's last-purchase table and adapt
/// every row. Malformed rows are logged and skipped; only an unreadable or
/// non-array file is an error.
pub fn load_snapshot(path: impl AsRef<Path>) -> PulseResult<Vec<PurchaseRecord>> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)?;
    let rows: Vec<Value> = serde_json::from_str::<Value>(&contents)?
        .as_array()
        .cloned()
        .ok_or_else(|| {
            PulseError::SnapshotLoad(format!("{} is not a JSON array", path.display()))
        })?;

    let adapter = RecordRowAdapter::new();
    let mut records = Vec::with_capacity(rows.len());
    let mut skipped = 0usize;
    for row in &rows {
        match adapter.adapt_row(row) {
            Ok(record) => records.push(record),
            Err(error) => {
                warn!(%error, "skipping malformed snapshot row");
                skipped += 1;
            }
        }
    }

    info!(
        path = %path.display(),
        loaded = records.len(),
        skipped,
        "loaded purchase snapshot"
    );
    Ok(records)
}
