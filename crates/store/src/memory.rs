//! In-memory snapshot store keyed by customer id.

use dashmap::DashMap;
use pulse_core::types::PurchaseRecord;
use pulse_core::PulseResult;
use tracing::debug;

use crate::CustomerStore;

/// Holds the most recent snapshot of the backend's last-purchase table.
/// Upserts replace by customer id; listings sort by customer id so callers
/// see a stable order regardless of insertion history.
#[derive(Default)]
pub struct MemoryStore {
    records: DashMap<String, PurchaseRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }

    /// Seed the store from an adapted snapshot, replacing existing rows.
    pub fn seed(records: Vec<PurchaseRecord>) -> Self {
        let store = Self::new();
        for record in records {
            store.upsert(record);
        }
        store
    }

    pub fn upsert(&self, record: PurchaseRecord) {
        debug!(customer_id = %record.customer_id, "upserting purchase record");
        self.records.insert(record.customer_id.clone(), record);
    }

    pub fn remove(&self, customer_id: &str) -> Option<PurchaseRecord> {
        self.records.remove(customer_id).map(|(_, record)| record)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl CustomerStore for MemoryStore {
    fn list_recent_purchases(&self) -> PulseResult<Vec<PurchaseRecord>> {
        let mut records: Vec<PurchaseRecord> = self
            .records
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        records.sort_by(|a, b| a.customer_id.cmp(&b.customer_id));
        Ok(records)
    }
}
