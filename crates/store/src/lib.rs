//! Data-access boundary for the hosted customer backend.
//!
//! The engine never talks to the backend itself: it consumes an immutable
//! snapshot handed over by a `CustomerStore`. This crate provides the trait,
//! an in-memory snapshot store, and the inbound adapter that converts the
//! backend's raw JSON rows into typed records.

pub mod adapter;
pub mod memory;
pub mod snapshot;

pub use adapter::RecordRowAdapter;
pub use memory::MemoryStore;
pub use snapshot::load_snapshot;

use chrono::{DateTime, Utc};
use pulse_core::types::{ClassifiedCustomer, PurchaseRecord, RecencyBand};
use pulse_core::PulseResult;

/// Contract the dashboard core expects from the customer data source.
pub trait CustomerStore: Send + Sync {
    /// All customers with last-purchase metadata, in a stable listing order.
    fn list_recent_purchases(&self) -> PulseResult<Vec<PurchaseRecord>>;

    /// Customers classified into the given band. Default implementation
    /// derives the answer client-side from the full listing.
    fn list_by_band(
        &self,
        band: RecencyBand,
        now: DateTime<Utc>,
    ) -> PulseResult<Vec<ClassifiedCustomer>> {
        Ok(pulse_recency::filter_by_band(
            &self.list_recent_purchases()?,
            band,
            now,
        ))
    }
}
