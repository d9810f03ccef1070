//! Per-record recency classification.

use chrono::{DateTime, Utc};
use pulse_core::types::{ClassifiedCustomer, PurchaseRecord, RecencyBand};

/// Classify one record against the reference time.
///
/// A record without a purchase date is returned with both derived fields
/// absent so callers can still render it ("N/A"), never dropped. A
/// future-dated purchase keeps its negative day count and gets no band;
/// the reference time invariant that prevents this is upstream.
pub fn classify(record: &PurchaseRecord, now: DateTime<Utc>) -> ClassifiedCustomer {
    let days_since_last_purchase = record
        .last_purchase_date
        .map(|date| (now - date).num_days());
    let band = days_since_last_purchase.and_then(RecencyBand::from_days);

    ClassifiedCustomer {
        customer_id: record.customer_id.clone(),
        customer_name: record.customer_name.clone(),
        tax_id: record.tax_id.clone(),
        days_since_last_purchase,
        band,
        last_purchase_date: record.last_purchase_date,
        last_purchase_amount: record.last_purchase_amount,
    }
}
