//! Record filtering for the table and outreach views.

use chrono::{DateTime, Utc};
use pulse_core::types::{ClassifiedCustomer, PurchaseRecord, RecencyBand};

use crate::classify::classify;

/// Classified records whose band equals the requested one, in input order.
/// A band with no members yields an empty list.
pub fn filter_by_band(
    records: &[PurchaseRecord],
    band: RecencyBand,
    now: DateTime<Utc>,
) -> Vec<ClassifiedCustomer> {
    records
        .iter()
        .map(|record| classify(record, now))
        .filter(|classified| classified.band == Some(band))
        .collect()
}

/// Case-insensitive substring match against customer name and tax id,
/// input order preserved. An empty query returns all records unfiltered.
pub fn search(records: &[PurchaseRecord], query: &str) -> Vec<PurchaseRecord> {
    if query.is_empty() {
        return records.to_vec();
    }
    let needle = query.to_lowercase();
    records
        .iter()
        .filter(|record| {
            record
                .customer_name
                .as_deref()
                .map_or(false, |name| name.to_lowercase().contains(&needle))
                || record
                    .tax_id
                    .as_deref()
                    .map_or(false, |tax_id| tax_id.to_lowercase().contains(&needle))
        })
        .cloned()
        .collect()
}

/// Customers whose day count strictly exceeds the threshold, sorted by day
/// count descending (most inactive first).
pub fn list_inactive(
    records: &[PurchaseRecord],
    threshold_days: i64,
    now: DateTime<Utc>,
) -> Vec<ClassifiedCustomer> {
    let mut inactive: Vec<ClassifiedCustomer> = records
        .iter()
        .map(|record| classify(record, now))
        .filter(|classified| {
            classified
                .days_since_last_purchase
                .map_or(false, |days| days > threshold_days)
        })
        .collect();
    inactive.sort_by(|a, b| b.days_since_last_purchase.cmp(&a.days_since_last_purchase));
    inactive
}
