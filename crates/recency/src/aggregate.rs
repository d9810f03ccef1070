//! Snapshot-wide aggregate statistics.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Utc};
use pulse_core::types::{MonthBucket, PurchaseRecord, RecencyBand, RecencySnapshot};

use crate::classify::classify;

/// Compute aggregate statistics over a record snapshot: one pass over the
/// records plus one sort of the present day counts.
///
/// Undated records count toward `total_customers` but are excluded from the
/// day statistics and both tallies. The median is the lower-middle element
/// of the sorted day counts (index `n / 2`), preserved from the dashboard's
/// observed behavior; callers must not expect interpolation for even `n`.
pub fn aggregate(records: &[PurchaseRecord], now: DateTime<Utc>) -> RecencySnapshot {
    let mut days: Vec<i64> = Vec::new();
    let mut counts_by_band: BTreeMap<RecencyBand, u64> = BTreeMap::new();
    let mut counts_by_month: BTreeMap<(i32, u32), u64> = BTreeMap::new();

    for record in records {
        let classified = classify(record, now);
        if let Some(elapsed) = classified.days_since_last_purchase {
            days.push(elapsed);
        }
        if let Some(band) = classified.band {
            *counts_by_band.entry(band).or_insert(0) += 1;
        }
        if let Some(date) = record.last_purchase_date {
            *counts_by_month.entry((date.year(), date.month())).or_insert(0) += 1;
        }
    }

    days.sort_unstable();

    let mean_days = if days.is_empty() {
        0.0
    } else {
        days.iter().sum::<i64>() as f64 / days.len() as f64
    };
    let median_days = days.get(days.len() / 2).copied().unwrap_or(0);
    let min_days = days.first().copied().unwrap_or(0);
    let max_days = days.last().copied().unwrap_or(0);

    RecencySnapshot {
        total_customers: records.len() as u64,
        mean_days,
        median_days,
        max_days,
        min_days,
        counts_by_band,
        // The (year, month) key order makes "10/2023" precede "2/2024";
        // a sort on the display label would not.
        counts_by_month: counts_by_month
            .into_iter()
            .map(|((year, month), count)| MonthBucket {
                label: format!("{month}/{year}"),
                count,
            })
            .collect(),
        generated_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn reference_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn dated_record(id: &str, days_ago: i64) -> PurchaseRecord {
        PurchaseRecord {
            customer_id: id.to_string(),
            customer_name: None,
            tax_id: None,
            last_purchase_date: Some(reference_now() - chrono::Duration::days(days_ago)),
            last_purchase_amount: None,
        }
    }

    fn undated_record(id: &str) -> PurchaseRecord {
        PurchaseRecord {
            customer_id: id.to_string(),
            customer_name: None,
            tax_id: None,
            last_purchase_date: None,
            last_purchase_amount: None,
        }
    }

    #[test]
    fn test_aggregate_empty_snapshot() {
        let snapshot = aggregate(&[], reference_now());
        assert_eq!(snapshot.total_customers, 0);
        assert_eq!(snapshot.mean_days, 0.0);
        assert_eq!(snapshot.median_days, 0);
        assert_eq!(snapshot.max_days, 0);
        assert_eq!(snapshot.min_days, 0);
        assert!(snapshot.counts_by_band.is_empty());
        assert!(snapshot.counts_by_month.is_empty());
    }

    #[test]
    fn test_aggregate_one_record_per_band() {
        let records: Vec<PurchaseRecord> = [5, 45, 75, 120, 200, 400]
            .iter()
            .enumerate()
            .map(|(i, days)| dated_record(&format!("c-{i}"), *days))
            .collect();

        let snapshot = aggregate(&records, reference_now());
        assert_eq!(snapshot.counts_by_band.len(), 6);
        for band in RecencyBand::ALL {
            assert_eq!(snapshot.counts_by_band.get(&band), Some(&1));
        }
    }

    #[test]
    fn test_aggregate_band_counts_cover_dated_records() {
        let records = vec![
            dated_record("c-0", 3),
            dated_record("c-1", 40),
            dated_record("c-2", 40),
            undated_record("c-3"),
        ];
        let snapshot = aggregate(&records, reference_now());
        assert_eq!(snapshot.total_customers, 4);
        let tallied: u64 = snapshot.counts_by_band.values().sum();
        assert_eq!(tallied, 3);
        // Zero-count bands are omitted, not emitted as zero.
        assert_eq!(snapshot.counts_by_band.len(), 2);
    }

    #[test]
    fn test_median_is_lower_middle_element() {
        let odd = vec![
            dated_record("c-0", 30),
            dated_record("c-1", 10),
            dated_record("c-2", 20),
        ];
        assert_eq!(aggregate(&odd, reference_now()).median_days, 20);

        let even = vec![dated_record("c-0", 20), dated_record("c-1", 10)];
        assert_eq!(aggregate(&even, reference_now()).median_days, 20);
    }

    #[test]
    fn test_mean_ignores_undated_records() {
        let records = vec![
            dated_record("c-0", 10),
            dated_record("c-1", 30),
            undated_record("c-2"),
        ];
        let snapshot = aggregate(&records, reference_now());
        assert_eq!(snapshot.mean_days, 20.0);
        assert_eq!(snapshot.min_days, 10);
        assert_eq!(snapshot.max_days, 30);
    }

    #[test]
    fn test_month_buckets_sort_chronologically() {
        let now = reference_now();
        let mut records = Vec::new();
        for (i, (year, month)) in [(2024, 2), (2023, 10), (2023, 10), (2024, 1)]
            .iter()
            .enumerate()
        {
            records.push(PurchaseRecord {
                customer_id: format!("c-{i}"),
                customer_name: None,
                tax_id: None,
                last_purchase_date: Some(Utc.with_ymd_and_hms(*year, *month, 15, 0, 0, 0).unwrap()),
                last_purchase_amount: None,
            });
        }

        let snapshot = aggregate(&records, now);
        let labels: Vec<&str> = snapshot
            .counts_by_month
            .iter()
            .map(|bucket| bucket.label.as_str())
            .collect();
        // "10/2023" before "2/2024" even though a string sort disagrees.
        assert_eq!(labels, vec!["10/2023", "1/2024", "2/2024"]);
        assert_eq!(snapshot.counts_by_month[0].count, 2);
    }

    #[test]
    fn test_aggregate_is_deterministic() {
        let records = vec![dated_record("c-0", 12), dated_record("c-1", 250)];
        let now = reference_now();
        let a = aggregate(&records, now);
        let b = aggregate(&records, now);
        assert_eq!(a.counts_by_band, b.counts_by_band);
        assert_eq!(a.median_days, b.median_days);
        assert_eq!(a.mean_days, b.mean_days);
    }
}
