//! Integration test for the snapshot-to-outreach flow: adapt raw backend
//! rows, classify and aggregate them, and render band messages.

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};
    use pulse_core::types::RecencyBand;
    use pulse_outreach::{render_for, TemplateCatalog};
    use pulse_store::{CustomerStore, MemoryStore, RecordRowAdapter};
    use serde_json::json;

    fn reference_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    /// Raw rows the hosted backend would export, one per band plus one
    /// undated customer.
    fn sample_rows() -> Vec<serde_json::Value> {
        let days = [5, 45, 75, 120, 200, 400];
        let mut rows: Vec<serde_json::Value> = days
            .iter()
            .enumerate()
            .map(|(i, days_ago)| {
                let date = reference_now() - chrono::Duration::days(*days_ago);
                json!({
                    "customer_id": format!("c-{i}"),
                    "customer_name": format!("Customer {i} Silva"),
                    "tax_id": format!("00{i}.000.000-00"),
                    "last_purchase_date": date.to_rfc3339(),
                    "last_purchase_amount": 100.0 + *days_ago as f64,
                })
            })
            .collect();
        rows.push(json!({ "customer_id": "c-new", "customer_name": "Sem Compra" }));
        rows
    }

    fn seeded_store() -> MemoryStore {
        let adapter = RecordRowAdapter::new();
        let records = sample_rows()
            .iter()
            .map(|row| adapter.adapt_row(row).unwrap())
            .collect();
        MemoryStore::seed(records)
    }

    #[test]
    fn test_snapshot_classifies_into_every_band() {
        let store = seeded_store();
        let records = store.list_recent_purchases().unwrap();
        let snapshot = pulse_recency::aggregate(&records, reference_now());

        assert_eq!(snapshot.total_customers, 7);
        assert_eq!(snapshot.counts_by_band.len(), 6);
        let tallied: u64 = snapshot.counts_by_band.values().sum();
        assert_eq!(tallied, 6);
        assert_eq!(snapshot.median_days, 120);
    }

    #[test]
    fn test_band_listing_matches_direct_filtering() {
        let store = seeded_store();
        let now = reference_now();
        let dormant = store.list_by_band(RecencyBand::Dormant, now).unwrap();
        assert_eq!(dormant.len(), 1);
        assert_eq!(dormant[0].days_since_last_purchase, Some(200));
    }

    #[test]
    fn test_band_customers_render_outreach_messages() {
        let store = seeded_store();
        let catalog = TemplateCatalog::default_catalog();
        let now = reference_now();

        for band in RecencyBand::ALL {
            let template = catalog.get(band).unwrap();
            let customers = store.list_by_band(band, now).unwrap();
            assert_eq!(customers.len(), 1);
            let message = render_for(template, &customers[0], "Lui Bambini").unwrap();
            assert_eq!(message.band, band);
            assert!(message.body.contains("Lui Bambini"));
            assert!(!message.body.contains("{{"));
        }
    }

    #[test]
    fn test_undated_customer_survives_the_pipeline() {
        let store = seeded_store();
        let records = store.list_recent_purchases().unwrap();
        let classified: Vec<_> = records
            .iter()
            .map(|record| pulse_recency::classify(record, reference_now()))
            .collect();
        let undated = classified
            .iter()
            .find(|c| c.customer_id == "c-new")
            .unwrap();
        assert!(undated.band.is_none());
        assert!(undated.days_since_last_purchase.is_none());
    }
}
