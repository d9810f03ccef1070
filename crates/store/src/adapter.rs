//! Inbound transform from the hosted backend's raw rows to typed records.

use chrono::{DateTime, NaiveDate, Utc};
use pulse_core::types::PurchaseRecord;
use pulse_core::{PulseError, PulseResult};
use serde_json::Value;
use tracing::debug;

/// Converts one raw JSON row, as exported from the backend's last-purchase
/// table, into a `PurchaseRecord`.
///
/// Optional columns degrade to `None` when missing or malformed; only a row
/// without a usable customer id is rejected. Present-but-zero values (a
/// purchase today, a free order) survive as `Some(0)`, which the original
/// dashboard's truthiness checks lost.
pub struct RecordRowAdapter;

impl RecordRowAdapter {
    pub fn new() -> Self {
        Self
    }

    pub fn adapt_row(&self, raw: &Value) -> PulseResult<PurchaseRecord> {
        let customer_id = match raw.get("customer_id") {
            Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            _ => {
                return Err(PulseError::RowAdapt(
                    "row has no usable customer_id".to_string(),
                ))
            }
        };

        let record = PurchaseRecord {
            customer_id,
            customer_name: non_empty_string(raw.get("customer_name")),
            tax_id: non_empty_string(raw.get("tax_id")),
            last_purchase_date: raw.get("last_purchase_date").and_then(parse_date),
            last_purchase_amount: raw.get("last_purchase_amount").and_then(parse_amount),
        };
        debug!(customer_id = %record.customer_id, "adapted backend row");
        Ok(record)
    }
}

impl Default for RecordRowAdapter {
    fn default() -> Self {
        Self::new()
    }
}

fn non_empty_string(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn parse_date(value: &Value) -> Option<DateTime<Utc>> {
    let raw = value.as_str()?;
    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Some(date.with_timezone(&Utc));
    }
    // Date-only exports ("2024-02-15") are anchored at midnight UTC.
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn parse_amount(value: &Value) -> Option<f64> {
    let amount = value.as_f64()?;
    if amount.is_finite() && amount >= 0.0 {
        Some(amount)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_adapt_full_row() {
        let adapter = RecordRowAdapter::new();
        let record = adapter
            .adapt_row(&json!({
                "customer_id": "c-001",
                "customer_name": "Maria Oliveira",
                "tax_id": "123.456.789-00",
                "last_purchase_date": "2024-02-15T14:30:00Z",
                "last_purchase_amount": 249.90,
            }))
            .unwrap();
        assert_eq!(record.customer_id, "c-001");
        assert_eq!(record.customer_name.as_deref(), Some("Maria Oliveira"));
        assert_eq!(record.last_purchase_amount, Some(249.90));
        assert!(record.last_purchase_date.is_some());
    }

    #[test]
    fn test_adapt_numeric_id() {
        let adapter = RecordRowAdapter::new();
        let record = adapter.adapt_row(&json!({ "customer_id": 42 })).unwrap();
        assert_eq!(record.customer_id, "42");
    }

    #[test]
    fn test_row_without_id_is_rejected() {
        let adapter = RecordRowAdapter::new();
        assert!(adapter.adapt_row(&json!({ "customer_name": "Ana" })).is_err());
        assert!(adapter.adapt_row(&json!({ "customer_id": "  " })).is_err());
    }

    #[test]
    fn test_zero_amount_is_present_not_absent() {
        let adapter = RecordRowAdapter::new();
        let record = adapter
            .adapt_row(&json!({ "customer_id": "c-1", "last_purchase_amount": 0.0 }))
            .unwrap();
        assert_eq!(record.last_purchase_amount, Some(0.0));
    }

    #[test]
    fn test_malformed_optionals_degrade_to_none() {
        let adapter = RecordRowAdapter::new();
        let record = adapter
            .adapt_row(&json!({
                "customer_id": "c-1",
                "customer_name": "",
                "last_purchase_date": "not-a-date",
                "last_purchase_amount": -5.0,
            }))
            .unwrap();
        assert!(record.customer_name.is_none());
        assert!(record.last_purchase_date.is_none());
        assert!(record.last_purchase_amount.is_none());
    }

    #[test]
    fn test_date_only_export_parses() {
        let adapter = RecordRowAdapter::new();
        let record = adapter
            .adapt_row(&json!({ "customer_id": "c-1", "last_purchase_date": "2024-02-15" }))
            .unwrap();
        assert!(record.last_purchase_date.is_some());
    }
}
