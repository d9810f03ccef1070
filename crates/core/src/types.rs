use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::PulseError;

/// A customer's last-purchase record as supplied by the hosted data backend.
///
/// All optional fields use explicit `Option` typing so that a present value
/// of zero is never conflated with "absent".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PurchaseRecord {
    pub customer_id: String,
    pub customer_name: Option<String>,
    /// Secondary identifier (tax id) used by the table search.
    pub tax_id: Option<String>,
    pub last_purchase_date: Option<DateTime<Utc>>,
    pub last_purchase_amount: Option<f64>,
}

/// Recency band assigned from the number of whole days since a customer's
/// last purchase. The six bands are contiguous, non-overlapping, and
/// exhaustive over non-negative day counts.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
pub enum RecencyBand {
    #[serde(rename = "0-30")]
    New,
    #[serde(rename = "31-60")]
    Active,
    #[serde(rename = "61-90")]
    Cooling,
    #[serde(rename = "91-180")]
    AtRisk,
    #[serde(rename = "181-365")]
    Dormant,
    #[serde(rename = "365+")]
    Lost,
}

impl RecencyBand {
    /// All bands in ascending day order.
    pub const ALL: [RecencyBand; 6] = [
        RecencyBand::New,
        RecencyBand::Active,
        RecencyBand::Cooling,
        RecencyBand::AtRisk,
        RecencyBand::Dormant,
        RecencyBand::Lost,
    ];

    /// Closed-form band lookup. Negative day counts (future-dated purchases)
    /// map to no band rather than panicking.
    pub fn from_days(days: i64) -> Option<Self> {
        match days {
            0..=30 => Some(RecencyBand::New),
            31..=60 => Some(RecencyBand::Active),
            61..=90 => Some(RecencyBand::Cooling),
            91..=180 => Some(RecencyBand::AtRisk),
            181..=365 => Some(RecencyBand::Dormant),
            d if d > 365 => Some(RecencyBand::Lost),
            _ => None,
        }
    }

    /// Wire label as used by the dashboard ("0-30", ..., "365+").
    pub fn label(&self) -> &'static str {
        match self {
            RecencyBand::New => "0-30",
            RecencyBand::Active => "31-60",
            RecencyBand::Cooling => "61-90",
            RecencyBand::AtRisk => "91-180",
            RecencyBand::Dormant => "181-365",
            RecencyBand::Lost => "365+",
        }
    }
}

impl fmt::Display for RecencyBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RecencyBand {
    type Err = PulseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecencyBand::ALL
            .into_iter()
            .find(|band| band.label() == s)
            .ok_or_else(|| PulseError::UnknownBand(s.to_string()))
    }
}

/// A purchase record enriched with its derived recency fields. Ephemeral:
/// recomputed on every query, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ClassifiedCustomer {
    pub customer_id: String,
    pub customer_name: Option<String>,
    pub tax_id: Option<String>,
    /// Whole days since the last purchase. Signed: future-dated purchases
    /// yield a negative count and no band.
    pub days_since_last_purchase: Option<i64>,
    pub band: Option<RecencyBand>,
    pub last_purchase_date: Option<DateTime<Utc>>,
    pub last_purchase_amount: Option<f64>,
}

/// One bar of the monthly last-purchase histogram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MonthBucket {
    /// "month/year" display key, e.g. "2/2024".
    pub label: String,
    pub count: u64,
}

/// Aggregate statistics over a snapshot of purchase records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecencySnapshot {
    /// All input records, dated or not.
    pub total_customers: u64,
    /// Mean of present day counts; 0.0 when none are present.
    pub mean_days: f64,
    /// Lower-middle element of the sorted present day counts. Deliberately
    /// not the interpolated statistical median for even-length inputs.
    pub median_days: i64,
    pub max_days: i64,
    pub min_days: i64,
    /// Per-band tallies; bands with zero members are omitted.
    pub counts_by_band: BTreeMap<RecencyBand, u64>,
    /// Monthly last-purchase histogram in chronological order.
    pub counts_by_month: Vec<MonthBucket>,
    pub generated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_boundaries() {
        assert_eq!(RecencyBand::from_days(0), Some(RecencyBand::New));
        assert_eq!(RecencyBand::from_days(30), Some(RecencyBand::New));
        assert_eq!(RecencyBand::from_days(31), Some(RecencyBand::Active));
        assert_eq!(RecencyBand::from_days(60), Some(RecencyBand::Active));
        assert_eq!(RecencyBand::from_days(61), Some(RecencyBand::Cooling));
        assert_eq!(RecencyBand::from_days(90), Some(RecencyBand::Cooling));
        assert_eq!(RecencyBand::from_days(91), Some(RecencyBand::AtRisk));
        assert_eq!(RecencyBand::from_days(180), Some(RecencyBand::AtRisk));
        assert_eq!(RecencyBand::from_days(181), Some(RecencyBand::Dormant));
        assert_eq!(RecencyBand::from_days(365), Some(RecencyBand::Dormant));
        assert_eq!(RecencyBand::from_days(366), Some(RecencyBand::Lost));
        assert_eq!(RecencyBand::from_days(10_000), Some(RecencyBand::Lost));
    }

    #[test]
    fn test_negative_days_have_no_band() {
        assert_eq!(RecencyBand::from_days(-1), None);
        assert_eq!(RecencyBand::from_days(i64::MIN), None);
    }

    #[test]
    fn test_band_assignment_is_exhaustive_and_monotonic() {
        let mut previous = RecencyBand::New;
        for days in 0..1000 {
            let band = RecencyBand::from_days(days).expect("non-negative day count must map");
            assert!(band >= previous, "band regressed at {days} days");
            previous = band;
        }
    }

    #[test]
    fn test_band_label_roundtrip() {
        for band in RecencyBand::ALL {
            assert_eq!(band.label().parse::<RecencyBand>().unwrap(), band);
        }
        assert!("31-90".parse::<RecencyBand>().is_err());
    }

    #[test]
    fn test_band_serializes_to_wire_label() {
        let json = serde_json::to_string(&RecencyBand::Lost).unwrap();
        assert_eq!(json, "\"365+\"");
        let band: RecencyBand = serde_json::from_str("\"91-180\"").unwrap();
        assert_eq!(band, RecencyBand::AtRisk);
    }

    #[test]
    fn test_band_map_keys_use_wire_labels() {
        let mut counts = BTreeMap::new();
        counts.insert(RecencyBand::New, 3u64);
        counts.insert(RecencyBand::Dormant, 1u64);
        let json = serde_json::to_string(&counts).unwrap();
        assert_eq!(json, "{\"0-30\":3,\"181-365\":1}");
    }
}
