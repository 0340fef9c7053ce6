// Aggregated consumption: one row per period bucket.
// Field names are the HTTP response contract; do not rename casually.

use serde::{Deserialize, Serialize};

/// One aggregated bucket: 1-based index in first-seen order, ISO period start,
/// summed energy, scalar averages and watt extrema over the bucket's samples.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodReport {
    pub index: usize,
    pub period: String,
    pub total_watt_hours: f64,
    pub average_volt: f64,
    pub average_current: f64,
    pub average_watts: f64,
    pub max_watts: f64,
    pub min_watts: f64,
    pub total_count: u64,
}
