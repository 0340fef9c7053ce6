// Consumption aggregation: group samples by bucket key, fold per-bucket
// sums and extrema, finalize averages. Pure over an in-memory snapshot;
// bucketing lives in aggregation::bucket.

pub mod bucket;

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use thiserror::Error;

pub use bucket::{Granularity, InvalidGranularity, bucket_start, format_period};

use crate::models::{PeriodReport, Sample};

/// Aggregation was requested before any sample was ingested. Distinct from an
/// empty report list, which cannot occur for a non-empty store.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("no samples ingested yet")]
pub struct NoDataError;

/// Running totals for one bucket.
struct BucketAccumulator {
    period: DateTime<Utc>,
    total_watt_hours: f64,
    total_volt: f64,
    total_current: f64,
    total_watts: f64,
    max_watts: f64,
    min_watts: f64,
    count: u64,
}

impl BucketAccumulator {
    fn new(period: DateTime<Utc>) -> Self {
        Self {
            period,
            total_watt_hours: 0.0,
            total_volt: 0.0,
            total_current: 0.0,
            total_watts: 0.0,
            max_watts: f64::NEG_INFINITY,
            min_watts: f64::INFINITY,
            count: 0,
        }
    }

    fn add(&mut self, sample: &Sample) {
        self.total_watt_hours += sample.watt_hours;
        self.total_volt += sample.voltage;
        self.total_current += sample.current;
        self.total_watts += sample.watts;
        self.max_watts = self.max_watts.max(sample.watts);
        self.min_watts = self.min_watts.min(sample.watts);
        self.count += 1;
    }

    fn finish(&self, index: usize) -> PeriodReport {
        let n = self.count as f64;
        PeriodReport {
            index,
            period: format_period(self.period),
            total_watt_hours: self.total_watt_hours,
            average_volt: self.total_volt / n,
            average_current: self.total_current / n,
            average_watts: self.total_watts / n,
            max_watts: self.max_watts,
            min_watts: self.min_watts,
            total_count: self.count,
        }
    }
}

/// Aggregates the sample history at the requested granularity.
///
/// Buckets are created lazily when a sample first maps to them, and the
/// report keeps that first-seen order (it is not re-sorted by time);
/// `index` is the 1-based position in that order. Every sample lands in
/// exactly one bucket, so the report is never empty on success.
pub fn aggregate(
    samples: &[Sample],
    granularity: Granularity,
) -> Result<Vec<PeriodReport>, NoDataError> {
    if samples.is_empty() {
        return Err(NoDataError);
    }

    let mut buckets: Vec<BucketAccumulator> = Vec::new();
    let mut index_by_key: HashMap<String, usize> = HashMap::new();

    for sample in samples {
        let period = bucket_start(sample.timestamp, granularity);
        let key = format_period(period);
        let idx = *index_by_key.entry(key).or_insert_with(|| {
            buckets.push(BucketAccumulator::new(period));
            buckets.len() - 1
        });
        buckets[idx].add(sample);
    }

    Ok(buckets
        .iter()
        .enumerate()
        .map(|(i, acc)| acc.finish(i + 1))
        .collect())
}
