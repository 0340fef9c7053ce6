// Shared test helpers

use chrono::{DateTime, TimeZone, Utc};
use powermon::models::Sample;

pub fn utc(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, second)
        .unwrap()
}

/// Sample with the given timestamp and watts; watt_hours derived from the
/// deployment's 10-second sampling interval.
pub fn sample_at(timestamp: DateTime<Utc>, watts: f64) -> Sample {
    sample_with(timestamp, watts, 237.5, watts / 237.5)
}

pub fn sample_with(timestamp: DateTime<Utc>, watts: f64, voltage: f64, current: f64) -> Sample {
    Sample {
        timestamp,
        switch_status: true,
        country: "Kuwait".into(),
        town: "Salmiya".into(),
        voltage,
        current,
        watts,
        watt_hours: watts * (10.0 / 3600.0),
    }
}
