// Device wire format and the normalized sample model

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Timestamp layout the device reports in `updateTime` (device-local clock, no zone).
pub const DEVICE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Raw status payload as returned by the vendor cloud API. Mirrors the JSON 1:1;
/// `power` is in deciwatts and is descaled during normalization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDeviceReading {
    pub switch: String,
    pub voltage: f64,
    pub current: f64,
    pub power: f64,
    pub update_time: String,
    pub location: RawLocation,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLocation {
    pub country: String,
    pub town: String,
}

/// Raised when the device payload cannot be normalized into a Sample.
#[derive(Debug, Error)]
#[error("invalid updateTime {value:?}: {source}")]
pub struct ReadingError {
    pub value: String,
    #[source]
    pub source: chrono::ParseError,
}

/// One normalized reading, ready for aggregation. Immutable once appended to the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sample {
    pub timestamp: DateTime<Utc>,
    pub switch_status: bool,
    pub country: String,
    pub town: String,
    pub voltage: f64,
    pub current: f64,
    pub watts: f64,
    pub watt_hours: f64,
}

impl Sample {
    /// Normalizes a raw reading: parses the device timestamp, descales `power`
    /// from deciwatts, and derives `watt_hours` from the fixed sampling interval.
    pub fn from_reading(
        reading: &RawDeviceReading,
        sampling_interval_secs: u64,
    ) -> Result<Self, ReadingError> {
        let naive = NaiveDateTime::parse_from_str(&reading.update_time, DEVICE_TIME_FORMAT)
            .map_err(|e| ReadingError {
                value: reading.update_time.clone(),
                source: e,
            })?;
        let watts = reading.power / 10.0;
        Ok(Self {
            timestamp: naive.and_utc(),
            switch_status: reading.switch == "on",
            country: reading.location.country.clone(),
            town: reading.location.town.clone(),
            voltage: reading.voltage,
            current: reading.current,
            watts,
            watt_hours: watts * (sampling_interval_secs as f64 / 3600.0),
        })
    }
}
