// Period bucketing: granularity enum + truncation of a timestamp to its
// canonical bucket start. The device's local clock runs 8 hours behind the
// stored UTC instants; the shift is applied before calendar truncation and
// the truncated fields are re-encoded as a UTC instant.

use std::str::FromStr;

use chrono::{
    DateTime, Datelike, Duration, NaiveDate, NaiveTime, SecondsFormat, Timelike, Utc,
};
use thiserror::Error;

/// Hours subtracted from the stored UTC timestamp before truncation.
pub const LOCAL_TIME_OFFSET_HOURS: i64 = 8;

/// The seven aggregation periods callers may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    TenSecond,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl Granularity {
    pub const ALL: [Granularity; 7] = [
        Granularity::TenSecond,
        Granularity::Minute,
        Granularity::Hour,
        Granularity::Day,
        Granularity::Week,
        Granularity::Month,
        Granularity::Year,
    ];
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown granularity: {0:?}")]
pub struct InvalidGranularity(pub String);

impl FromStr for Granularity {
    type Err = InvalidGranularity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "10seconds" | "tenSecond" => Ok(Granularity::TenSecond),
            "minute" => Ok(Granularity::Minute),
            "hour" => Ok(Granularity::Hour),
            "day" => Ok(Granularity::Day),
            "week" => Ok(Granularity::Week),
            "month" => Ok(Granularity::Month),
            "year" => Ok(Granularity::Year),
            other => Err(InvalidGranularity(other.to_string())),
        }
    }
}

/// Canonical bucket start for `timestamp` at `granularity`. Total for any
/// finite timestamp; pure (no wall-clock dependency).
pub fn bucket_start(timestamp: DateTime<Utc>, granularity: Granularity) -> DateTime<Utc> {
    let shifted = timestamp - Duration::hours(LOCAL_TIME_OFFSET_HOURS);
    let date = shifted.date_naive();
    let (date, time) = match granularity {
        Granularity::TenSecond => (
            date,
            hms(
                shifted.hour(),
                shifted.minute(),
                shifted.second() - shifted.second() % 10,
            ),
        ),
        Granularity::Minute => (date, hms(shifted.hour(), shifted.minute(), 0)),
        Granularity::Hour => (date, hms(shifted.hour(), 0, 0)),
        Granularity::Day => (date, NaiveTime::MIN),
        Granularity::Week => {
            let days_past_sunday = date.weekday().num_days_from_sunday() as i64;
            (date - Duration::days(days_past_sunday), NaiveTime::MIN)
        }
        Granularity::Month => (
            NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date),
            NaiveTime::MIN,
        ),
        Granularity::Year => (
            NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date),
            NaiveTime::MIN,
        ),
    };
    date.and_time(time).and_utc()
}

/// Bucket key / wire encoding of a period start: ISO-8601 UTC with
/// millisecond precision. String equality means same bucket.
pub fn format_period(period: DateTime<Utc>) -> String {
    period.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn hms(hour: u32, minute: u32, second: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, second).unwrap_or(NaiveTime::MIN)
}
