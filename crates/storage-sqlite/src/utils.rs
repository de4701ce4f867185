//! Conversion helpers shared by the repositories.
//!
//! Timestamps and decimals are stored as TEXT. Every timestamp uses the
//! exact same RFC 3339 rendering so that lexicographic comparison in SQL
//! matches chronological order; range scans depend on this.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::errors::StorageError;

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn new_id(prefix: &str) -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("{prefix}{}", &hex[..12])
}

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, StorageError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| StorageError::Corrupt(format!("timestamp '{raw}': {e}")))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, StorageError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|e| StorageError::Corrupt(format!("date '{raw}': {e}")))
}

/// Timestamp string for midnight UTC of `date`, used as a range-scan bound
/// against stored `posted_at` values.
pub fn day_start_timestamp(date: NaiveDate) -> String {
    format_timestamp(&DateTime::from_naive_utc_and_offset(
        date.and_hms_opt(0, 0, 0).expect("midnight always exists"),
        Utc,
    ))
}

pub fn format_decimal(value: Decimal) -> String {
    value.to_string()
}

pub fn parse_decimal(raw: &str) -> Result<Decimal, StorageError> {
    raw.parse()
        .map_err(|e| StorageError::Corrupt(format!("decimal '{raw}': {e}")))
}
