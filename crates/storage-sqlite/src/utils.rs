//! Text-column encoding helpers.
//!
//! Timestamps are stored as fixed-width RFC 3339 UTC strings so that SQL
//! `ORDER BY` on the text column matches chronological order; the waitlist
//! promotion query depends on this.

use chrono::{DateTime, NaiveDate, Utc};

use crate::errors::StorageError;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";
const DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.format(TIMESTAMP_FORMAT).to_string()
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, StorageError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StorageError::DecodeFailed(format!("Invalid timestamp '{}': {}", raw, e)))
}

pub(crate) fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, StorageError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|e| StorageError::DecodeFailed(format!("Invalid date '{}': {}", raw, e)))
}
