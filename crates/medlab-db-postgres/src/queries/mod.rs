//! SQL query modules for the PostgreSQL storage backend.
//!
//! Reads run against the pool; inserts take a connection so they can run
//! inside the caller's transaction.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use medlab_storage::StorageError;
use time::{Date, Month, OffsetDateTime};

pub mod patients;

/// Converts a `TIMESTAMPTZ` column value to a `time` timestamp.
pub(crate) fn chrono_to_time(dt: DateTime<Utc>) -> Result<OffsetDateTime, StorageError> {
    let nanos = i128::from(dt.timestamp()) * 1_000_000_000 + i128::from(dt.timestamp_subsec_nanos());
    OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .map_err(|e| StorageError::internal(format!("Timestamp {dt} out of range: {e}")))
}

/// Converts a `DATE` column value to a `time` date.
pub(crate) fn naive_to_date(date: NaiveDate) -> Result<Date, StorageError> {
    let month = u8::try_from(date.month())
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .ok_or_else(|| StorageError::internal(format!("Invalid month in date {date}")))?;
    let day = u8::try_from(date.day())
        .map_err(|_| StorageError::internal(format!("Invalid day in date {date}")))?;
    Date::from_calendar_date(date.year(), month, day)
        .map_err(|e| StorageError::internal(format!("Date {date} out of range: {e}")))
}

/// Converts a `time` date to a value bindable to a `DATE` column.
pub(crate) fn date_to_naive(date: Date) -> Result<NaiveDate, StorageError> {
    NaiveDate::from_ymd_opt(
        date.year(),
        u32::from(u8::from(date.month())),
        u32::from(date.day()),
    )
    .ok_or_else(|| StorageError::invalid_data(format!("Date {date} out of range")))
}
