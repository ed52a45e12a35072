// src/db/mod.rs
use chrono::{DateTime, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::Row;

use crate::domain::care_point::{CarePointStatus, CarePointType};
use crate::domain::pet_report::{PetReportStatus, PetReportType, PetType};

pub mod care_points;
pub mod connection;
// Reference store; the property suite runs it side by side with SQLite.
#[cfg_attr(not(test), allow(dead_code))]
pub mod memory;
pub mod pet_reports;
pub mod repository;
pub mod seed;
pub mod shelters;
pub mod store;

pub use connection::{init_db, Database};

// Enums live in TEXT columns under their variant names.
macro_rules! text_column {
    ($($ty:ty),+ $(,)?) => {$(
        impl ToSql for $ty {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.as_str()))
            }
        }

        impl FromSql for $ty {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                value
                    .as_str()?
                    .parse()
                    .map_err(|e: String| FromSqlError::Other(e.into()))
            }
        }
    )+};
}

text_column!(
    CarePointType,
    CarePointStatus,
    PetReportType,
    PetType,
    PetReportStatus,
);

/// Timestamps are stored as integer microseconds since the Unix epoch (UTC),
/// so `order by` on the column is chronological.
pub(crate) fn to_micros(at: DateTime<Utc>) -> i64 {
    at.timestamp_micros()
}

pub(crate) fn timestamp_at(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let micros: i64 = row.get(idx)?;
    DateTime::from_timestamp_micros(micros)
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(idx, micros))
}
