//! The storage seam shared by the Postgres and in-memory backends.

use std::future::Future;

use kioskmap_core::MachineRecord;
use uuid::Uuid;

use crate::DbError;

/// Durable keyed storage for [`MachineRecord`]s.
///
/// Implementations assign `id` on first save and never change it afterwards.
/// [`MachineStore::save_all`] is all-or-nothing: on error, nothing from the
/// batch is visible to later reads.
pub trait MachineStore: Clone + Send + Sync + 'static {
    /// All records in insertion order.
    fn find_all(&self) -> impl Future<Output = Result<Vec<MachineRecord>, DbError>> + Send;

    fn find_by_id(
        &self,
        id: Uuid,
    ) -> impl Future<Output = Result<Option<MachineRecord>, DbError>> + Send;

    fn exists_by_id(&self, id: Uuid) -> impl Future<Output = Result<bool, DbError>> + Send;

    /// Inserts a record without an id, or replaces the stored record with the
    /// same id.
    ///
    /// Returns [`DbError::NotFound`] when `record.id` is set but unknown.
    /// `created_at` of an existing record is never overwritten.
    fn save(
        &self,
        record: MachineRecord,
    ) -> impl Future<Output = Result<MachineRecord, DbError>> + Send;

    /// Inserts a batch atomically and returns the saved records in input order.
    fn save_all(
        &self,
        records: Vec<MachineRecord>,
    ) -> impl Future<Output = Result<Vec<MachineRecord>, DbError>> + Send;

    /// Deletes by id; returns whether a record was removed.
    fn delete_by_id(&self, id: Uuid) -> impl Future<Output = Result<bool, DbError>> + Send;

    /// Records whose `city` equals `city` exactly (case-sensitive).
    fn find_by_city(
        &self,
        city: &str,
    ) -> impl Future<Output = Result<Vec<MachineRecord>, DbError>> + Send;

    fn find_by_city_and_district(
        &self,
        city: &str,
        district: &str,
    ) -> impl Future<Output = Result<Vec<MachineRecord>, DbError>> + Send;

    fn health_check(&self) -> impl Future<Output = Result<(), DbError>> + Send;
}

/// Checks the invariants the `machines` table enforces with constraints.
///
/// # Errors
///
/// Returns [`DbError::InvalidRecord`] when a coordinate is not finite or
/// outside the WGS84 range.
pub fn validate_record(record: &MachineRecord) -> Result<(), DbError> {
    if !record.latitude.is_finite() || !(-90.0..=90.0).contains(&record.latitude) {
        return Err(DbError::InvalidRecord(format!(
            "latitude {} out of range for station '{}'",
            record.latitude, record.station_name
        )));
    }
    if !record.longitude.is_finite() || !(-180.0..=180.0).contains(&record.longitude) {
        return Err(DbError::InvalidRecord(format!(
            "longitude {} out of range for station '{}'",
            record.longitude, record.station_name
        )));
    }
    Ok(())
}
