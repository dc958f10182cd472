//! In-process [`MachineStore`] used by tests and `--dry-run` imports.

use std::{collections::HashSet, sync::Arc};

use kioskmap_core::MachineRecord;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    store::{validate_record, MachineStore},
    DbError,
};

/// Vec-backed store that keeps records in insertion order.
///
/// Clones share the same underlying storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryMachineStore {
    records: Arc<RwLock<Vec<MachineRecord>>>,
}

impl MemoryMachineStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

impl MachineStore for MemoryMachineStore {
    async fn find_all(&self) -> Result<Vec<MachineRecord>, DbError> {
        Ok(self.records.read().await.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<MachineRecord>, DbError> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id == Some(id)).cloned())
    }

    async fn exists_by_id(&self, id: Uuid) -> Result<bool, DbError> {
        let records = self.records.read().await;
        Ok(records.iter().any(|r| r.id == Some(id)))
    }

    async fn save(&self, mut record: MachineRecord) -> Result<MachineRecord, DbError> {
        validate_record(&record)?;
        let mut records = self.records.write().await;

        match record.id {
            Some(id) => {
                let existing = records
                    .iter_mut()
                    .find(|r| r.id == Some(id))
                    .ok_or(DbError::NotFound)?;
                record.created_at = existing.created_at;
                *existing = record.clone();
                Ok(record)
            }
            None => {
                record.id = Some(Uuid::new_v4());
                records.push(record.clone());
                Ok(record)
            }
        }
    }

    async fn save_all(&self, records: Vec<MachineRecord>) -> Result<Vec<MachineRecord>, DbError> {
        // Stage the whole batch before touching shared state. The write lock
        // is held throughout so the id checks cannot race another batch.
        let mut stored = self.records.write().await;
        let mut taken: HashSet<Uuid> = stored.iter().filter_map(|r| r.id).collect();
        let mut staged = Vec::with_capacity(records.len());

        for mut record in records {
            validate_record(&record)?;
            let id = record.id.unwrap_or_else(Uuid::new_v4);
            if !taken.insert(id) {
                return Err(DbError::InvalidRecord(format!(
                    "duplicate id {id} for station '{}'",
                    record.station_name
                )));
            }
            record.id = Some(id);
            staged.push(record);
        }

        stored.extend(staged.iter().cloned());
        Ok(staged)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, DbError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.id != Some(id));
        Ok(records.len() < before)
    }

    async fn find_by_city(&self, city: &str) -> Result<Vec<MachineRecord>, DbError> {
        let records = self.records.read().await;
        Ok(records.iter().filter(|r| r.city == city).cloned().collect())
    }

    async fn find_by_city_and_district(
        &self,
        city: &str,
        district: &str,
    ) -> Result<Vec<MachineRecord>, DbError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| r.city == city && r.district == district)
            .cloned()
            .collect())
    }

    async fn health_check(&self) -> Result<(), DbError> {
        Ok(())
    }
}
