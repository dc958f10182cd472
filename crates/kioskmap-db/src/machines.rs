//! Postgres-backed [`MachineStore`] over the `machines` table.

use chrono::{DateTime, Utc};
use kioskmap_core::MachineRecord;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::{store::MachineStore, DbError};

const SELECT_COLUMNS: &str = "SELECT public_id, line, station_name, device_type, location_type, \
     floor, detail_location, contractor, phone, latitude, longitude, city, district, \
     created_at, modified_at \
     FROM machines";

// ---------------------------------------------------------------------------
// Row type
// ---------------------------------------------------------------------------

/// A row from the `machines` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MachineRow {
    pub public_id: Uuid,
    pub line: String,
    pub station_name: String,
    pub device_type: String,
    pub location_type: String,
    pub floor: String,
    pub detail_location: String,
    pub contractor: String,
    pub phone: String,
    pub latitude: f64,
    pub longitude: f64,
    pub city: String,
    pub district: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl From<MachineRow> for MachineRecord {
    fn from(row: MachineRow) -> Self {
        Self {
            id: Some(row.public_id),
            line: row.line,
            station_name: row.station_name,
            device_type: row.device_type,
            location_type: row.location_type,
            floor: row.floor,
            detail_location: row.detail_location,
            contractor: row.contractor,
            phone: row.phone,
            latitude: row.latitude,
            longitude: row.longitude,
            city: row.city,
            district: row.district,
            created_at: row.created_at,
            modified_at: row.modified_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

async fn insert_machine<'e, E>(executor: E, id: Uuid, record: &MachineRecord) -> Result<(), DbError>
where
    E: PgExecutor<'e>,
{
    sqlx::query(
        "INSERT INTO machines \
             (public_id, line, station_name, device_type, location_type, floor, \
              detail_location, contractor, phone, latitude, longitude, city, district, \
              created_at, modified_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)",
    )
    .bind(id)
    .bind(&record.line)
    .bind(&record.station_name)
    .bind(&record.device_type)
    .bind(&record.location_type)
    .bind(&record.floor)
    .bind(&record.detail_location)
    .bind(&record.contractor)
    .bind(&record.phone)
    .bind(record.latitude)
    .bind(record.longitude)
    .bind(&record.city)
    .bind(&record.district)
    .bind(record.created_at)
    .bind(record.modified_at)
    .execute(executor)
    .await?;
    Ok(())
}

/// Overwrites every column except `public_id` and `created_at`.
async fn update_machine(pool: &PgPool, id: Uuid, record: &MachineRecord) -> Result<(), DbError> {
    let rows_affected = sqlx::query(
        "UPDATE machines \
         SET line = $2, station_name = $3, device_type = $4, location_type = $5, floor = $6, \
             detail_location = $7, contractor = $8, phone = $9, latitude = $10, \
             longitude = $11, city = $12, district = $13, modified_at = $14 \
         WHERE public_id = $1",
    )
    .bind(id)
    .bind(&record.line)
    .bind(&record.station_name)
    .bind(&record.device_type)
    .bind(&record.location_type)
    .bind(&record.floor)
    .bind(&record.detail_location)
    .bind(&record.contractor)
    .bind(&record.phone)
    .bind(record.latitude)
    .bind(record.longitude)
    .bind(&record.city)
    .bind(&record.district)
    .bind(record.modified_at)
    .execute(pool)
    .await?
    .rows_affected();

    if rows_affected == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// [`MachineStore`] backed by a Postgres pool.
///
/// Coordinate invariants are enforced by the `machines_coordinates_in_range`
/// CHECK constraint; a violation inside [`MachineStore::save_all`] rolls the
/// whole batch back.
#[derive(Debug, Clone)]
pub struct PgMachineStore {
    pool: PgPool,
}

impl PgMachineStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl MachineStore for PgMachineStore {
    async fn find_all(&self) -> Result<Vec<MachineRecord>, DbError> {
        let rows = sqlx::query_as::<_, MachineRow>(&format!("{SELECT_COLUMNS} ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(MachineRecord::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<MachineRecord>, DbError> {
        let row = sqlx::query_as::<_, MachineRow>(&format!("{SELECT_COLUMNS} WHERE public_id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(MachineRecord::from))
    }

    async fn exists_by_id(&self, id: Uuid) -> Result<bool, DbError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM machines WHERE public_id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn save(&self, mut record: MachineRecord) -> Result<MachineRecord, DbError> {
        match record.id {
            Some(id) => {
                update_machine(&self.pool, id, &record).await?;
                // created_at is immutable; hand back what is actually stored.
                self.find_by_id(id).await?.ok_or(DbError::NotFound)
            }
            None => {
                let id = Uuid::new_v4();
                insert_machine(&self.pool, id, &record).await?;
                record.id = Some(id);
                Ok(record)
            }
        }
    }

    async fn save_all(&self, records: Vec<MachineRecord>) -> Result<Vec<MachineRecord>, DbError> {
        if records.is_empty() {
            return Ok(records);
        }

        let mut tx = self.pool.begin().await?;
        let mut saved = Vec::with_capacity(records.len());

        for mut record in records {
            let id = record.id.unwrap_or_else(Uuid::new_v4);
            // Dropping `tx` on the error path rolls back everything inserted so far.
            insert_machine(&mut *tx, id, &record).await?;
            record.id = Some(id);
            saved.push(record);
        }

        tx.commit().await?;
        tracing::debug!(count = saved.len(), "committed machine batch");
        Ok(saved)
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, DbError> {
        let rows_affected = sqlx::query("DELETE FROM machines WHERE public_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(rows_affected > 0)
    }

    async fn find_by_city(&self, city: &str) -> Result<Vec<MachineRecord>, DbError> {
        let rows = sqlx::query_as::<_, MachineRow>(&format!(
            "{SELECT_COLUMNS} WHERE city = $1 ORDER BY id"
        ))
        .bind(city)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(MachineRecord::from).collect())
    }

    async fn find_by_city_and_district(
        &self,
        city: &str,
        district: &str,
    ) -> Result<Vec<MachineRecord>, DbError> {
        let rows = sqlx::query_as::<_, MachineRow>(&format!(
            "{SELECT_COLUMNS} WHERE city = $1 AND district = $2 ORDER BY id"
        ))
        .bind(city)
        .bind(district)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(MachineRecord::from).collect())
    }

    async fn health_check(&self) -> Result<(), DbError> {
        crate::ping(&self.pool).await?;
        Ok(())
    }
}
