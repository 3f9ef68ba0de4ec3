use async_trait::async_trait;
use serde::Serialize;
use sqlx::PgPool;
use time::OffsetDateTime;
use tracing::debug;
use uuid::Uuid;

use super::model::{Plant, PlantField, PlantFields};
use crate::error::StoreError;

/// Result of an update: `matched` says whether the id exists, `modified`
/// whether the patch actually changed the stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UpdateOutcome {
    pub matched: u64,
    pub modified: u64,
}

#[async_trait]
pub trait PlantStore: Send + Sync {
    async fn insert(&self, fields: PlantFields) -> Result<Plant, StoreError>;
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Plant>, StoreError>;
    async fn scan_all(&self) -> Result<Vec<Plant>, StoreError>;
    async fn scan_by_field(&self, field: PlantField, value: &str)
        -> Result<Vec<Plant>, StoreError>;
    async fn replace_by_id(&self, id: Uuid, patch: PlantFields)
        -> Result<UpdateOutcome, StoreError>;
    async fn delete_by_id(&self, id: Uuid) -> Result<u64, StoreError>;
}

const COLUMNS: &str = "id, name, category, description, image, care_level, watering_frequency, \
     last_watered, next_watering, health_status, user_id, user_name, user_email, added_date";

/// Current time at the microsecond precision `TIMESTAMPTZ` keeps, so the
/// inserted record equals what a later read returns.
fn now_micros() -> OffsetDateTime {
    let now = OffsetDateTime::now_utc();
    now.replace_nanosecond(now.microsecond() * 1_000).unwrap_or(now)
}

#[derive(Clone)]
pub struct PgPlantStore {
    db: PgPool,
}

impl PgPlantStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PlantStore for PgPlantStore {
    async fn insert(&self, fields: PlantFields) -> Result<Plant, StoreError> {
        let plant = Plant::new(Uuid::new_v4(), fields, now_micros());
        sqlx::query(
            r#"
            INSERT INTO plants (id, name, category, description, image, care_level,
                                watering_frequency, last_watered, next_watering, health_status,
                                user_id, user_name, user_email, added_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(plant.id)
        .bind(&plant.name)
        .bind(&plant.category)
        .bind(&plant.description)
        .bind(&plant.image)
        .bind(&plant.care_level)
        .bind(&plant.watering_frequency)
        .bind(&plant.last_watered)
        .bind(&plant.next_watering)
        .bind(&plant.health_status)
        .bind(&plant.user_id)
        .bind(&plant.user_name)
        .bind(&plant.user_email)
        .bind(plant.added_date)
        .execute(&self.db)
        .await?;
        debug!(plant_id = %plant.id, "plant inserted");
        Ok(plant)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Plant>, StoreError> {
        let plant = sqlx::query_as::<_, Plant>(&format!(
            "SELECT {COLUMNS} FROM plants WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(plant)
    }

    async fn scan_all(&self) -> Result<Vec<Plant>, StoreError> {
        let rows = sqlx::query_as::<_, Plant>(&format!(
            "SELECT {COLUMNS} FROM plants ORDER BY added_date ASC, id ASC"
        ))
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn scan_by_field(
        &self,
        field: PlantField,
        value: &str,
    ) -> Result<Vec<Plant>, StoreError> {
        // column names come from the enum, never from the caller
        let rows = sqlx::query_as::<_, Plant>(&format!(
            "SELECT {COLUMNS} FROM plants WHERE {} = $1 ORDER BY added_date ASC, id ASC",
            field.column()
        ))
        .bind(value)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn replace_by_id(
        &self,
        id: Uuid,
        patch: PlantFields,
    ) -> Result<UpdateOutcome, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE plants SET
                name               = COALESCE($2, name),
                category           = COALESCE($3, category),
                description        = COALESCE($4, description),
                image              = COALESCE($5, image),
                care_level         = COALESCE($6, care_level),
                watering_frequency = COALESCE($7, watering_frequency),
                last_watered       = COALESCE($8, last_watered),
                next_watering      = COALESCE($9, next_watering),
                health_status      = COALESCE($10, health_status),
                user_id            = COALESCE($11, user_id),
                user_name          = COALESCE($12, user_name),
                user_email         = COALESCE($13, user_email)
            WHERE id = $1
              AND (name, category, description, image, care_level, watering_frequency,
                   last_watered, next_watering, health_status, user_id, user_name, user_email)
                  IS DISTINCT FROM
                  (COALESCE($2, name), COALESCE($3, category), COALESCE($4, description),
                   COALESCE($5, image), COALESCE($6, care_level),
                   COALESCE($7, watering_frequency), COALESCE($8, last_watered),
                   COALESCE($9, next_watering), COALESCE($10, health_status),
                   COALESCE($11, user_id), COALESCE($12, user_name), COALESCE($13, user_email))
            "#,
        )
        .bind(id)
        .bind(&patch.name)
        .bind(&patch.category)
        .bind(&patch.description)
        .bind(&patch.image)
        .bind(&patch.care_level)
        .bind(&patch.watering_frequency)
        .bind(&patch.last_watered)
        .bind(&patch.next_watering)
        .bind(&patch.health_status)
        .bind(&patch.user_id)
        .bind(&patch.user_name)
        .bind(&patch.user_email)
        .execute(&self.db)
        .await?;

        let modified = result.rows_affected();
        if modified > 0 {
            return Ok(UpdateOutcome {
                matched: modified,
                modified,
            });
        }

        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM plants WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.db)
            .await?;
        Ok(UpdateOutcome {
            matched: u64::from(exists),
            modified: 0,
        })
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM plants WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected())
    }
}
