use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::model::{Plant, PlantField, PlantFields};
use super::repo::{PlantStore, UpdateOutcome};
use crate::error::StoreError;

/// Process-local store. Records keep insertion order; writers are serialized
/// by the lock, so concurrent updates resolve as last-write-wins.
#[derive(Default)]
pub struct MemoryPlantStore {
    plants: RwLock<Vec<Plant>>,
}

impl MemoryPlantStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PlantStore for MemoryPlantStore {
    async fn insert(&self, fields: PlantFields) -> Result<Plant, StoreError> {
        let plant = Plant::new(Uuid::new_v4(), fields, OffsetDateTime::now_utc());
        self.plants.write().await.push(plant.clone());
        Ok(plant)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Plant>, StoreError> {
        let plants = self.plants.read().await;
        Ok(plants.iter().find(|p| p.id == id).cloned())
    }

    async fn scan_all(&self) -> Result<Vec<Plant>, StoreError> {
        Ok(self.plants.read().await.clone())
    }

    async fn scan_by_field(
        &self,
        field: PlantField,
        value: &str,
    ) -> Result<Vec<Plant>, StoreError> {
        let plants = self.plants.read().await;
        Ok(plants
            .iter()
            .filter(|p| p.field(field) == Some(value))
            .cloned()
            .collect())
    }

    async fn replace_by_id(
        &self,
        id: Uuid,
        patch: PlantFields,
    ) -> Result<UpdateOutcome, StoreError> {
        let mut plants = self.plants.write().await;
        let Some(plant) = plants.iter_mut().find(|p| p.id == id) else {
            return Ok(UpdateOutcome {
                matched: 0,
                modified: 0,
            });
        };
        let modified = u64::from(patch.apply_to(plant));
        Ok(UpdateOutcome {
            matched: 1,
            modified,
        })
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<u64, StoreError> {
        let mut plants = self.plants.write().await;
        let before = plants.len();
        plants.retain(|p| p.id != id);
        Ok((before - plants.len()) as u64)
    }
}
