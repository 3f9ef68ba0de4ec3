use crate::config::{AppConfig, JwtConfig, StoreConfig};
use crate::plants::{MemoryPlantStore, PgPlantStore, PlantStore};
use anyhow::Context;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PlantStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let store = match &config.store {
            StoreConfig::Postgres {
                database_url,
                max_connections,
            } => {
                let db = sqlx::postgres::PgPoolOptions::new()
                    .max_connections(*max_connections)
                    .connect(database_url)
                    .await
                    .context("connect to database")?;

                // Run migrations if present
                if let Err(e) = sqlx::migrate!("./migrations").run(&db).await {
                    tracing::warn!(error = %e, "migration failed; continuing");
                }

                Arc::new(PgPlantStore::new(db)) as Arc<dyn PlantStore>
            }
            StoreConfig::Memory => {
                tracing::warn!("no DATABASE_URL configured; plants are kept in memory");
                Arc::new(MemoryPlantStore::new()) as Arc<dyn PlantStore>
            }
        };

        Ok(Self { store, config })
    }

    pub fn from_parts(store: Arc<dyn PlantStore>, config: Arc<AppConfig>) -> Self {
        Self { store, config }
    }

    /// In-memory store with a fixed JWT config, for tests.
    pub fn fake() -> Self {
        let config = Arc::new(AppConfig {
            store: StoreConfig::Memory,
            jwt: Some(JwtConfig {
                secret: "test".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                enforce_owner: false,
            }),
            cors_origins: Vec::new(),
        });
        Self {
            store: Arc::new(MemoryPlantStore::new()),
            config,
        }
    }
}
