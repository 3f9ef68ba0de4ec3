use tracing::{info, warn};
use uuid::Uuid;

use super::api::{ClientError, PlantApi};
use crate::plants::Plant;
use crate::view::{render, Facets, ViewAction, ViewPage, ViewState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loaded,
    /// The last fetch failed. Calling `load` again is the only retry.
    Failed(String),
}

/// Which records a collection fetches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    All,
    Owner(String),
}

/// A fetched plant collection plus the view selections applied to it.
pub struct CollectionView {
    scope: Scope,
    records: Vec<Plant>,
    status: LoadState,
    state: ViewState,
}

impl CollectionView {
    pub fn new(scope: Scope) -> Self {
        Self {
            scope,
            records: Vec::new(),
            status: LoadState::Idle,
            state: ViewState::default(),
        }
    }

    pub fn with_state(mut self, state: ViewState) -> Self {
        self.state = state;
        self
    }

    /// Fetches the whole collection once. On failure the previously loaded
    /// records stay in place.
    pub async fn load(&mut self, api: &dyn PlantApi) -> Result<(), ClientError> {
        let fetched = match &self.scope {
            Scope::All => api.list_plants().await,
            Scope::Owner(user_id) => api.list_owned(user_id).await,
        };
        match fetched {
            Ok(records) => {
                info!(count = records.len(), "collection loaded");
                self.records = records;
                self.status = LoadState::Loaded;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "collection load failed");
                self.status = LoadState::Failed(e.user_message().to_string());
                Err(e)
            }
        }
    }

    pub fn status(&self) -> &LoadState {
        &self.status
    }

    pub fn records(&self) -> &[Plant] {
        &self.records
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Applies a filter, sort or page change. No request is made.
    pub fn dispatch(&mut self, action: ViewAction) {
        let total_pages = render(&self.records, &self.state).total_pages;
        self.state = self.state.reduce(action, total_pages);
    }

    pub fn page(&self) -> ViewPage<'_> {
        render(&self.records, &self.state)
    }

    pub fn facets(&self) -> Facets {
        Facets::collect(&self.records)
    }

    /// Drops a record from the loaded collection without re-fetching.
    pub fn remove_local(&mut self, id: Uuid) -> bool {
        let before = self.records.len();
        self.records.retain(|p| p.id != id);
        before != self.records.len()
    }
}
