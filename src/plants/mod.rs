mod dto;
pub mod handlers;
mod memory;
pub mod model;
mod repo;

use crate::state::AppState;
use axum::Router;

pub use dto::{DeleteResponse, InsertResponse, UpdateResponse};
pub use memory::MemoryPlantStore;
pub use model::{Plant, PlantField, PlantFields};
pub use repo::{PgPlantStore, PlantStore, UpdateOutcome};

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::read_routes())
        .merge(handlers::write_routes())
}
