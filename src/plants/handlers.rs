use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    routing::{get, post, put},
    Json, Router,
};
use serde_json::Value;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use super::dto::{DeleteResponse, InsertResponse, OwnerQuery, UpdateResponse, PROTECTED_KEYS};
use super::model::{Plant, PlantField, PlantFields};
use crate::{
    auth::{Identity, MaybeAuthUser},
    error::{ApiError, StoreError},
    state::AppState,
};

// --- public routers ---

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/plants", get(list_plants))
        .route("/my-plants", get(list_my_plants))
        .route("/plants/:id", get(get_plant))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/plants", post(create_plant))
        .route("/plants/:id", put(update_plant).delete(delete_plant))
}

// --- handlers ---

/// POST /plants
#[instrument(skip(state, caller, body))]
pub async fn create_plant(
    State(state): State<AppState>,
    MaybeAuthUser(caller): MaybeAuthUser,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<InsertResponse>, ApiError> {
    let mut fields = writable_fields(body)?;
    if let Some(identity) = &caller {
        stamp_owner(&mut fields, identity);
    }

    let plant = state
        .store
        .insert(fields)
        .await
        .map_err(|e| internal(e, "Failed to add plant"))?;

    info!(plant_id = %plant.id, user_id = ?plant.user_id, "plant added");
    Ok(Json(InsertResponse {
        acknowledged: true,
        inserted_id: plant.id,
    }))
}

/// GET /plants
#[instrument(skip(state))]
pub async fn list_plants(State(state): State<AppState>) -> Result<Json<Vec<Plant>>, ApiError> {
    let plants = state
        .store
        .scan_all()
        .await
        .map_err(|e| internal(e, "Failed to fetch plants"))?;
    Ok(Json(plants))
}

/// GET /my-plants?userId=X
#[instrument(skip(state, caller))]
pub async fn list_my_plants(
    State(state): State<AppState>,
    MaybeAuthUser(caller): MaybeAuthUser,
    Query(q): Query<OwnerQuery>,
) -> Result<Json<Vec<Plant>>, ApiError> {
    let requested = q.user_id.filter(|id| !id.is_empty());

    let user_id = if state.config.enforce_owner() {
        let identity = caller
            .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".into()))?;
        match requested {
            Some(id) if id != identity.user_id => {
                return Err(ApiError::Forbidden(
                    "Cannot list plants of another user".into(),
                ))
            }
            _ => identity.user_id,
        }
    } else {
        requested.ok_or_else(|| ApiError::BadRequest("User ID is required".into()))?
    };

    let plants = state
        .store
        .scan_by_field(PlantField::UserId, &user_id)
        .await
        .map_err(|e| internal(e, "Failed to fetch user plants"))?;
    Ok(Json(plants))
}

/// GET /plants/:id
#[instrument(skip(state))]
pub async fn get_plant(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Plant>, ApiError> {
    let id = parse_id(&id)?;
    state
        .store
        .get_by_id(id)
        .await
        .map_err(|e| internal(e, "Failed to fetch plant"))?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Plant not found".into()))
}

/// PUT /plants/:id
#[instrument(skip(state, body))]
pub async fn update_plant(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<UpdateResponse>, ApiError> {
    let id = parse_id(&id)?;
    let patch = writable_fields(body)?;

    let outcome = state
        .store
        .replace_by_id(id, patch)
        .await
        .map_err(|e| internal(e, "Failed to update plant"))?;

    info!(plant_id = %id, matched = outcome.matched, modified = outcome.modified, "plant updated");
    Ok(Json(outcome.into()))
}

/// DELETE /plants/:id
#[instrument(skip(state))]
pub async fn delete_plant(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let id = parse_id(&id)?;
    let deleted_count = state
        .store
        .delete_by_id(id)
        .await
        .map_err(|e| internal(e, "Failed to delete plant"))?;

    info!(plant_id = %id, deleted_count, "plant deleted");
    Ok(Json(DeleteResponse {
        acknowledged: true,
        deleted_count,
    }))
}

// --- helpers ---

fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::InvalidId)
}

/// Drops identifier and creation-stamp keys, then reads the remaining
/// writable fields.
fn writable_fields(body: Result<Json<Value>, JsonRejection>) -> Result<PlantFields, ApiError> {
    let Json(value) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let Value::Object(mut map) = value else {
        return Err(ApiError::BadRequest("Expected a JSON object".into()));
    };
    for key in PROTECTED_KEYS {
        if map.remove(key).is_some() {
            debug!(key, "stripped protected key from payload");
        }
    }
    serde_json::from_value(Value::Object(map))
        .map_err(|e| ApiError::BadRequest(format!("Invalid plant payload: {e}")))
}

fn stamp_owner(fields: &mut PlantFields, identity: &Identity) {
    fields.user_id = Some(identity.user_id.clone());
    if let Some(name) = identity.display_name() {
        fields.user_name = Some(name.to_string());
    }
    if let Some(email) = &identity.email {
        fields.user_email = Some(email.clone());
    }
}

fn internal(e: StoreError, message: &str) -> ApiError {
    error!(error = %e, "{}", message);
    ApiError::Internal(message.into())
}
