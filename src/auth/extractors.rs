use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tracing::{debug, warn};

use super::claims::Identity;
use super::jwt::JwtKeys;
use crate::{error::ApiError, state::AppState};

/// Verified caller if a bearer token was sent. A token that fails
/// verification is still a rejection.
pub struct MaybeAuthUser(pub Option<Identity>);

fn bearer_token(parts: &Parts) -> Result<Option<&str>, ApiError> {
    let Some(header) = parts.headers.get(axum::http::header::AUTHORIZATION) else {
        return Ok(None);
    };
    let value = header
        .to_str()
        .map_err(|_| ApiError::Unauthorized("Invalid Authorization header".into()))?;
    value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .map(Some)
        .ok_or_else(|| ApiError::Unauthorized("Invalid Authorization header".into()))
}

fn verify(keys: &JwtKeys, token: &str) -> Result<Identity, ApiError> {
    match keys.verify(token) {
        Ok(claims) => Ok(claims.into()),
        Err(e) => {
            warn!(error = %e, "invalid or expired token");
            Err(ApiError::Unauthorized("Invalid or expired token".into()))
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts)? else {
            return Ok(MaybeAuthUser(None));
        };
        let Some(keys) = JwtKeys::from_state(state) else {
            debug!("bearer token ignored; session verification is not configured");
            return Ok(MaybeAuthUser(None));
        };
        verify(&keys, token).map(|identity| MaybeAuthUser(Some(identity)))
    }
}
