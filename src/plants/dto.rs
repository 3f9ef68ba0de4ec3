use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo::UpdateOutcome;

/// Keys a client may send but never gets to write.
pub(crate) const PROTECTED_KEYS: [&str; 3] = ["_id", "id", "addedDate"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InsertResponse {
    pub acknowledged: bool,
    pub inserted_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResponse {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
}

impl From<UpdateOutcome> for UpdateResponse {
    fn from(o: UpdateOutcome) -> Self {
        Self {
            acknowledged: true,
            matched_count: o.matched,
            modified_count: o.modified,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DeleteResponse {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerQuery {
    pub user_id: Option<String>,
}
