use tracing::{error, info};
use uuid::Uuid;

use super::api::{ClientError, PlantApi};
use super::collection::CollectionView;
use crate::plants::PlantFields;

/// Signed-in user a new plant is attributed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    pub user_id: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
}

impl Owner {
    fn user_name(&self) -> Option<String> {
        self.display_name
            .clone()
            .filter(|n| !n.is_empty())
            .or_else(|| self.email.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// Short-lived message shown after a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub text: String,
}

impl Notice {
    fn new(level: NoticeLevel, title: &str, text: impl Into<String>) -> Self {
        Self {
            level,
            title: title.into(),
            text: text.into(),
        }
    }

    pub fn failure(action: &str, err: &ClientError) -> Self {
        let text = match err {
            ClientError::Status { message, .. } if !message.is_empty() => message.clone(),
            _ => format!("Failed to {action} plant. Please try again."),
        };
        Self::new(NoticeLevel::Error, "Error", text)
    }
}

/// New-plant form. Values survive a failed submit.
#[derive(Debug, Clone, Default)]
pub struct CreateForm {
    pub fields: PlantFields,
}

impl CreateForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamps owner fields and submits. The form is cleared only on success.
    pub async fn submit(&mut self, api: &dyn PlantApi, owner: &Owner) -> Result<Uuid, ClientError> {
        let mut payload = self.fields.clone();
        payload.user_id = Some(owner.user_id.clone());
        payload.user_name = owner.user_name();
        payload.user_email = owner.email.clone();

        match api.create_plant(&payload).await {
            Ok(res) => {
                info!(plant_id = %res.inserted_id, "plant created");
                self.fields = PlantFields::default();
                Ok(res.inserted_id)
            }
            Err(e) => {
                error!(error = %e, "create plant failed");
                Err(e)
            }
        }
    }

    pub fn created_notice() -> Notice {
        Notice::new(NoticeLevel::Success, "Success", "Plant added successfully!")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Updated,
    NoChanges,
}

impl EditOutcome {
    pub fn notice(self) -> Notice {
        match self {
            EditOutcome::Updated => Notice::new(
                NoticeLevel::Success,
                "Plant Updated!",
                "Your plant information has been successfully updated.",
            ),
            EditOutcome::NoChanges => Notice::new(
                NoticeLevel::Info,
                "No Changes",
                "No updates were made to the plant.",
            ),
        }
    }
}

/// Edit form over an existing record; submits the full record back.
#[derive(Debug, Clone)]
pub struct EditForm {
    id: Uuid,
    pub fields: PlantFields,
}

impl EditForm {
    pub async fn load(api: &dyn PlantApi, id: Uuid) -> Result<Self, ClientError> {
        let plant = api.get_plant(id).await?;
        Ok(Self {
            id,
            fields: plant.fields(),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub async fn submit(&self, api: &dyn PlantApi) -> Result<EditOutcome, ClientError> {
        let res = api.update_plant(self.id, &self.fields).await?;
        if res.modified_count > 0 {
            info!(plant_id = %self.id, "plant updated");
            Ok(EditOutcome::Updated)
        } else {
            info!(plant_id = %self.id, "plant update changed nothing");
            Ok(EditOutcome::NoChanges)
        }
    }
}

/// A delete waiting for the user's confirmation.
#[must_use = "a pending delete does nothing until confirmed"]
#[derive(Debug)]
pub struct PendingDelete {
    id: Uuid,
}

pub fn request_delete(id: Uuid) -> PendingDelete {
    PendingDelete { id }
}

impl PendingDelete {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Issues the delete and drops the record from `view` on success.
    pub async fn confirm(
        self,
        api: &dyn PlantApi,
        view: &mut CollectionView,
    ) -> Result<u64, ClientError> {
        let res = api.delete_plant(self.id).await?;
        view.remove_local(self.id);
        info!(plant_id = %self.id, deleted = res.deleted_count, "plant deleted");
        Ok(res.deleted_count)
    }

    pub fn cancel(self) {}

    pub fn deleted_notice() -> Notice {
        Notice::new(NoticeLevel::Success, "Deleted!", "Your plant has been deleted.")
    }
}
