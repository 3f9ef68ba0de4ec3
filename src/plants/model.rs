use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Plant record as stored and returned over the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    #[serde(rename = "_id", alias = "id")]
    pub id: Uuid,
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub care_level: Option<String>,
    pub watering_frequency: Option<String>,
    pub last_watered: Option<String>,
    pub next_watering: Option<String>,
    pub health_status: Option<String>,
    pub user_id: Option<String>,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub added_date: OffsetDateTime,
}

/// Client-writable part of a plant. Used both for inserts and for patches:
/// a `None` field is left untouched by an update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlantFields {
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_text")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_text")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_text")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_text")]
    pub care_level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_text")]
    pub watering_frequency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_text")]
    pub last_watered: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_text")]
    pub next_watering: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_text")]
    pub health_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_text")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_text")]
    pub user_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_text")]
    pub user_email: Option<String>,
}

/// Reads any JSON value as text: strings as-is, numbers and booleans in their
/// JSON spelling, arrays and objects as JSON text. `null` is absent.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

/// Text attribute of a plant that can be matched by equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlantField {
    Name,
    Category,
    CareLevel,
    WateringFrequency,
    HealthStatus,
    UserId,
    UserName,
    UserEmail,
}

impl PlantField {
    pub fn column(self) -> &'static str {
        match self {
            PlantField::Name => "name",
            PlantField::Category => "category",
            PlantField::CareLevel => "care_level",
            PlantField::WateringFrequency => "watering_frequency",
            PlantField::HealthStatus => "health_status",
            PlantField::UserId => "user_id",
            PlantField::UserName => "user_name",
            PlantField::UserEmail => "user_email",
        }
    }
}

impl Plant {
    /// Builds a fresh record out of insert fields.
    pub fn new(id: Uuid, fields: PlantFields, added_date: OffsetDateTime) -> Self {
        Self {
            id,
            name: fields.name,
            category: fields.category,
            description: fields.description,
            image: fields.image,
            care_level: fields.care_level,
            watering_frequency: fields.watering_frequency,
            last_watered: fields.last_watered,
            next_watering: fields.next_watering,
            health_status: fields.health_status,
            user_id: fields.user_id,
            user_name: fields.user_name,
            user_email: fields.user_email,
            added_date,
        }
    }

    pub fn field(&self, field: PlantField) -> Option<&str> {
        let value = match field {
            PlantField::Name => &self.name,
            PlantField::Category => &self.category,
            PlantField::CareLevel => &self.care_level,
            PlantField::WateringFrequency => &self.watering_frequency,
            PlantField::HealthStatus => &self.health_status,
            PlantField::UserId => &self.user_id,
            PlantField::UserName => &self.user_name,
            PlantField::UserEmail => &self.user_email,
        };
        value.as_deref()
    }

    /// Writable fields of this record, e.g. to send it back as a full update.
    pub fn fields(&self) -> PlantFields {
        PlantFields {
            name: self.name.clone(),
            category: self.category.clone(),
            description: self.description.clone(),
            image: self.image.clone(),
            care_level: self.care_level.clone(),
            watering_frequency: self.watering_frequency.clone(),
            last_watered: self.last_watered.clone(),
            next_watering: self.next_watering.clone(),
            health_status: self.health_status.clone(),
            user_id: self.user_id.clone(),
            user_name: self.user_name.clone(),
            user_email: self.user_email.clone(),
        }
    }
}

impl PlantFields {
    /// Sets every present field on `plant`. Returns whether anything changed.
    pub fn apply_to(&self, plant: &mut Plant) -> bool {
        let mut changed = false;
        let pairs: [(&Option<String>, &mut Option<String>); 12] = [
            (&self.name, &mut plant.name),
            (&self.category, &mut plant.category),
            (&self.description, &mut plant.description),
            (&self.image, &mut plant.image),
            (&self.care_level, &mut plant.care_level),
            (&self.watering_frequency, &mut plant.watering_frequency),
            (&self.last_watered, &mut plant.last_watered),
            (&self.next_watering, &mut plant.next_watering),
            (&self.health_status, &mut plant.health_status),
            (&self.user_id, &mut plant.user_id),
            (&self.user_name, &mut plant.user_name),
            (&self.user_email, &mut plant.user_email),
        ];
        for (patch, target) in pairs {
            if let Some(value) = patch {
                if target.as_ref() != Some(value) {
                    *target = Some(value.clone());
                    changed = true;
                }
            }
        }
        changed
    }
}
