// 🏢 Entity - a managed business/legal record

use serde::{Deserialize, Deserializer, Serialize};

use super::{Account, Document, Task};

fn default_status() -> String {
    "active".to_string()
}

fn status_or_active<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_status))
}

/// Entity as returned by the collection endpoint (no nested collections)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: i64,
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Employer identification number
    #[serde(default)]
    pub ein: Option<String>,

    #[serde(default)]
    pub state_of_incorporation: Option<String>,

    /// ISO date as sent by the server, displayed verbatim
    #[serde(default)]
    pub date_of_incorporation: Option<String>,

    #[serde(default)]
    pub registered_address: Option<String>,

    #[serde(default)]
    pub registered_phone: Option<String>,

    #[serde(default = "default_status", deserialize_with = "status_or_active")]
    pub status: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Entity {
    pub fn status_tone(&self) -> StatusTone {
        StatusTone::of(&self.status)
    }
}

/// Full object graph required by the detail view.
///
/// The nested collections have no serde default: a detail response missing
/// any of them fails to decode instead of rendering a partial entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDetail {
    #[serde(flatten)]
    pub entity: Entity,
    pub accounts: Vec<Account>,
    pub tasks: Vec<Task>,
    pub documents: Vec<Document>,
}

/// Colour family of the status badge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Active,
    Inactive,
    Other,
}

impl StatusTone {
    pub fn of(status: &str) -> Self {
        match status {
            "active" => StatusTone::Active,
            "inactive" => StatusTone::Inactive,
            _ => StatusTone::Other,
        }
    }
}

/// Body of `POST /entities` and `PUT /entities/{id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityPayload {
    pub name: String,
    pub description: Option<String>,
    pub ein: Option<String>,
    pub state_of_incorporation: Option<String>,
    pub date_of_incorporation: Option<String>,
    pub registered_address: Option<String>,
    pub registered_phone: Option<String>,
    pub status: String,
}

impl EntityPayload {
    pub fn new(name: impl Into<String>) -> Self {
        EntityPayload {
            name: name.into(),
            status: default_status(),
            ..Default::default()
        }
    }

    /// Pre-fill an edit form from the loaded entity
    pub fn from_entity(entity: &Entity) -> Self {
        EntityPayload {
            name: entity.name.clone(),
            description: entity.description.clone(),
            ein: entity.ein.clone(),
            state_of_incorporation: entity.state_of_incorporation.clone(),
            date_of_incorporation: entity.date_of_incorporation.clone(),
            registered_address: entity.registered_address.clone(),
            registered_phone: entity.registered_phone.clone(),
            status: entity.status.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_item_decodes_without_collections() {
        let entity: Entity = serde_json::from_str(
            r#"{"id": 3, "name": "Acme Corporation", "description": null, "created_at": "2024-01-02T10:00:00"}"#,
        )
        .unwrap();

        assert_eq!(entity.id, 3);
        assert_eq!(entity.name, "Acme Corporation");
        assert_eq!(entity.description, None);
        assert_eq!(entity.status, "active");
        assert_eq!(entity.status_tone(), StatusTone::Active);
    }

    #[test]
    fn test_null_status_defaults_to_active() {
        let entity: Entity =
            serde_json::from_str(r#"{"id": 1, "name": "X", "status": null}"#).unwrap();
        assert_eq!(entity.status, "active");
    }

    #[test]
    fn test_detail_requires_nested_collections() {
        let partial = r#"{"id": 1, "name": "Acme", "accounts": [], "tasks": []}"#;
        assert!(serde_json::from_str::<EntityDetail>(partial).is_err());

        let full = r#"{"id": 1, "name": "Acme", "status": "dissolved",
                       "accounts": [], "tasks": [], "documents": []}"#;
        let detail: EntityDetail = serde_json::from_str(full).unwrap();
        assert_eq!(detail.entity.name, "Acme");
        assert_eq!(detail.entity.status_tone(), StatusTone::Other);
        assert!(detail.documents.is_empty());
    }

    #[test]
    fn test_payload_round_trips_entity_fields() {
        let entity = Entity {
            id: 9,
            name: "Holdings LLC".to_string(),
            description: Some("Parent".to_string()),
            ein: Some("12-3456789".to_string()),
            state_of_incorporation: Some("DE".to_string()),
            date_of_incorporation: Some("2020-05-01".to_string()),
            registered_address: None,
            registered_phone: None,
            status: "inactive".to_string(),
            created_at: None,
        };

        let payload = EntityPayload::from_entity(&entity);
        assert_eq!(payload.name, "Holdings LLC");
        assert_eq!(payload.status, "inactive");

        let body = serde_json::to_value(&payload).unwrap();
        assert_eq!(body["state_of_incorporation"], "DE");
        assert!(body.get("id").is_none());
    }

    #[test]
    fn test_new_payload_is_active() {
        assert_eq!(EntityPayload::new("Acme").status, "active");
    }
}
