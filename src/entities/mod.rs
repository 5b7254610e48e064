// Entity Models
//
// Wire shapes of the records served by the entity tracking API.
// An Entity owns ordered collections of accounts, tasks and documents;
// the list endpoint returns bare entities, the detail endpoint the full graph.

pub mod entity;
pub mod account;
pub mod task;
pub mod document;

pub use entity::{Entity, EntityDetail, EntityPayload, StatusTone};
pub use account::{Account, AccountPayload};
pub use task::{Task, TaskPayload};
pub use document::{Document, DocumentPayload, DocumentUpload, UploadForm};

use serde::{Deserialize, Deserializer};

/// Resource families the client can mutate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Entity,
    Account,
    Task,
    Document,
}

impl ResourceKind {
    /// Lowercase noun used in notices ("Error deleting task")
    pub fn noun(&self) -> &'static str {
        match self {
            ResourceKind::Entity => "entity",
            ResourceKind::Account => "account",
            ResourceKind::Task => "task",
            ResourceKind::Document => "document",
        }
    }
}

// ============================================================================
// SERDE HELPERS
// ============================================================================

/// `null` on the wire becomes the type's default
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Dependencies arrive either as a JSON list or as the raw comma-separated column
pub(crate) fn dependency_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        List(Vec<String>),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(Raw::List(items)) => items,
        Some(Raw::Text(text)) => text
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "dependency_list")]
        deps: Vec<String>,
        #[serde(default, deserialize_with = "null_as_default")]
        amount: f64,
    }

    #[test]
    fn test_dependencies_accept_list_text_and_null() {
        let list: Sample = serde_json::from_str(r#"{"deps": ["a", "b"]}"#).unwrap();
        assert_eq!(list.deps, vec!["a", "b"]);

        let text: Sample = serde_json::from_str(r#"{"deps": "file 10-K, pay fee ,"}"#).unwrap();
        assert_eq!(text.deps, vec!["file 10-K", "pay fee"]);

        let null: Sample = serde_json::from_str(r#"{"deps": null}"#).unwrap();
        assert!(null.deps.is_empty());

        let missing: Sample = serde_json::from_str("{}").unwrap();
        assert!(missing.deps.is_empty());
    }

    #[test]
    fn test_null_number_becomes_zero() {
        let parsed: Sample = serde_json::from_str(r#"{"amount": null}"#).unwrap();
        assert_eq!(parsed.amount, 0.0);
    }

    #[test]
    fn test_kind_nouns() {
        assert_eq!(ResourceKind::Entity.noun(), "entity");
        assert_eq!(ResourceKind::Document.noun(), "document");
    }
}
