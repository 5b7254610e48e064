// 📋 Task - a unit of work tracked against an entity

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use super::dependency_list;

fn default_status() -> String {
    "pending".to_string()
}

fn status_or_pending<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_status))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<i64>,

    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default = "default_status", deserialize_with = "status_or_pending")]
    pub status: String,

    /// low, medium, high
    #[serde(default)]
    pub priority: Option<String>,

    #[serde(default)]
    pub category: Option<String>,

    #[serde(default)]
    pub assigned_to: Option<String>,

    #[serde(default)]
    pub due_date: Option<NaiveDate>,

    #[serde(default)]
    pub start_date: Option<NaiveDate>,

    #[serde(default)]
    pub completion_date: Option<NaiveDate>,

    #[serde(default)]
    pub estimated_hours: Option<f64>,

    #[serde(default)]
    pub actual_hours: Option<f64>,

    /// Titles or ids of tasks that must finish first
    #[serde(default, deserialize_with = "dependency_list")]
    pub dependencies: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Task {
    pub fn is_complete(&self) -> bool {
        matches!(self.status.as_str(), "completed" | "done")
    }

    /// Due before `today` and not yet complete
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.is_complete() && self.due_date.is_some_and(|due| due < today)
    }
}

/// Body of `POST /entities/{id}/tasks` and `PUT /tasks/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskPayload {
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub priority: Option<String>,
    pub category: Option<String>,
    pub assigned_to: Option<String>,
    /// Serialized as YYYY-MM-DD
    pub due_date: Option<NaiveDate>,
    pub estimated_hours: Option<f64>,
    pub actual_hours: Option<f64>,
    pub dependencies: Vec<String>,
}

impl TaskPayload {
    pub fn new(title: impl Into<String>) -> Self {
        TaskPayload {
            title: title.into(),
            description: None,
            status: default_status(),
            priority: None,
            category: None,
            assigned_to: None,
            due_date: None,
            estimated_hours: None,
            actual_hours: None,
            dependencies: Vec::new(),
        }
    }

    pub fn from_task(task: &Task) -> Self {
        TaskPayload {
            title: task.title.clone(),
            description: task.description.clone(),
            status: task.status.clone(),
            priority: task.priority.clone(),
            category: task.category.clone(),
            assigned_to: task.assigned_to.clone(),
            due_date: task.due_date,
            estimated_hours: task.estimated_hours,
            actual_hours: task.actual_hours,
            dependencies: task.dependencies.clone(),
        }
    }
}
