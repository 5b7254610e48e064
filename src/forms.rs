// 📝 Forms - editable field lists turned into submissions
//
// Pure data: the TUI draws them and feeds key presses in, the synchronizer
// receives the parsed submission. Blank fields mean "not set".

use chrono::NaiveDate;
use std::path::PathBuf;

use crate::api::Payload;
use crate::entities::{
    Account, AccountPayload, Document, DocumentPayload, Entity, EntityPayload, Task, TaskPayload,
    UploadForm,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Login,
    Register,
    /// `editing` only changes the title; the target id lives in the view model
    Entity { editing: bool },
    Account { entity_id: i64, account_id: Option<i64> },
    Task { entity_id: i64, task_id: Option<i64> },
    Upload { entity_id: i64 },
    Document { entity_id: i64, document_id: i64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub label: &'static str,
    pub value: String,
    /// Rendered masked (passwords)
    pub secret: bool,
}

impl Field {
    fn new(label: &'static str, value: Option<String>) -> Self {
        Field {
            label,
            value: value.unwrap_or_default(),
            secret: false,
        }
    }

    fn secret(label: &'static str) -> Self {
        Field {
            label,
            value: String::new(),
            secret: true,
        }
    }
}

/// Parsed result of a submitted form
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Login { username: String, password: String },
    Register { username: String, password: String, email: Option<String> },
    Entity(EntityPayload),
    Record { id: Option<i64>, payload: Payload },
    Upload { entity_id: i64, form: UploadForm },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Form {
    pub kind: FormKind,
    pub fields: Vec<Field>,
    pub focus: usize,
}

impl Form {
    fn with_fields(kind: FormKind, fields: Vec<Field>) -> Self {
        Form {
            kind,
            fields,
            focus: 0,
        }
    }

    pub fn login() -> Self {
        Self::with_fields(
            FormKind::Login,
            vec![Field::new("Username", None), Field::secret("Password")],
        )
    }

    pub fn register() -> Self {
        Self::with_fields(
            FormKind::Register,
            vec![
                Field::new("Username", None),
                Field::secret("Password"),
                Field::new("Email", None),
            ],
        )
    }

    /// Blank form for a new entity, or pre-filled for an edit
    pub fn entity(existing: Option<&Entity>) -> Self {
        let payload = existing
            .map(EntityPayload::from_entity)
            .unwrap_or_else(|| EntityPayload::new(""));

        Self::with_fields(
            FormKind::Entity {
                editing: existing.is_some(),
            },
            vec![
                Field::new("Name", Some(payload.name)),
                Field::new("Description", payload.description),
                Field::new("EIN", payload.ein),
                Field::new("State of incorporation", payload.state_of_incorporation),
                Field::new("Date of incorporation", payload.date_of_incorporation),
                Field::new("Registered address", payload.registered_address),
                Field::new("Registered phone", payload.registered_phone),
                Field::new("Status", Some(payload.status)),
            ],
        )
    }

    pub fn account(entity_id: i64, existing: Option<&Account>) -> Self {
        let payload = existing
            .map(AccountPayload::from_account)
            .unwrap_or_default();
        let balance = existing.map(|_| payload.balance.to_string());
        let mut password = Field::secret("Password");
        password.value = payload.password.unwrap_or_default();

        Self::with_fields(
            FormKind::Account {
                entity_id,
                account_id: existing.map(|a| a.id),
            },
            vec![
                Field::new("Account name", Some(payload.account_name)),
                Field::new("Account number", payload.account_number),
                Field::new("Balance", balance),
                Field::new("Account type", payload.account_type),
                Field::new("Username", payload.username),
                password,
                Field::new("URL", payload.account_url),
                Field::new("Notes", payload.notes),
            ],
        )
    }

    pub fn task(entity_id: i64, existing: Option<&Task>) -> Self {
        let payload = existing
            .map(TaskPayload::from_task)
            .unwrap_or_else(|| TaskPayload::new(""));
        let dependencies = (!payload.dependencies.is_empty()).then(|| payload.dependencies.join(", "));

        Self::with_fields(
            FormKind::Task {
                entity_id,
                task_id: existing.map(|t| t.id),
            },
            vec![
                Field::new("Title", Some(payload.title)),
                Field::new("Description", payload.description),
                Field::new("Status", Some(payload.status)),
                Field::new("Priority", payload.priority),
                Field::new("Category", payload.category),
                Field::new("Assigned to", payload.assigned_to),
                Field::new("Due date (YYYY-MM-DD)", payload.due_date.map(|d| d.to_string())),
                Field::new("Estimated hours", payload.estimated_hours.map(|h| h.to_string())),
                Field::new("Actual hours", payload.actual_hours.map(|h| h.to_string())),
                Field::new("Dependencies", dependencies),
            ],
        )
    }

    pub fn upload(entity_id: i64) -> Self {
        Self::with_fields(
            FormKind::Upload { entity_id },
            vec![
                Field::new("File path", None),
                Field::new("Title", None),
                Field::new("Document type", None),
            ],
        )
    }

    /// Title and type of an uploaded document; the file itself stays
    pub fn document(entity_id: i64, existing: &Document) -> Self {
        let payload = DocumentPayload::from_document(existing);
        Self::with_fields(
            FormKind::Document {
                entity_id,
                document_id: existing.id,
            },
            vec![
                Field::new("Title", Some(payload.title)),
                Field::new("Document type", payload.document_type),
            ],
        )
    }

    pub fn title(&self) -> &'static str {
        match self.kind {
            FormKind::Login => "Log in",
            FormKind::Register => "Register",
            FormKind::Entity { editing: false } => "New Entity",
            FormKind::Entity { editing: true } => "Edit Entity",
            FormKind::Account { account_id: None, .. } => "Add Account",
            FormKind::Account { .. } => "Edit Account",
            FormKind::Task { task_id: None, .. } => "Add Task",
            FormKind::Task { .. } => "Edit Task",
            FormKind::Upload { .. } => "Upload Document",
            FormKind::Document { .. } => "Edit Document",
        }
    }

    // ------------------------------------------------------------------------
    // Editing
    // ------------------------------------------------------------------------

    pub fn next_field(&mut self) {
        self.focus = (self.focus + 1) % self.fields.len();
    }

    pub fn previous_field(&mut self) {
        self.focus = if self.focus == 0 {
            self.fields.len() - 1
        } else {
            self.focus - 1
        };
    }

    pub fn push_char(&mut self, ch: char) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.value.push(ch);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.value.pop();
        }
    }

    /// Trimmed value of a field, `None` when blank
    pub fn value(&self, label: &str) -> Option<String> {
        self.fields
            .iter()
            .find(|f| f.label == label)
            .map(|f| f.value.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn required(&self, label: &str) -> Result<String, String> {
        self.value(label).ok_or_else(|| format!("{} is required", label))
    }

    fn number(&self, label: &str) -> Result<Option<f64>, String> {
        self.value(label)
            .map(|v| v.parse::<f64>().map_err(|_| format!("{} must be a number", label)))
            .transpose()
    }

    // ------------------------------------------------------------------------
    // Submission
    // ------------------------------------------------------------------------

    /// Parse the fields; the error is shown to the user as-is
    pub fn submission(&self) -> Result<Submission, String> {
        match self.kind {
            FormKind::Login => Ok(Submission::Login {
                username: self.required("Username")?,
                password: self.required("Password")?,
            }),
            FormKind::Register => Ok(Submission::Register {
                username: self.required("Username")?,
                password: self.required("Password")?,
                email: self.value("Email"),
            }),
            FormKind::Entity { .. } => Ok(Submission::Entity(EntityPayload {
                name: self.required("Name")?,
                description: self.value("Description"),
                ein: self.value("EIN"),
                state_of_incorporation: self.value("State of incorporation"),
                date_of_incorporation: self.value("Date of incorporation"),
                registered_address: self.value("Registered address"),
                registered_phone: self.value("Registered phone"),
                status: self.value("Status").unwrap_or_else(|| "active".to_string()),
            })),
            FormKind::Account {
                entity_id,
                account_id,
            } => {
                let account = AccountPayload {
                    account_name: self.required("Account name")?,
                    account_number: self.value("Account number"),
                    balance: self.number("Balance")?.unwrap_or(0.0),
                    account_type: self.value("Account type"),
                    username: self.value("Username"),
                    password: self.value("Password"),
                    account_url: self.value("URL"),
                    notes: self.value("Notes"),
                };
                Ok(Submission::Record {
                    id: account_id,
                    payload: Payload::Account { entity_id, account },
                })
            }
            FormKind::Task { entity_id, task_id } => {
                let due_date = self
                    .value("Due date (YYYY-MM-DD)")
                    .map(|v| {
                        NaiveDate::parse_from_str(&v, "%Y-%m-%d")
                            .map_err(|_| "Due date must be YYYY-MM-DD".to_string())
                    })
                    .transpose()?;

                let task = TaskPayload {
                    title: self.required("Title")?,
                    description: self.value("Description"),
                    status: self.value("Status").unwrap_or_else(|| "pending".to_string()),
                    priority: self.value("Priority"),
                    category: self.value("Category"),
                    assigned_to: self.value("Assigned to"),
                    due_date,
                    estimated_hours: self.number("Estimated hours")?,
                    actual_hours: self.number("Actual hours")?,
                    dependencies: self
                        .value("Dependencies")
                        .map(|v| {
                            v.split(',')
                                .map(str::trim)
                                .filter(|s| !s.is_empty())
                                .map(str::to_string)
                                .collect()
                        })
                        .unwrap_or_default(),
                };
                Ok(Submission::Record {
                    id: task_id,
                    payload: Payload::Task { entity_id, task },
                })
            }
            FormKind::Document {
                entity_id,
                document_id,
            } => Ok(Submission::Record {
                id: Some(document_id),
                payload: Payload::Document {
                    entity_id,
                    document: DocumentPayload {
                        title: self.required("Title")?,
                        document_type: self.value("Document type"),
                    },
                },
            }),
            // The file check belongs to the upload itself, so a blank path passes through
            FormKind::Upload { entity_id } => Ok(Submission::Upload {
                entity_id,
                form: UploadForm {
                    file: self.value("File path").map(PathBuf::from),
                    title: self.value("Title"),
                    document_type: self.value("Document type"),
                },
            }),
        }
    }
}
