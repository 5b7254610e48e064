// 📄 Document - a file attached to an entity

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ClientError, ClientResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<i64>,

    pub title: String,

    #[serde(default)]
    pub document_type: Option<String>,

    #[serde(default)]
    pub original_filename: Option<String>,

    /// Size in bytes
    #[serde(default)]
    pub file_size: Option<u64>,

    #[serde(default)]
    pub uploaded_at: Option<String>,

    /// Server-side storage path; absent when no file was uploaded
    #[serde(default)]
    pub file_path: Option<String>,
}

impl Document {
    /// Only documents backed by a stored file can be viewed or downloaded
    pub fn has_file(&self) -> bool {
        self.file_path.as_deref().is_some_and(|p| !p.is_empty())
    }

    /// File name to save a download under.
    ///
    /// Only the last component of the server-provided name is kept, so a
    /// name like `../../.bashrc` or `/etc/passwd` cannot escape the target
    /// directory.
    pub fn download_name(&self) -> String {
        self.original_filename
            .as_deref()
            .and_then(|name| Path::new(name).file_name())
            .and_then(|name| name.to_str())
            .and_then(|name| name.rsplit('\\').next())
            .filter(|name| !name.is_empty() && *name != "." && *name != "..")
            .map(str::to_string)
            .unwrap_or_else(|| format!("document-{}", self.id))
    }
}

/// Body of `PUT /documents/{id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentPayload {
    pub title: String,
    pub document_type: Option<String>,
}

impl DocumentPayload {
    pub fn new(title: impl Into<String>) -> Self {
        DocumentPayload {
            title: title.into(),
            document_type: None,
        }
    }

    pub fn from_document(document: &Document) -> Self {
        DocumentPayload {
            title: document.title.clone(),
            document_type: document.document_type.clone(),
        }
    }
}

/// What the user filled into the upload form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadForm {
    pub file: Option<PathBuf>,
    pub title: Option<String>,
    pub document_type: Option<String>,
}

/// A validated, fully read multipart upload
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub title: String,
    pub document_type: String,
}

impl UploadForm {
    /// Validate the form and read the selected file.
    ///
    /// The file selection is the only required field; the title falls back
    /// to the file name.
    pub async fn into_upload(self) -> ClientResult<DocumentUpload> {
        let path = self.file.ok_or(ClientError::MissingField("file"))?;
        let file_name = file_name_of(&path);
        let bytes = tokio::fs::read(&path).await?;

        let title = self
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| file_name.clone());

        Ok(DocumentUpload {
            file_name,
            bytes,
            title,
            document_type: self.document_type.unwrap_or_default(),
        })
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string())
}
