// Entity Tracker - Core Library
// REST client, session gate and view-model synchronizer shared by the TUI,
// the one-shot CLI commands and the tests

pub mod api;
pub mod config;
pub mod entities;
pub mod error;
pub mod forms;
pub mod render;
pub mod session;
pub mod sync;

// Re-export commonly used types
pub use api::{
    ApiRequest, AuthToken, Credentials, EntityClient, Endpoint, HttpTransport, Payload,
    RawResponse, RequestBody, Transport,
};
pub use config::Config;
pub use entities::{
    Account, AccountPayload, Document, DocumentPayload, DocumentUpload, Entity, EntityDetail,
    EntityPayload, ResourceKind, StatusTone, Task, TaskPayload, UploadForm,
};
pub use error::{ClientError, ClientResult};
pub use forms::{Field, Form, FormKind, Submission};
pub use render::{DetailPane, DetailView, ListPane};
pub use session::{AuthGate, AuthState, SessionStore};
pub use sync::{Confirm, Notice, Synchronizer, ViewModel};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
