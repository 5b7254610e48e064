// 🌐 REST API client
//
// Endpoint     → method + path of every route the client consumes
// Transport    → sends one ApiRequest, returns status + body (reqwest in prod)
// EntityClient → typed calls, status mapping, JSON decoding

use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::future::Future;
use tracing::debug;

use crate::entities::{
    AccountPayload, DocumentPayload, DocumentUpload, Entity, EntityDetail, EntityPayload,
    ResourceKind, TaskPayload,
};
use crate::error::{ClientError, ClientResult};

// ============================================================================
// ENDPOINTS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    Entities,
    Entity(i64),
    EntityAccounts(i64),
    Account(i64),
    EntityTasks(i64),
    Task(i64),
    EntityDocuments(i64),
    Document(i64),
    DocumentDownload(i64),
    DocumentWithToken(i64, String),
    Login,
    Register,
    Health,
}

impl Endpoint {
    /// Path relative to the API base URL
    pub fn path(&self) -> String {
        match self {
            Endpoint::Entities => "/entities".to_string(),
            Endpoint::Entity(id) => format!("/entities/{}", id),
            Endpoint::EntityAccounts(id) => format!("/entities/{}/accounts", id),
            Endpoint::Account(id) => format!("/accounts/{}", id),
            Endpoint::EntityTasks(id) => format!("/entities/{}/tasks", id),
            Endpoint::Task(id) => format!("/tasks/{}", id),
            Endpoint::EntityDocuments(id) => format!("/entities/{}/documents", id),
            Endpoint::Document(id) => format!("/documents/{}", id),
            Endpoint::DocumentDownload(id) => format!("/documents/{}/download", id),
            Endpoint::DocumentWithToken(id, token) => {
                format!("/documents/{}/token/{}", id, urlencoding::encode(token))
            }
            Endpoint::Login => "/auth/login".to_string(),
            Endpoint::Register => "/auth/register".to_string(),
            Endpoint::Health => "/health".to_string(),
        }
    }

    /// The single-resource endpoint for a kind
    pub fn resource(kind: ResourceKind, id: i64) -> Self {
        match kind {
            ResourceKind::Entity => Endpoint::Entity(id),
            ResourceKind::Account => Endpoint::Account(id),
            ResourceKind::Task => Endpoint::Task(id),
            ResourceKind::Document => Endpoint::Document(id),
        }
    }
}

// ============================================================================
// PAYLOADS
// ============================================================================

/// Same-shape body for create and update of any resource kind
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Entity(EntityPayload),
    Account { entity_id: i64, account: AccountPayload },
    Task { entity_id: i64, task: TaskPayload },
    /// Metadata only; files go through the multipart upload
    Document { entity_id: i64, document: DocumentPayload },
}

impl Payload {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Payload::Entity(_) => ResourceKind::Entity,
            Payload::Account { .. } => ResourceKind::Account,
            Payload::Task { .. } => ResourceKind::Task,
            Payload::Document { .. } => ResourceKind::Document,
        }
    }

    /// `None` id creates, `Some` id updates
    pub fn route(&self, id: Option<i64>) -> (Method, Endpoint) {
        match (self, id) {
            (Payload::Entity(_), None) => (Method::POST, Endpoint::Entities),
            (Payload::Entity(_), Some(id)) => (Method::PUT, Endpoint::Entity(id)),
            (Payload::Account { entity_id, .. }, None) => {
                (Method::POST, Endpoint::EntityAccounts(*entity_id))
            }
            (Payload::Account { .. }, Some(id)) => (Method::PUT, Endpoint::Account(id)),
            (Payload::Task { entity_id, .. }, None) => {
                (Method::POST, Endpoint::EntityTasks(*entity_id))
            }
            (Payload::Task { .. }, Some(id)) => (Method::PUT, Endpoint::Task(id)),
            (Payload::Document { entity_id, .. }, None) => {
                (Method::POST, Endpoint::EntityDocuments(*entity_id))
            }
            (Payload::Document { .. }, Some(id)) => (Method::PUT, Endpoint::Document(id)),
        }
    }

    fn to_json(&self) -> ClientResult<serde_json::Value> {
        Ok(match self {
            Payload::Entity(entity) => serde_json::to_value(entity)?,
            Payload::Account { account, .. } => serde_json::to_value(account)?,
            Payload::Task { task, .. } => serde_json::to_value(task)?,
            Payload::Document { document, .. } => serde_json::to_value(document)?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Credentials {
            username: username.into(),
            password: password.into(),
            email: None,
        }
    }
}

/// Response of `/auth/login` and (optionally) `/auth/register`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthToken {
    #[serde(alias = "access_token")]
    pub token: String,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

// ============================================================================
// TRANSPORT
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    Multipart(DocumentUpload),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub endpoint: Endpoint,
    /// Attached as `Authorization: Bearer <token>`
    pub bearer: Option<String>,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: Method, endpoint: Endpoint) -> Self {
        ApiRequest {
            method,
            endpoint,
            bearer: None,
            body: RequestBody::Empty,
        }
    }

    pub fn bearer(mut self, token: &str) -> Self {
        self.bearer = Some(token.to_string());
        self
    }

    pub fn json(mut self, body: serde_json::Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    pub fn multipart(mut self, upload: DocumentUpload) -> Self {
        self.body = RequestBody::Multipart(upload);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one request; status interpretation is left to `EntityClient`
pub trait Transport {
    fn send(&self, request: ApiRequest) -> impl Future<Output = ClientResult<RawResponse>>;

    /// Absolute address of an endpoint, for links handed to a browser
    fn url(&self, endpoint: &Endpoint) -> String {
        endpoint.path()
    }
}

/// reqwest-backed transport against a base URL such as `http://host/api`
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        HttpTransport {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Transport for HttpTransport {
    fn url(&self, endpoint: &Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    async fn send(&self, request: ApiRequest) -> ClientResult<RawResponse> {
        let url = self.url(&request.endpoint);
        debug!(method = %request.method, %url, "sending request");

        let mut builder = self.client.request(request.method, &url);
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => builder.json(&body),
            RequestBody::Multipart(upload) => {
                let file = Part::bytes(upload.bytes).file_name(upload.file_name);
                let form = Form::new()
                    .part("file", file)
                    .text("title", upload.title)
                    .text("document_type", upload.document_type);
                builder.multipart(form)
            }
        };

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();
        debug!(status, bytes = body.len(), "response received");

        Ok(RawResponse { status, body })
    }
}

// ============================================================================
// TYPED CLIENT
// ============================================================================

/// Typed calls over a transport
#[derive(Debug, Clone)]
pub struct EntityClient<T> {
    transport: T,
}

impl<T: Transport> EntityClient<T> {
    pub fn new(transport: T) -> Self {
        EntityClient { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    async fn call(&self, request: ApiRequest) -> ClientResult<Vec<u8>> {
        let response = self.transport.send(request).await?;
        check_status(response)
    }

    async fn call_json<R: DeserializeOwned>(&self, request: ApiRequest) -> ClientResult<R> {
        let body = self.call(request).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    pub async fn list_entities(&self, token: &str) -> ClientResult<Vec<Entity>> {
        self.call_json(ApiRequest::new(Method::GET, Endpoint::Entities).bearer(token))
            .await
    }

    pub async fn get_entity(&self, token: &str, id: i64) -> ClientResult<EntityDetail> {
        self.call_json(ApiRequest::new(Method::GET, Endpoint::Entity(id)).bearer(token))
            .await
    }

    /// Create (`id == None`) or update the record described by `payload`
    pub async fn submit(&self, token: &str, id: Option<i64>, payload: &Payload) -> ClientResult<()> {
        let (method, endpoint) = payload.route(id);
        let request = ApiRequest::new(method, endpoint)
            .bearer(token)
            .json(payload.to_json()?);
        self.call(request).await.map(|_| ())
    }

    pub async fn delete(&self, token: &str, kind: ResourceKind, id: i64) -> ClientResult<()> {
        let request = ApiRequest::new(Method::DELETE, Endpoint::resource(kind, id)).bearer(token);
        self.call(request).await.map(|_| ())
    }

    pub async fn upload_document(
        &self,
        token: &str,
        entity_id: i64,
        upload: DocumentUpload,
    ) -> ClientResult<()> {
        let request = ApiRequest::new(Method::POST, Endpoint::EntityDocuments(entity_id))
            .bearer(token)
            .multipart(upload);
        self.call(request).await.map(|_| ())
    }

    pub async fn download_document(&self, token: &str, id: i64) -> ClientResult<Vec<u8>> {
        self.call(ApiRequest::new(Method::GET, Endpoint::DocumentDownload(id)).bearer(token))
            .await
    }

    pub async fn login(&self, credentials: &Credentials) -> ClientResult<AuthToken> {
        let request = ApiRequest::new(Method::POST, Endpoint::Login)
            .json(serde_json::to_value(credentials)?);
        self.call_json(request).await
    }

    /// Some servers answer registration with a token, others with a message only
    pub async fn register(&self, credentials: &Credentials) -> ClientResult<Option<AuthToken>> {
        let request = ApiRequest::new(Method::POST, Endpoint::Register)
            .json(serde_json::to_value(credentials)?);
        let body = self.call(request).await?;
        Ok(serde_json::from_slice::<AuthToken>(&body).ok())
    }

    pub async fn health(&self) -> ClientResult<serde_json::Value> {
        self.call_json(ApiRequest::new(Method::GET, Endpoint::Health)).await
    }
}

/// Map a raw response onto the error taxonomy
pub fn check_status(response: RawResponse) -> ClientResult<Vec<u8>> {
    if response.is_success() {
        return Ok(response.body);
    }
    if response.status == 401 {
        return Err(ClientError::Unauthorized);
    }

    let message = serde_json::from_slice::<ErrorBody>(&response.body)
        .ok()
        .and_then(|b| b.error.or(b.message))
        .unwrap_or_default();

    Err(ClientError::Status {
        status: response.status,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_paths() {
        assert_eq!(Endpoint::Entities.path(), "/entities");
        assert_eq!(Endpoint::Entity(4).path(), "/entities/4");
        assert_eq!(Endpoint::EntityDocuments(4).path(), "/entities/4/documents");
        assert_eq!(Endpoint::DocumentDownload(9).path(), "/documents/9/download");
        assert_eq!(
            Endpoint::DocumentWithToken(9, "abc".to_string()).path(),
            "/documents/9/token/abc"
        );
        assert_eq!(
            Endpoint::DocumentWithToken(9, "a/b?c#d".to_string()).path(),
            "/documents/9/token/a%2Fb%3Fc%23d"
        );
        assert_eq!(Endpoint::Login.path(), "/auth/login");
    }

    #[test]
    fn test_create_vs_update_routes() {
        let entity = Payload::Entity(EntityPayload::new("Acme"));
        assert_eq!(entity.route(None), (Method::POST, Endpoint::Entities));
        assert_eq!(entity.route(Some(12)), (Method::PUT, Endpoint::Entity(12)));

        let account = Payload::Account {
            entity_id: 3,
            account: AccountPayload::new("Savings"),
        };
        assert_eq!(account.route(None), (Method::POST, Endpoint::EntityAccounts(3)));
        assert_eq!(account.route(Some(8)), (Method::PUT, Endpoint::Account(8)));

        let task = Payload::Task {
            entity_id: 3,
            task: TaskPayload::new("File"),
        };
        assert_eq!(task.route(None), (Method::POST, Endpoint::EntityTasks(3)));
        assert_eq!(task.route(Some(2)), (Method::PUT, Endpoint::Task(2)));
        assert_eq!(task.kind(), ResourceKind::Task);

        let document = Payload::Document {
            entity_id: 3,
            document: DocumentPayload::new("Bylaws"),
        };
        assert_eq!(document.route(Some(30)), (Method::PUT, Endpoint::Document(30)));
        assert_eq!(document.route(None), (Method::POST, Endpoint::EntityDocuments(3)));
        assert_eq!(document.kind(), ResourceKind::Document);
        assert_eq!(document.to_json().unwrap()["title"], "Bylaws");
    }

    #[test]
    fn test_check_status_mapping() {
        let ok = RawResponse { status: 204, body: Vec::new() };
        assert!(check_status(ok).is_ok());

        let unauthorized = RawResponse { status: 401, body: b"{}".to_vec() };
        assert!(matches!(check_status(unauthorized), Err(ClientError::Unauthorized)));

        let bad = RawResponse {
            status: 400,
            body: br#"{"error": "No file provided"}"#.to_vec(),
        };
        match check_status(bad) {
            Err(ClientError::Status { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "No file provided");
            }
            other => panic!("unexpected: {:?}", other),
        }

        let html = RawResponse { status: 500, body: b"<html>oops</html>".to_vec() };
        match check_status(html) {
            Err(ClientError::Status { message, .. }) => assert!(message.is_empty()),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_transport_url_joins_base() {
        let transport = HttpTransport::new("http://localhost:8000/api/");
        assert_eq!(transport.base_url(), "http://localhost:8000/api");
        assert_eq!(transport.url(&Endpoint::Task(5)), "http://localhost:8000/api/tasks/5");
    }

    #[test]
    fn test_view_url_token_stays_one_path_segment() {
        let transport = HttpTransport::new("http://h/api");
        assert_eq!(
            transport.url(&Endpoint::DocumentWithToken(9, "a/b?c#d".to_string())),
            "http://h/api/documents/9/token/a%2Fb%3Fc%23d"
        );
    }

    #[test]
    fn test_auth_token_accepts_access_token_alias() {
        let token: AuthToken = serde_json::from_str(r#"{"access_token": "t0k"}"#).unwrap();
        assert_eq!(token.token, "t0k");
        assert_eq!(token.username, None);
    }
}
