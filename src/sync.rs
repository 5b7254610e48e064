// 🔄 Entity View-Model Synchronizer
//
// fetch → render-ready structure → replace pane
// mutate → re-fetch the affected pane (the server is the source of truth,
//          nothing is patched locally)
//
// Each pane carries a request ticket; a response whose ticket is no longer
// the latest for its pane is discarded instead of overwriting newer data.

use std::path::Path;
use tracing::{debug, info, warn};

use crate::api::{Credentials, EntityClient, Endpoint, Payload, Transport};
use crate::entities::{Entity, EntityDetail, EntityPayload, ResourceKind, UploadForm};
use crate::error::{ClientError, ClientResult};
use crate::render::{DetailPane, DetailView, ListPane, DETAIL_ERROR, LIST_ERROR};
use crate::session::AuthGate;

pub const SESSION_EXPIRED: &str = "Session expired, please log in again";

// ============================================================================
// REQUEST TICKETS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    List,
    Detail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pane: Pane,
    seq: u64,
}

/// Latest issued sequence number per pane
#[derive(Debug, Default)]
pub struct RequestTickets {
    list: u64,
    detail: u64,
}

impl RequestTickets {
    pub fn issue(&mut self, pane: Pane) -> Ticket {
        let counter = match pane {
            Pane::List => &mut self.list,
            Pane::Detail => &mut self.detail,
        };
        *counter += 1;
        Ticket { pane, seq: *counter }
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        let latest = match ticket.pane {
            Pane::List => self.list,
            Pane::Detail => self.detail,
        };
        ticket.seq == latest
    }
}

// ============================================================================
// VIEW MODEL
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Info(String),
    /// Blocking message the user must acknowledge
    Alert(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Info(text) | Notice::Alert(text) => text,
        }
    }
}

/// Session-scoped view state, owned by the synchronizer and handed to handlers
#[derive(Debug, Clone)]
pub struct ViewModel {
    pub list: ListPane,
    pub detail: DetailPane,
    /// Last collection applied to the list pane
    pub entities: Vec<Entity>,
    /// Last detail applied to the detail pane (source for edit forms)
    pub loaded_detail: Option<EntityDetail>,
    pub selected_entity_id: Option<i64>,
    /// Target of the entity form; `None` means the form creates
    pub current_entity_id: Option<i64>,
    pub notice: Option<Notice>,
    pub login_required: bool,
    pub reveal_passwords: bool,
    pub empty_message: String,
}

impl ViewModel {
    pub fn new(empty_message: impl Into<String>) -> Self {
        ViewModel {
            list: ListPane::Idle,
            detail: DetailPane::Welcome,
            entities: Vec::new(),
            loaded_detail: None,
            selected_entity_id: None,
            current_entity_id: None,
            notice: None,
            login_required: false,
            reveal_passwords: false,
            empty_message: empty_message.into(),
        }
    }
}

/// Asks the user before a destructive call
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

// ============================================================================
// SYNCHRONIZER
// ============================================================================

pub struct Synchronizer<T> {
    client: EntityClient<T>,
    gate: AuthGate,
    view: ViewModel,
    tickets: RequestTickets,
}

impl<T: Transport> Synchronizer<T> {
    pub fn new(client: EntityClient<T>, gate: AuthGate, empty_message: impl Into<String>) -> Self {
        let mut view = ViewModel::new(empty_message);
        view.login_required = !gate.is_logged_in();

        Synchronizer {
            client,
            gate,
            view,
            tickets: RequestTickets::default(),
        }
    }

    pub fn view(&self) -> &ViewModel {
        &self.view
    }

    pub fn gate(&self) -> &AuthGate {
        &self.gate
    }

    pub fn client(&self) -> &EntityClient<T> {
        &self.client
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.view.notice.take()
    }

    /// Token for the next call, or a login prompt instead of the call
    fn bearer(&mut self) -> Option<String> {
        match self.gate.token() {
            Some(token) => Some(token.to_string()),
            None => {
                debug!("no session token, routing to login");
                self.view.login_required = true;
                None
            }
        }
    }

    /// A 401 anywhere ends the session
    fn note_auth_failure(&mut self, err: &ClientError) {
        if !err.is_unauthorized() {
            return;
        }
        warn!("server rejected session token");
        if let Err(storage_err) = self.gate.logout() {
            warn!(error = %storage_err, "failed to clear stored session");
        }
        self.view.login_required = true;
        self.view.notice = Some(Notice::Alert(SESSION_EXPIRED.to_string()));
    }

    fn alert_failure(&mut self, action: &str, kind: ResourceKind, err: &ClientError) {
        warn!(error = %err, "{} {} failed", action, kind.noun());
        if err.is_unauthorized() {
            self.note_auth_failure(err);
            return;
        }

        let mut text = match err {
            ClientError::LoginRequired => return,
            _ => format!("Error {} {}", action, kind.noun()),
        };
        if let Some(detail) = err.server_message() {
            text.push_str(": ");
            text.push_str(detail);
        }
        self.view.notice = Some(Notice::Alert(text));
    }

    // ------------------------------------------------------------------------
    // Authentication
    // ------------------------------------------------------------------------

    pub async fn login(&mut self, username: &str, password: &str) -> bool {
        let credentials = Credentials::new(username, password);
        let auth = match self.client.login(&credentials).await {
            Ok(auth) => auth,
            Err(err) => {
                warn!(error = %err, %username, "login failed");
                let text = match &err {
                    ClientError::Unauthorized => "Invalid username or password".to_string(),
                    other => match other.server_message() {
                        Some(message) => format!("Login failed: {}", message),
                        None => "Login failed".to_string(),
                    },
                };
                self.view.notice = Some(Notice::Alert(text));
                return false;
            }
        };

        let name = auth.username.unwrap_or_else(|| username.to_string());
        if let Err(err) = self.gate.login_succeeded(auth.token, name) {
            self.view.notice = Some(Notice::Alert(format!("Could not save session: {}", err)));
            return false;
        }

        self.view.login_required = false;
        self.view.notice = None;
        self.load_collection().await;
        true
    }

    /// Registers, and logs straight in when the server hands back a token
    pub async fn register(&mut self, username: &str, password: &str, email: Option<String>) -> bool {
        let mut credentials = Credentials::new(username, password);
        credentials.email = email;

        match self.client.register(&credentials).await {
            Ok(Some(auth)) => {
                let name = auth.username.unwrap_or_else(|| username.to_string());
                if let Err(err) = self.gate.login_succeeded(auth.token, name) {
                    self.view.notice =
                        Some(Notice::Alert(format!("Could not save session: {}", err)));
                    return false;
                }
                self.view.login_required = false;
                self.load_collection().await;
                true
            }
            Ok(None) => {
                self.view.notice = Some(Notice::Info(
                    "Registration successful, please log in".to_string(),
                ));
                true
            }
            Err(err) => {
                warn!(error = %err, %username, "registration failed");
                let text = match err.server_message() {
                    Some(message) => format!("Registration failed: {}", message),
                    None => "Registration failed".to_string(),
                };
                self.view.notice = Some(Notice::Alert(text));
                false
            }
        }
    }

    pub fn logout(&mut self) -> ClientResult<()> {
        self.gate.logout()?;
        let empty_message = std::mem::take(&mut self.view.empty_message);
        self.view = ViewModel::new(empty_message);
        self.view.login_required = true;
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Collection
    // ------------------------------------------------------------------------

    pub fn begin_collection(&mut self) -> Option<(String, Ticket)> {
        let token = self.bearer()?;
        Some((token, self.tickets.issue(Pane::List)))
    }

    /// Apply a collection response; failures become the list error text
    pub fn finish_collection(&mut self, ticket: Ticket, result: ClientResult<Vec<Entity>>) -> Vec<Entity> {
        if let Err(err) = &result {
            self.note_auth_failure(err);
        }
        if !self.tickets.is_current(ticket) {
            debug!("discarding stale collection response");
            return result.unwrap_or_default();
        }

        match result {
            Ok(entities) => {
                info!(count = entities.len(), "entities loaded");
                self.view.list = ListPane::from_entities(
                    &entities,
                    self.view.selected_entity_id,
                    &self.view.empty_message,
                );
                self.view.entities = entities.clone();
                entities
            }
            Err(err) => {
                warn!(error = %err, "error loading entities");
                if !err.is_unauthorized() {
                    self.view.list = ListPane::Error(LIST_ERROR.to_string());
                }
                Vec::new()
            }
        }
    }

    /// Never fails: errors are rendered into the list pane
    pub async fn load_collection(&mut self) -> Vec<Entity> {
        let Some((token, ticket)) = self.begin_collection() else {
            return Vec::new();
        };
        let result = self.client.list_entities(&token).await;
        self.finish_collection(ticket, result)
    }

    // ------------------------------------------------------------------------
    // Detail
    // ------------------------------------------------------------------------

    pub fn begin_detail(&mut self, id: i64) -> Option<(String, Ticket)> {
        let token = self.bearer()?;
        self.view.selected_entity_id = Some(id);
        self.view.list.set_active(Some(id));
        Some((token, self.tickets.issue(Pane::Detail)))
    }

    /// Apply a detail response; failures touch only the detail pane
    pub fn finish_detail(
        &mut self,
        ticket: Ticket,
        result: ClientResult<EntityDetail>,
    ) -> ClientResult<EntityDetail> {
        if let Err(err) = &result {
            self.note_auth_failure(err);
        }
        if !self.tickets.is_current(ticket) {
            debug!("discarding stale detail response");
            return result;
        }

        match &result {
            Ok(detail) => {
                self.view.detail = DetailPane::Loaded(DetailView::from_detail(
                    detail,
                    self.view.reveal_passwords,
                ));
                self.view.loaded_detail = Some(detail.clone());
            }
            Err(err) => {
                warn!(error = %err, "error loading entity");
                if !err.is_unauthorized() {
                    self.view.detail = DetailPane::Error(DETAIL_ERROR.to_string());
                    self.view.loaded_detail = None;
                }
            }
        }
        result
    }

    pub async fn load_detail(&mut self, id: i64) -> ClientResult<EntityDetail> {
        let Some((token, ticket)) = self.begin_detail(id) else {
            return Err(ClientError::LoginRequired);
        };
        let result = self.client.get_entity(&token, id).await;
        self.finish_detail(ticket, result)
    }

    /// Re-render the loaded detail with passwords shown or masked; no fetch
    pub fn toggle_reveal_passwords(&mut self) {
        self.view.reveal_passwords = !self.view.reveal_passwords;
        if let Some(detail) = &self.view.loaded_detail {
            self.view.detail =
                DetailPane::Loaded(DetailView::from_detail(detail, self.view.reveal_passwords));
        }
    }

    // ------------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------------

    /// Point the entity form at a new record
    pub fn begin_create(&mut self) {
        self.view.current_entity_id = None;
    }

    /// Point the entity form at an existing record
    pub fn begin_edit(&mut self, id: i64) {
        self.view.current_entity_id = Some(id);
    }

    /// Create (`id == None`) or update, then re-fetch the affected pane
    pub async fn submit(&mut self, id: Option<i64>, payload: Payload) -> bool {
        let kind = payload.kind();
        let action = if id.is_some() { "updating" } else { "creating" };
        let Some(token) = self.bearer() else {
            return false;
        };

        match self.client.submit(&token, id, &payload).await {
            Ok(()) => {
                info!(kind = kind.noun(), ?id, "{} succeeded", action);
                self.refresh_after(kind).await;
                true
            }
            Err(err) => {
                self.alert_failure(action, kind, &err);
                false
            }
        }
    }

    /// Submit the entity form against `current_entity_id`
    pub async fn submit_entity_form(&mut self, payload: EntityPayload) -> bool {
        let target = self.view.current_entity_id;
        let ok = self.submit(target, Payload::Entity(payload)).await;
        if ok {
            self.view.current_entity_id = None;
        }
        ok
    }

    /// Delete after confirmation; a declined prompt issues no call.
    /// Logged out, the login prompt comes first and nothing is asked.
    pub async fn remove<C: Confirm>(&mut self, kind: ResourceKind, id: i64, confirm: &mut C) -> bool {
        let Some(token) = self.bearer() else {
            return false;
        };
        let prompt = format!("Are you sure you want to delete this {}?", kind.noun());
        if !confirm.confirm(&prompt) {
            debug!(kind = kind.noun(), id, "delete cancelled");
            return false;
        }

        match self.client.delete(&token, kind, id).await {
            Ok(()) => {
                info!(kind = kind.noun(), id, "deleted");
                if kind == ResourceKind::Entity && self.view.selected_entity_id == Some(id) {
                    self.view.selected_entity_id = None;
                    self.view.detail = DetailPane::Welcome;
                    self.view.loaded_detail = None;
                }
                self.refresh_after(kind).await;
                true
            }
            Err(err) => {
                self.alert_failure("deleting", kind, &err);
                false
            }
        }
    }

    /// Validate the form, send it as multipart, then reload that entity
    pub async fn upload_document(&mut self, entity_id: i64, form: UploadForm) -> bool {
        let Some(token) = self.bearer() else {
            return false;
        };

        let upload = match form.into_upload().await {
            Ok(upload) => upload,
            Err(ClientError::MissingField(_)) => {
                self.view.notice = Some(Notice::Alert("Please select a file".to_string()));
                return false;
            }
            Err(err) => {
                self.view.notice = Some(Notice::Alert(format!("Error reading file: {}", err)));
                return false;
            }
        };

        match self.client.upload_document(&token, entity_id, upload).await {
            Ok(()) => {
                info!(entity_id, "document uploaded");
                let _ = self.load_detail(entity_id).await;
                true
            }
            Err(err) => {
                self.alert_failure("uploading", ResourceKind::Document, &err);
                false
            }
        }
    }

    /// Fetch a document's bytes and write them to `dest`
    pub async fn download_document(&mut self, id: i64, dest: &Path) -> ClientResult<u64> {
        let token = self.bearer().ok_or(ClientError::LoginRequired)?;
        let bytes = match self.client.download_document(&token, id).await {
            Ok(bytes) => bytes,
            Err(err) => {
                self.alert_failure("downloading", ResourceKind::Document, &err);
                return Err(err);
            }
        };
        tokio::fs::write(dest, &bytes).await?;
        info!(id, path = %dest.display(), bytes = bytes.len(), "document saved");
        Ok(bytes.len() as u64)
    }

    /// Browser URL that serves the document with the session token embedded
    pub fn document_view_url(&mut self, id: i64) -> Option<String> {
        let token = self.bearer()?;
        Some(
            self.client
                .transport()
                .url(&Endpoint::DocumentWithToken(id, token)),
        )
    }

    /// Entity mutations refresh the list; the detail refreshes whenever an
    /// entity is selected, otherwise the list does
    async fn refresh_after(&mut self, kind: ResourceKind) {
        if kind == ResourceKind::Entity {
            self.load_collection().await;
        }
        match self.view.selected_entity_id {
            Some(id) => {
                let _ = self.load_detail(id).await;
            }
            None if kind != ResourceKind::Entity => {
                self.load_collection().await;
            }
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiRequest, RawResponse, RequestBody};
    use crate::entities::{AccountPayload, DocumentPayload, TaskPayload};
    use crate::session::{SessionStore, TOKEN_KEY};
    use std::cell::RefCell;

    // ------------------------------------------------------------------------
    // Fake transport: canned responses per route, every request recorded
    // ------------------------------------------------------------------------

    struct FakeTransport {
        requests: RefCell<Vec<ApiRequest>>,
        route: Box<dyn Fn(&str, &str) -> RawResponse>,
    }

    impl Transport for FakeTransport {
        async fn send(&self, request: ApiRequest) -> ClientResult<RawResponse> {
            let response = (self.route)(request.method.as_str(), &request.endpoint.path());
            self.requests.borrow_mut().push(request);
            Ok(response)
        }
    }

    fn respond(status: u16, body: &str) -> RawResponse {
        RawResponse {
            status,
            body: body.as_bytes().to_vec(),
        }
    }

    const ENTITIES: &str = r#"[{"id": 3, "name": "Zeta"}, {"id": 1, "name": "Alpha", "description": "First"}]"#;

    fn detail_body(id: i64) -> String {
        format!(
            r#"{{"id": {}, "name": "Entity {}", "accounts": [{{"id": 10, "account_name": "Main", "password": "hunter2"}}],
                "tasks": [], "documents": []}}"#,
            id, id
        )
    }

    /// Well-behaved server: lists, details and 200 for every mutation
    fn happy(method: &str, path: &str) -> RawResponse {
        match (method, path) {
            ("GET", "/entities") => respond(200, ENTITIES),
            ("GET", p) if p.starts_with("/entities/") => {
                let id = p.trim_start_matches("/entities/").parse().unwrap();
                respond(200, &detail_body(id))
            }
            _ => respond(200, r#"{"message": "ok"}"#),
        }
    }

    fn synchronizer(
        logged_in: bool,
        route: impl Fn(&str, &str) -> RawResponse + 'static,
    ) -> Synchronizer<FakeTransport> {
        let mut gate = AuthGate::restore(SessionStore::in_memory().unwrap()).unwrap();
        if logged_in {
            gate.login_succeeded("tok".to_string(), "alice".to_string()).unwrap();
        }
        let transport = FakeTransport {
            requests: RefCell::new(Vec::new()),
            route: Box::new(route),
        };
        Synchronizer::new(EntityClient::new(transport), gate, "No entities yet. Create one!")
    }

    fn calls(sync: &Synchronizer<FakeTransport>) -> Vec<(String, String)> {
        sync.client()
            .transport()
            .requests
            .borrow()
            .iter()
            .map(|r| (r.method.to_string(), r.endpoint.path()))
            .collect()
    }

    fn call(method: &str, path: &str) -> (String, String) {
        (method.to_string(), path.to_string())
    }

    fn clear_calls(sync: &Synchronizer<FakeTransport>) {
        sync.client().transport().requests.borrow_mut().clear();
    }

    fn parse_detail(id: i64) -> EntityDetail {
        serde_json::from_str(&detail_body(id)).unwrap()
    }

    #[test]
    fn test_tickets_track_latest_per_pane() {
        let mut tickets = RequestTickets::default();
        let first = tickets.issue(Pane::Detail);
        let list = tickets.issue(Pane::List);
        assert!(tickets.is_current(first));

        let second = tickets.issue(Pane::Detail);
        assert!(!tickets.is_current(first));
        assert!(tickets.is_current(second));
        assert!(tickets.is_current(list));
    }

    #[test]
    fn test_closure_confirm() {
        let mut asked = Vec::new();
        let mut confirm = |prompt: &str| {
            asked.push(prompt.to_string());
            false
        };
        assert!(!confirm.confirm("Delete?"));
        assert_eq!(asked, vec!["Delete?".to_string()]);
    }

    #[test]
    fn test_fresh_view_model() {
        let view = ViewModel::new("Nothing yet");
        assert_eq!(view.list, ListPane::Idle);
        assert_eq!(view.detail, DetailPane::Welcome);
        assert_eq!(view.selected_entity_id, None);
        assert_eq!(view.empty_message, "Nothing yet");
    }

    // ------------------------------------------------------------------------
    // Fetch → render cycle
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_collection_renders_one_row_per_entity_in_order() {
        let mut sync = synchronizer(true, happy);
        let entities = sync.load_collection().await;

        assert_eq!(entities.len(), 2);
        let ids: Vec<i64> = sync.view().list.rows().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 1]);
        assert_eq!(sync.view().list.rows()[0].subtitle, "No description");

        let requests = sync.client().transport().requests.borrow();
        assert_eq!(requests[0].bearer.as_deref(), Some("tok"));
    }

    #[tokio::test]
    async fn test_empty_collection_renders_message_once() {
        let mut sync = synchronizer(true, |_, _| respond(200, "[]"));
        sync.load_collection().await;

        assert_eq!(
            sync.view().list,
            ListPane::Empty("No entities yet. Create one!".to_string())
        );
        assert_eq!(sync.view().list.text_lines().len(), 1);
    }

    #[tokio::test]
    async fn test_collection_failure_renders_list_error() {
        let mut sync = synchronizer(true, |_, _| respond(500, "boom"));
        assert!(sync.load_collection().await.is_empty());
        assert_eq!(sync.view().list, ListPane::Error(LIST_ERROR.to_string()));
        assert!(sync.take_notice().is_none());
    }

    #[tokio::test]
    async fn test_failed_detail_leaves_list_untouched() {
        let mut sync = synchronizer(true, |method, path| match path {
            "/entities" => happy(method, path),
            _ => respond(500, r#"{"error": "database is locked"}"#),
        });
        sync.load_collection().await;
        let list_before = sync.view().list.clone();

        assert!(sync.load_detail(1).await.is_err());
        assert_eq!(sync.view().detail, DetailPane::Error(DETAIL_ERROR.to_string()));
        assert_eq!(sync.view().list.rows().len(), list_before.rows().len());
        assert_eq!(sync.view().selected_entity_id, Some(1));
        assert!(sync.view().list.rows()[1].active);
    }

    #[tokio::test]
    async fn test_detail_renders_sections_and_password_toggle() {
        let mut sync = synchronizer(true, happy);
        let detail = sync.load_detail(4).await.unwrap();
        assert_eq!(detail.entity.id, 4);

        let masked = sync.view().detail.text_lines();
        assert!(masked.contains(&"      Password: •••••••".to_string()));

        sync.toggle_reveal_passwords();
        let revealed = sync.view().detail.text_lines();
        assert!(revealed.contains(&"      Password: hunter2".to_string()));
        assert_eq!(calls(&sync).len(), 1);
    }

    #[test]
    fn test_stale_collection_response_is_discarded() {
        let mut sync = synchronizer(true, happy);
        let (_, first) = sync.begin_collection().unwrap();
        let (_, second) = sync.begin_collection().unwrap();

        let newer: Vec<Entity> = serde_json::from_str(r#"[{"id": 9, "name": "Newer"}]"#).unwrap();
        let older: Vec<Entity> = serde_json::from_str(ENTITIES).unwrap();

        sync.finish_collection(second, Ok(newer));
        let returned = sync.finish_collection(first, Ok(older));

        assert_eq!(returned.len(), 2);
        let ids: Vec<i64> = sync.view().list.rows().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![9]);
        assert_eq!(sync.view().entities.len(), 1);
    }

    #[test]
    fn test_stale_unauthorized_still_ends_session() {
        let mut sync = synchronizer(true, happy);
        let (_, first) = sync.begin_collection().unwrap();
        let (_, second) = sync.begin_collection().unwrap();

        sync.finish_collection(second, Ok(Vec::new()));
        sync.finish_collection(first, Err(ClientError::Unauthorized));

        assert!(!sync.gate().is_logged_in());
        assert!(sync.view().login_required);
    }

    #[test]
    fn test_stale_detail_response_is_discarded() {
        let mut sync = synchronizer(true, happy);
        let (_, first) = sync.begin_detail(1).unwrap();
        let (_, second) = sync.begin_detail(2).unwrap();

        sync.finish_detail(second, Ok(parse_detail(2))).unwrap();
        sync.finish_detail(first, Ok(parse_detail(1))).unwrap();

        assert_eq!(sync.view().loaded_detail.as_ref().map(|d| d.entity.id), Some(2));
        assert_eq!(sync.view().detail.view().map(|v| v.entity_id), Some(2));
        assert_eq!(sync.view().selected_entity_id, Some(2));
    }

    // ------------------------------------------------------------------------
    // Mutations and refresh rules
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_entity_form_posts_when_creating() {
        let mut sync = synchronizer(true, happy);
        sync.begin_create();
        assert!(sync.submit_entity_form(EntityPayload::new("Acme")).await);

        assert_eq!(calls(&sync), vec![call("POST", "/entities"), call("GET", "/entities")]);
    }

    #[tokio::test]
    async fn test_entity_form_puts_when_editing() {
        let mut sync = synchronizer(true, happy);
        sync.begin_edit(3);
        assert!(sync.submit_entity_form(EntityPayload::new("Renamed")).await);

        assert_eq!(calls(&sync), vec![call("PUT", "/entities/3"), call("GET", "/entities")]);
        assert_eq!(sync.view().current_entity_id, None);

        let requests = sync.client().transport().requests.borrow();
        match &requests[0].body {
            RequestBody::Json(body) => assert_eq!(body["name"], "Renamed"),
            other => panic!("unexpected body: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_entity_update_refreshes_list_and_selected_detail() {
        let mut sync = synchronizer(true, happy);
        sync.load_detail(3).await.unwrap();
        clear_calls(&sync);

        sync.begin_edit(3);
        sync.submit_entity_form(EntityPayload::new("Zeta Holdings")).await;

        assert_eq!(
            calls(&sync),
            vec![
                call("PUT", "/entities/3"),
                call("GET", "/entities"),
                call("GET", "/entities/3"),
            ]
        );
    }

    #[tokio::test]
    async fn test_child_create_refreshes_selected_detail_only() {
        let mut sync = synchronizer(true, happy);
        sync.load_detail(4).await.unwrap();
        clear_calls(&sync);

        let payload = Payload::Account {
            entity_id: 4,
            account: AccountPayload::new("Savings"),
        };
        assert!(sync.submit(None, payload).await);

        assert_eq!(
            calls(&sync),
            vec![call("POST", "/entities/4/accounts"), call("GET", "/entities/4")]
        );
    }

    #[tokio::test]
    async fn test_child_update_without_selection_refreshes_list() {
        let mut sync = synchronizer(true, happy);
        let payload = Payload::Task {
            entity_id: 4,
            task: TaskPayload::new("File taxes"),
        };
        assert!(sync.submit(Some(8), payload).await);

        assert_eq!(calls(&sync), vec![call("PUT", "/tasks/8"), call("GET", "/entities")]);
    }

    #[tokio::test]
    async fn test_failed_create_alerts_with_server_message() {
        let mut sync = synchronizer(true, |_, _| respond(400, r#"{"error": "Name already exists"}"#));
        assert!(!sync.submit_entity_form(EntityPayload::new("Acme")).await);

        assert_eq!(
            sync.take_notice(),
            Some(Notice::Alert("Error creating entity: Name already exists".to_string()))
        );
        // no refresh after a failure
        assert_eq!(calls(&sync), vec![call("POST", "/entities")]);
    }

    #[tokio::test]
    async fn test_document_metadata_update_reloads_entity() {
        let mut sync = synchronizer(true, happy);
        sync.load_detail(4).await.unwrap();
        clear_calls(&sync);

        let payload = Payload::Document {
            entity_id: 4,
            document: DocumentPayload::new("Amended bylaws"),
        };
        assert!(sync.submit(Some(30), payload).await);
        assert_eq!(calls(&sync), vec![call("PUT", "/documents/30"), call("GET", "/entities/4")]);
    }

    #[tokio::test]
    async fn test_declined_delete_issues_no_call() {
        let mut sync = synchronizer(true, happy);
        let mut prompts = Vec::new();
        let mut decline = |prompt: &str| {
            prompts.push(prompt.to_string());
            false
        };

        assert!(!sync.remove(ResourceKind::Task, 5, &mut decline).await);
        assert!(calls(&sync).is_empty());
        assert_eq!(prompts, vec!["Are you sure you want to delete this task?".to_string()]);
    }

    #[tokio::test]
    async fn test_delete_while_logged_out_skips_confirmation() {
        let mut sync = synchronizer(false, happy);
        let mut asked = 0;
        let mut confirm = |_: &str| {
            asked += 1;
            true
        };

        assert!(!sync.remove(ResourceKind::Entity, 1, &mut confirm).await);
        assert_eq!(asked, 0);
        assert!(sync.view().login_required);
        assert!(calls(&sync).is_empty());
    }

    #[tokio::test]
    async fn test_deleting_selected_entity_clears_detail() {
        let mut sync = synchronizer(true, happy);
        sync.load_detail(1).await.unwrap();
        clear_calls(&sync);

        assert!(sync.remove(ResourceKind::Entity, 1, &mut |_: &str| true).await);

        assert_eq!(calls(&sync), vec![call("DELETE", "/entities/1"), call("GET", "/entities")]);
        assert_eq!(sync.view().detail, DetailPane::Welcome);
        assert_eq!(sync.view().selected_entity_id, None);
    }

    #[tokio::test]
    async fn test_deleting_document_reloads_its_entity() {
        let mut sync = synchronizer(true, happy);
        sync.load_detail(4).await.unwrap();
        clear_calls(&sync);

        assert!(sync.remove(ResourceKind::Document, 30, &mut |_: &str| true).await);
        assert_eq!(calls(&sync), vec![call("DELETE", "/documents/30"), call("GET", "/entities/4")]);
    }

    // ------------------------------------------------------------------------
    // Documents
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_upload_without_file_issues_no_call() {
        let mut sync = synchronizer(true, happy);
        assert!(!sync.upload_document(4, UploadForm::default()).await);

        assert!(calls(&sync).is_empty());
        assert_eq!(
            sync.take_notice(),
            Some(Notice::Alert("Please select a file".to_string()))
        );
    }

    #[tokio::test]
    async fn test_upload_sends_multipart_then_reloads_entity() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bylaws.pdf");
        std::fs::write(&path, b"%PDF-1.7").unwrap();

        let mut sync = synchronizer(true, happy);
        let form = UploadForm {
            file: Some(path),
            title: None,
            document_type: Some("legal".to_string()),
        };
        assert!(sync.upload_document(4, form).await);

        assert_eq!(
            calls(&sync),
            vec![call("POST", "/entities/4/documents"), call("GET", "/entities/4")]
        );
        let requests = sync.client().transport().requests.borrow();
        match &requests[0].body {
            RequestBody::Multipart(upload) => {
                assert_eq!(upload.file_name, "bylaws.pdf");
                assert_eq!(upload.title, "bylaws.pdf");
                assert_eq!(upload.document_type, "legal");
                assert_eq!(upload.bytes, b"%PDF-1.7".to_vec());
            }
            other => panic!("unexpected body: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_download_writes_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("out.bin");
        let mut sync = synchronizer(true, |_, _| respond(200, "file-bytes"));

        assert_eq!(sync.download_document(9, &dest).await.unwrap(), 10);
        assert_eq!(std::fs::read(&dest).unwrap(), b"file-bytes".to_vec());
        assert_eq!(calls(&sync), vec![call("GET", "/documents/9/download")]);
    }

    // ------------------------------------------------------------------------
    // Authentication gate
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_logged_out_issues_no_calls() {
        let mut sync = synchronizer(false, happy);
        assert!(sync.view().login_required);

        assert!(sync.load_collection().await.is_empty());
        assert!(matches!(sync.load_detail(1).await, Err(ClientError::LoginRequired)));
        assert!(!sync.submit_entity_form(EntityPayload::new("Acme")).await);
        assert!(calls(&sync).is_empty());
    }

    #[tokio::test]
    async fn test_unauthorized_response_ends_session() {
        let mut sync = synchronizer(true, |_, _| respond(401, ""));
        sync.load_collection().await;

        assert!(!sync.gate().is_logged_in());
        assert_eq!(sync.gate().store().get(TOKEN_KEY).unwrap(), None);
        assert!(sync.view().login_required);
        assert_eq!(
            sync.take_notice(),
            Some(Notice::Alert(SESSION_EXPIRED.to_string()))
        );

        // the next call never leaves the client
        sync.load_collection().await;
        assert_eq!(calls(&sync).len(), 1);
    }

    #[tokio::test]
    async fn test_unauthorized_mutation_ends_session() {
        let mut sync = synchronizer(true, |_, _| respond(401, ""));
        assert!(!sync.submit_entity_form(EntityPayload::new("Acme")).await);

        assert!(!sync.gate().is_logged_in());
        assert_eq!(sync.gate().store().get(TOKEN_KEY).unwrap(), None);
        assert!(sync.view().login_required);
        assert_eq!(
            sync.take_notice(),
            Some(Notice::Alert(SESSION_EXPIRED.to_string()))
        );
        // no refresh after the rejected call
        assert_eq!(calls(&sync), vec![call("POST", "/entities")]);
    }

    #[tokio::test]
    async fn test_unauthorized_delete_ends_session() {
        let mut sync = synchronizer(true, |_, _| respond(401, ""));
        assert!(!sync.remove(ResourceKind::Account, 10, &mut |_: &str| true).await);

        assert!(!sync.gate().is_logged_in());
        assert_eq!(
            sync.take_notice(),
            Some(Notice::Alert(SESSION_EXPIRED.to_string()))
        );
        assert_eq!(calls(&sync), vec![call("DELETE", "/accounts/10")]);
    }

    #[tokio::test]
    async fn test_unauthorized_upload_ends_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("minutes.txt");
        std::fs::write(&path, b"minutes").unwrap();

        let mut sync = synchronizer(true, |_, _| respond(401, ""));
        let form = UploadForm {
            file: Some(path),
            ..Default::default()
        };
        assert!(!sync.upload_document(4, form).await);

        assert!(!sync.gate().is_logged_in());
        assert_eq!(sync.gate().store().get(TOKEN_KEY).unwrap(), None);
        assert_eq!(
            sync.take_notice(),
            Some(Notice::Alert(SESSION_EXPIRED.to_string()))
        );
        assert_eq!(calls(&sync), vec![call("POST", "/entities/4/documents")]);
    }

    #[tokio::test]
    async fn test_register_with_token_logs_in() {
        let mut sync = synchronizer(false, |method, path| match path {
            "/auth/register" => respond(201, r#"{"token": "fresh", "username": "bob"}"#),
            _ => happy(method, path),
        });

        assert!(sync.register("bob", "pw", Some("bob@example.com".to_string())).await);
        assert_eq!(sync.gate().token(), Some("fresh"));
        assert_eq!(sync.gate().username(), Some("bob"));
        assert_eq!(sync.gate().store().get(TOKEN_KEY).unwrap().as_deref(), Some("fresh"));
        assert!(!sync.view().login_required);
        assert_eq!(sync.view().list.rows().len(), 2);
        assert_eq!(calls(&sync), vec![call("POST", "/auth/register"), call("GET", "/entities")]);

        let requests = sync.client().transport().requests.borrow();
        match &requests[0].body {
            RequestBody::Json(body) => assert_eq!(body["email"], "bob@example.com"),
            other => panic!("unexpected body: {:?}", other),
        }
    }

    #[test]
    fn test_document_view_url_needs_session() {
        let mut sync = synchronizer(true, happy);
        assert_eq!(
            sync.document_view_url(9).as_deref(),
            Some("/documents/9/token/tok")
        );

        sync.logout().unwrap();
        assert_eq!(sync.document_view_url(9), None);
        assert!(sync.view().login_required);
    }

    #[tokio::test]
    async fn test_login_persists_token_and_loads_collection() {
        let mut sync = synchronizer(false, |method, path| match path {
            "/auth/login" => respond(200, r#"{"token": "abc", "username": "alice"}"#),
            _ => happy(method, path),
        });

        assert!(sync.login("alice", "pw").await);
        assert_eq!(sync.gate().token(), Some("abc"));
        assert_eq!(sync.gate().store().get(TOKEN_KEY).unwrap().as_deref(), Some("abc"));
        assert!(!sync.view().login_required);
        assert_eq!(sync.view().list.rows().len(), 2);

        let requests = sync.client().transport().requests.borrow();
        assert_eq!(requests[0].bearer, None);
        assert_eq!(requests[1].bearer.as_deref(), Some("abc"));
    }

    #[tokio::test]
    async fn test_bad_credentials_stay_logged_out() {
        let mut sync = synchronizer(false, |_, _| respond(401, ""));
        assert!(!sync.login("alice", "wrong").await);
        assert!(!sync.gate().is_logged_in());
        assert_eq!(
            sync.take_notice(),
            Some(Notice::Alert("Invalid username or password".to_string()))
        );
    }

    #[tokio::test]
    async fn test_register_without_token_asks_for_login() {
        let mut sync = synchronizer(false, |_, _| respond(201, r#"{"message": "User created"}"#));
        assert!(sync.register("bob", "pw", None).await);
        assert!(!sync.gate().is_logged_in());
        assert!(matches!(sync.take_notice(), Some(Notice::Info(_))));
    }

    #[test]
    fn test_logout_resets_view() {
        let mut sync = synchronizer(true, happy);
        sync.begin_edit(3);
        sync.logout().unwrap();

        assert!(sync.view().login_required);
        assert_eq!(sync.view().current_entity_id, None);
        assert_eq!(sync.view().empty_message, "No entities yet. Create one!");
    }
}
