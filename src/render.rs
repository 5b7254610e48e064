// 🖼️ Render-ready view structures
//
// Responses are turned into plain structures that both the TUI and the
// one-shot CLI commands draw. Every render replaces the whole pane.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};

use crate::entities::{Account, Document, Entity, EntityDetail, StatusTone, Task};

pub const LIST_ERROR: &str = "Error loading entities";
pub const DETAIL_ERROR: &str = "Error loading entity details";
pub const NO_DESCRIPTION: &str = "No description";
const NOT_AVAILABLE: &str = "N/A";
const NO_LOGIN: &str = "No saved login";

// ============================================================================
// LIST PANE
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct EntityRow {
    pub id: i64,
    pub title: String,
    pub subtitle: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListPane {
    /// Nothing fetched yet
    Idle,
    Loaded(Vec<EntityRow>),
    Empty(String),
    Error(String),
}

impl ListPane {
    /// One row per entity, in response order
    pub fn from_entities(entities: &[Entity], selected: Option<i64>, empty_message: &str) -> Self {
        if entities.is_empty() {
            return ListPane::Empty(empty_message.to_string());
        }

        ListPane::Loaded(
            entities
                .iter()
                .map(|entity| EntityRow {
                    id: entity.id,
                    title: entity.name.clone(),
                    subtitle: entity
                        .description
                        .clone()
                        .filter(|d| !d.is_empty())
                        .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
                    active: selected == Some(entity.id),
                })
                .collect(),
        )
    }

    pub fn rows(&self) -> &[EntityRow] {
        match self {
            ListPane::Loaded(rows) => rows,
            _ => &[],
        }
    }

    /// Move the active marker without refetching
    pub fn set_active(&mut self, id: Option<i64>) {
        if let ListPane::Loaded(rows) = self {
            for row in rows.iter_mut() {
                row.active = Some(row.id) == id;
            }
        }
    }

    pub fn text_lines(&self) -> Vec<String> {
        match self {
            ListPane::Idle => Vec::new(),
            ListPane::Loaded(rows) => rows
                .iter()
                .map(|row| {
                    let marker = if row.active { "→" } else { " " };
                    format!("{} [{}] {} - {}", marker, row.id, row.title, row.subtitle)
                })
                .collect(),
            ListPane::Empty(message) | ListPane::Error(message) => vec![message.clone()],
        }
    }
}

// ============================================================================
// DETAIL PANE
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum DetailPane {
    /// No entity selected yet
    Welcome,
    Loaded(DetailView),
    Error(String),
}

impl DetailPane {
    pub fn view(&self) -> Option<&DetailView> {
        match self {
            DetailPane::Loaded(view) => Some(view),
            _ => None,
        }
    }

    pub fn text_lines(&self) -> Vec<String> {
        match self {
            DetailPane::Welcome => vec!["Select an entity to see its details".to_string()],
            DetailPane::Error(message) => vec![message.clone()],
            DetailPane::Loaded(view) => view.text_lines(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fact {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusBadge {
    pub label: String,
    pub tone: StatusTone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardAction {
    View,
    Download,
    Delete,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub id: i64,
    pub title: String,
    pub lines: Vec<String>,
    pub actions: Vec<CardAction>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub heading: &'static str,
    pub cards: Vec<Card>,
    pub empty_message: &'static str,
}

impl Section {
    pub fn count(&self) -> usize {
        self.cards.len()
    }

    pub fn title(&self) -> String {
        format!("{} ({})", self.heading, self.count())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetailView {
    pub entity_id: i64,
    pub title: String,
    pub description: String,
    pub facts: Vec<Fact>,
    pub status: Option<StatusBadge>,
    pub accounts: Section,
    pub tasks: Section,
    pub documents: Section,
}

impl DetailView {
    pub fn from_detail(detail: &EntityDetail, reveal_passwords: bool) -> Self {
        let entity = &detail.entity;
        let today = Local::now().date_naive();

        let mut facts = Vec::new();
        push_fact(&mut facts, "EIN", &entity.ein);
        push_fact(&mut facts, "State", &entity.state_of_incorporation);
        push_fact(&mut facts, "Incorporated", &entity.date_of_incorporation);
        push_fact(&mut facts, "Address", &entity.registered_address);
        push_fact(&mut facts, "Phone", &entity.registered_phone);

        let status = (!entity.status.is_empty()).then(|| StatusBadge {
            label: entity.status.to_uppercase(),
            tone: entity.status_tone(),
        });

        DetailView {
            entity_id: entity.id,
            title: entity.name.clone(),
            description: or_default(&entity.description, NO_DESCRIPTION),
            facts,
            status,
            accounts: Section {
                heading: "Accounts",
                cards: detail
                    .accounts
                    .iter()
                    .map(|a| account_card(a, reveal_passwords))
                    .collect(),
                empty_message: "No accounts yet",
            },
            tasks: Section {
                heading: "Tasks",
                cards: detail.tasks.iter().map(|t| task_card(t, today)).collect(),
                empty_message: "No tasks yet",
            },
            documents: Section {
                heading: "Documents",
                cards: detail.documents.iter().map(document_card).collect(),
                empty_message: "No documents yet",
            },
        }
    }

    pub fn sections(&self) -> [&Section; 3] {
        [&self.accounts, &self.tasks, &self.documents]
    }

    pub fn text_lines(&self) -> Vec<String> {
        let mut lines = vec![self.title.clone(), self.description.clone()];
        for fact in &self.facts {
            lines.push(format!("{}: {}", fact.label, fact.value));
        }
        if let Some(badge) = &self.status {
            lines.push(format!("Status: {}", badge.label));
        }

        for section in self.sections() {
            lines.push(String::new());
            lines.push(section.title());
            if section.cards.is_empty() {
                lines.push(format!("  {}", section.empty_message));
            }
            for card in &section.cards {
                lines.push(format!("  [{}] {}", card.id, card.title));
                lines.extend(card.lines.iter().map(|l| format!("      {}", l)));
            }
        }
        lines
    }
}

fn push_fact(facts: &mut Vec<Fact>, label: &'static str, value: &Option<String>) {
    if let Some(value) = value.as_ref().filter(|v| !v.is_empty()) {
        facts.push(Fact {
            label,
            value: value.clone(),
        });
    }
}

fn or_default(value: &Option<String>, default: &str) -> String {
    value
        .clone()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn account_card(account: &Account, reveal_passwords: bool) -> Card {
    let mut lines = vec![
        format!(
            "Type: {} | Balance: {}",
            or_default(&account.account_type, NOT_AVAILABLE),
            format_balance(account.balance)
        ),
        format!("Account #: {}", or_default(&account.account_number, NOT_AVAILABLE)),
    ];
    if account.has_credentials() {
        if let Some(username) = &account.username {
            lines.push(format!("Username: {}", username));
        }
        if let Some(password) = account.display_password(reveal_passwords) {
            lines.push(format!("Password: {}", password));
        }
        if let Some(url) = &account.account_url {
            lines.push(format!("URL: {}", url));
        }
    } else {
        lines.push(NO_LOGIN.to_string());
    }
    if let Some(notes) = &account.notes {
        lines.push(format!("Notes: {}", notes));
    }

    Card {
        id: account.id,
        title: account.account_name.clone(),
        lines,
        actions: vec![CardAction::Delete],
    }
}

fn task_card(task: &Task, today: NaiveDate) -> Card {
    let mut lines = vec![
        format!(
            "Status: {} | Priority: {}",
            task.status,
            or_default(&task.priority, NOT_AVAILABLE)
        ),
        or_default(&task.description, NO_DESCRIPTION),
    ];
    if let Some(category) = &task.category {
        lines.push(format!("Category: {}", category));
    }
    if let Some(assignee) = &task.assigned_to {
        lines.push(format!("Assigned to: {}", assignee));
    }
    if let Some(start) = task.start_date {
        lines.push(format!("Started: {}", start.format("%Y-%m-%d")));
    }
    if let Some(due) = task.due_date {
        let marker = if task.is_overdue(today) { " (OVERDUE)" } else { "" };
        lines.push(format!("Due: {}{}", due.format("%Y-%m-%d"), marker));
    }
    if let Some(done) = task.completion_date {
        lines.push(format!("Completed: {}", done.format("%Y-%m-%d")));
    }
    match (task.estimated_hours, task.actual_hours) {
        (None, None) => {}
        (estimated, actual) => lines.push(format!(
            "Hours: {} est / {} actual",
            format_hours(estimated),
            format_hours(actual)
        )),
    }
    if !task.dependencies.is_empty() {
        lines.push(format!("Depends on: {}", task.dependencies.join(", ")));
    }

    Card {
        id: task.id,
        title: task.title.clone(),
        lines,
        actions: vec![CardAction::Delete],
    }
}

fn document_card(document: &Document) -> Card {
    let mut lines = vec![format!(
        "Type: {}",
        or_default(&document.document_type, NOT_AVAILABLE)
    )];
    if let Some(name) = &document.original_filename {
        lines.push(format!("File: {}", name));
    }
    if let Some(size) = document.file_size.filter(|s| *s > 0) {
        lines.push(format!("Size: {}", format_file_size(size)));
    }
    if let Some(uploaded) = &document.uploaded_at {
        lines.push(format!("Uploaded: {}", format_date(uploaded)));
    }

    let mut actions = Vec::new();
    if document.has_file() {
        actions.push(CardAction::View);
        actions.push(CardAction::Download);
    }
    actions.push(CardAction::Delete);

    Card {
        id: document.id,
        title: document.title.clone(),
        lines,
        actions,
    }
}

// ============================================================================
// FORMATTING
// ============================================================================

/// `$12,345.67`, negative amounts as `-$12.00`
pub fn format_balance(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let digits = (cents / 100).to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, grouped, cents % 100)
}

/// Base-1024 size rounded to two decimals: `0 Bytes`, `1.5 KB`, `3 MB`
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    // integer floor(log1024) avoids float drift on exact powers
    let mut exponent = 0;
    let mut scaled = bytes;
    while scaled >= 1024 && exponent < UNITS.len() - 1 {
        scaled /= 1024;
        exponent += 1;
    }
    let value = (bytes as f64 / 1024_f64.powi(exponent as i32) * 100.0).round() / 100.0;

    format!("{} {}", value, UNITS[exponent])
}

/// Date part of a server timestamp; unparseable input is shown verbatim
pub fn format_date(raw: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%Y-%m-%d").to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format("%Y-%m-%d").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%Y-%m-%d").to_string();
    }
    raw.to_string()
}

fn format_hours(hours: Option<f64>) -> String {
    hours
        .map(|h| format!("{}", h))
        .unwrap_or_else(|| "-".to_string())
}
