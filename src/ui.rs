use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;
use std::path::PathBuf;

use entity_tracker::render::{CardAction, DetailPane, DetailView, ListPane};
use entity_tracker::{
    Form, FormKind, Notice, ResourceKind, StatusTone, Submission, Synchronizer, Transport,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    List,
    Detail,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Browse,
    Form(Form),
    Confirm { kind: ResourceKind, id: i64, prompt: String },
    Notice(Notice),
}

/// Work for the synchronizer, produced by key handling
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    Select(i64),
    Refresh,
    Submit(Submission),
    Delete { kind: ResourceKind, id: i64 },
    Download(i64),
    ViewUrl(i64),
    TogglePasswords,
    Logout,
}

pub struct App<T> {
    pub sync: Synchronizer<T>,
    pub mode: Mode,
    pub focus: Focus,
    pub list_state: ListState,
    pub card_cursor: usize,
    pub form_error: Option<String>,
    pub should_quit: bool,
}

impl<T: Transport> App<T> {
    pub fn new(sync: Synchronizer<T>) -> Self {
        let mode = if sync.view().login_required {
            Mode::Form(Form::login())
        } else {
            Mode::Browse
        };

        Self {
            sync,
            mode,
            focus: Focus::List,
            list_state: ListState::default(),
            card_cursor: 0,
            form_error: None,
            should_quit: false,
        }
    }

    fn list_len(&self) -> usize {
        self.sync.view().list.rows().len()
    }

    pub fn selected_row_id(&self) -> Option<i64> {
        let rows = self.sync.view().list.rows();
        self.list_state.selected().and_then(|i| rows.get(i)).map(|r| r.id)
    }

    /// (kind, id) of every card in the detail pane, top to bottom
    pub fn card_targets(&self) -> Vec<(ResourceKind, i64)> {
        match &self.sync.view().detail {
            DetailPane::Loaded(view) => card_targets(view),
            _ => Vec::new(),
        }
    }

    fn focused_card(&self) -> Option<(ResourceKind, i64)> {
        self.card_targets().get(self.card_cursor).copied()
    }

    fn clamp_selection(&mut self) {
        let len = self.list_len();
        if len == 0 {
            self.list_state.select(None);
        } else if self.list_state.selected().map_or(true, |i| i >= len) {
            self.list_state.select(Some(0));
        }
        let cards = self.card_targets().len();
        if self.card_cursor >= cards {
            self.card_cursor = cards.saturating_sub(1);
        }
    }

    pub fn next(&mut self) {
        match self.focus {
            Focus::List => {
                let len = self.list_len();
                if len == 0 {
                    return;
                }
                let i = match self.list_state.selected() {
                    Some(i) if i >= len - 1 => 0,
                    Some(i) => i + 1,
                    None => 0,
                };
                self.list_state.select(Some(i));
            }
            Focus::Detail => {
                let len = self.card_targets().len();
                if len > 0 {
                    self.card_cursor = (self.card_cursor + 1) % len;
                }
            }
        }
    }

    pub fn previous(&mut self) {
        match self.focus {
            Focus::List => {
                let len = self.list_len();
                if len == 0 {
                    return;
                }
                let i = match self.list_state.selected() {
                    Some(0) | None => len - 1,
                    Some(i) => i - 1,
                };
                self.list_state.select(Some(i));
            }
            Focus::Detail => {
                let len = self.card_targets().len();
                if len > 0 {
                    self.card_cursor = (self.card_cursor + len - 1) % len;
                }
            }
        }
    }

    fn open_form(&mut self, form: Form) {
        self.form_error = None;
        self.mode = Mode::Form(form);
    }

    fn confirm_delete(&mut self, kind: ResourceKind, id: i64) {
        self.mode = Mode::Confirm {
            kind,
            id,
            prompt: format!("Are you sure you want to delete this {}? (y/n)", kind.noun()),
        };
    }

    fn document_has_file(&self, id: i64) -> bool {
        self.sync
            .view()
            .loaded_detail
            .as_ref()
            .and_then(|d| d.documents.iter().find(|doc| doc.id == id))
            .is_some_and(|doc| doc.has_file())
    }

    /// Entity whose detail is on screen
    fn loaded_entity_id(&self) -> Option<i64> {
        self.sync.view().loaded_detail.as_ref().map(|d| d.entity.id)
    }

    fn edit_form_for_focus(&mut self) -> Option<Form> {
        let view = self.sync.view();
        match self.focus {
            Focus::List => {
                let id = self.selected_row_id()?;
                let entity = view
                    .loaded_detail
                    .as_ref()
                    .map(|d| &d.entity)
                    .filter(|e| e.id == id)
                    .or_else(|| view.entities.iter().find(|e| e.id == id))?
                    .clone();
                self.sync.begin_edit(id);
                Some(Form::entity(Some(&entity)))
            }
            Focus::Detail => {
                let (kind, id) = self.focused_card()?;
                let detail = view.loaded_detail.as_ref()?;
                let entity_id = detail.entity.id;
                match kind {
                    ResourceKind::Account => detail
                        .accounts
                        .iter()
                        .find(|a| a.id == id)
                        .map(|a| Form::account(entity_id, Some(a))),
                    ResourceKind::Task => detail
                        .tasks
                        .iter()
                        .find(|t| t.id == id)
                        .map(|t| Form::task(entity_id, Some(t))),
                    ResourceKind::Document => detail
                        .documents
                        .iter()
                        .find(|d| d.id == id)
                        .map(|d| Form::document(entity_id, d)),
                    ResourceKind::Entity => None,
                }
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        match std::mem::replace(&mut self.mode, Mode::Browse) {
            Mode::Notice(_) => {
                if self.sync.view().login_required {
                    self.open_form(Form::login());
                }
                None
            }
            Mode::Confirm { kind, id, prompt } => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => Some(Action::Delete { kind, id }),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => None,
                _ => {
                    self.mode = Mode::Confirm { kind, id, prompt };
                    None
                }
            },
            Mode::Form(form) => self.handle_form_key(form, key),
            Mode::Browse => self.handle_browse_key(key),
        }
    }

    fn handle_form_key(&mut self, mut form: Form, key: KeyEvent) -> Option<Action> {
        let is_auth = matches!(form.kind, FormKind::Login | FormKind::Register);

        match key.code {
            KeyCode::Esc if is_auth => return Some(Action::Quit),
            KeyCode::Esc => {
                self.form_error = None;
                return None;
            }
            KeyCode::F(2) if is_auth => {
                form = match form.kind {
                    FormKind::Login => Form::register(),
                    _ => Form::login(),
                };
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match form.submission() {
                Ok(submission) => {
                    self.form_error = None;
                    return Some(Action::Submit(submission));
                }
                Err(message) => self.form_error = Some(message),
            },
            KeyCode::Char(ch) => form.push_char(ch),
            _ => {}
        }

        self.mode = Mode::Form(form);
        None
    }

    fn handle_browse_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
            KeyCode::Tab | KeyCode::BackTab => {
                self.focus = match self.focus {
                    Focus::List if self.loaded_entity_id().is_some() => Focus::Detail,
                    _ => Focus::List,
                };
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.next();
                None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.previous();
                None
            }
            KeyCode::Enter => self.selected_row_id().map(Action::Select),
            KeyCode::Char('r') => Some(Action::Refresh),
            KeyCode::Char('p') => Some(Action::TogglePasswords),
            KeyCode::Char('L') => Some(Action::Logout),
            KeyCode::Char('n') => {
                self.sync.begin_create();
                self.open_form(Form::entity(None));
                None
            }
            KeyCode::Char('e') => {
                if let Some(form) = self.edit_form_for_focus() {
                    self.open_form(form);
                }
                None
            }
            KeyCode::Char('a') => {
                if let Some(entity_id) = self.loaded_entity_id() {
                    self.open_form(Form::account(entity_id, None));
                }
                None
            }
            KeyCode::Char('t') => {
                if let Some(entity_id) = self.loaded_entity_id() {
                    self.open_form(Form::task(entity_id, None));
                }
                None
            }
            KeyCode::Char('u') => {
                if let Some(entity_id) = self.loaded_entity_id() {
                    self.open_form(Form::upload(entity_id));
                }
                None
            }
            KeyCode::Char('d') => {
                let target = match self.focus {
                    Focus::List => self.selected_row_id().map(|id| (ResourceKind::Entity, id)),
                    Focus::Detail => self.focused_card(),
                };
                if let Some((kind, id)) = target {
                    self.confirm_delete(kind, id);
                }
                None
            }
            KeyCode::Char('s') if self.focus == Focus::Detail => match self.focused_card() {
                Some((ResourceKind::Document, id)) => Some(Action::Download(id)),
                _ => None,
            },
            KeyCode::Char('v') if self.focus == Focus::Detail => match self.focused_card() {
                Some((ResourceKind::Document, id)) if self.document_has_file(id) => {
                    Some(Action::ViewUrl(id))
                }
                _ => None,
            },
            _ => None,
        }
    }

    /// Run one action against the synchronizer and surface its outcome
    pub async fn apply(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Select(id) => {
                self.card_cursor = 0;
                let _ = self.sync.load_detail(id).await;
            }
            Action::Refresh => {
                self.sync.load_collection().await;
                if let Some(id) = self.sync.view().selected_entity_id {
                    let _ = self.sync.load_detail(id).await;
                }
            }
            Action::Submit(submission) => self.apply_submission(submission).await,
            Action::Delete { kind, id } => {
                // The y/n modal already asked
                let mut confirmed = |_: &str| true;
                self.sync.remove(kind, id, &mut confirmed).await;
            }
            Action::Download(id) => {
                let name = self
                    .sync
                    .view()
                    .loaded_detail
                    .as_ref()
                    .and_then(|d| d.documents.iter().find(|doc| doc.id == id))
                    .map(|doc| doc.download_name())
                    .unwrap_or_else(|| format!("document-{}", id));
                let dest = PathBuf::from(name);
                match self.sync.download_document(id, &dest).await {
                    Ok(bytes) => {
                        self.mode = Mode::Notice(Notice::Info(format!(
                            "Saved {} bytes to {}",
                            bytes,
                            dest.display()
                        )));
                    }
                    // Server failures already left an alert behind
                    Err(err) if self.sync.view().notice.is_none() && !self.sync.view().login_required => {
                        self.mode = Mode::Notice(Notice::Alert(format!("Error saving document: {}", err)));
                    }
                    Err(_) => {}
                }
            }
            Action::ViewUrl(id) => {
                if let Some(url) = self.sync.document_view_url(id) {
                    self.mode = Mode::Notice(Notice::Info(format!("Open in a browser: {}", url)));
                }
            }
            Action::TogglePasswords => self.sync.toggle_reveal_passwords(),
            Action::Logout => {
                if let Err(err) = self.sync.logout() {
                    self.mode = Mode::Notice(Notice::Alert(format!("Logout failed: {}", err)));
                }
            }
        }

        if let Some(notice) = self.sync.take_notice() {
            self.mode = Mode::Notice(notice);
        }
        if self.sync.view().login_required && self.mode == Mode::Browse {
            self.open_form(Form::login());
        }
        self.clamp_selection();
    }

    async fn apply_submission(&mut self, submission: Submission) {
        match submission {
            Submission::Login { username, password } => {
                if !self.sync.login(&username, &password).await {
                    self.open_form(Form::login());
                }
            }
            Submission::Register {
                username,
                password,
                email,
            } => {
                self.sync.register(&username, &password, email).await;
            }
            Submission::Entity(payload) => {
                self.sync.submit_entity_form(payload).await;
            }
            Submission::Record { id, payload } => {
                self.sync.submit(id, payload).await;
            }
            Submission::Upload { entity_id, form } => {
                self.sync.upload_document(entity_id, form).await;
            }
        }
    }
}

pub fn card_targets(view: &DetailView) -> Vec<(ResourceKind, i64)> {
    let kinds = [ResourceKind::Account, ResourceKind::Task, ResourceKind::Document];
    view.sections()
        .into_iter()
        .zip(kinds)
        .flat_map(|(section, kind)| section.cards.iter().map(move |card| (kind, card.id)))
        .collect()
}

pub async fn run_ui<T: Transport>(app: &mut App<T>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

async fn run_app<B: Backend, T: Transport>(terminal: &mut Terminal<B>, app: &mut App<T>) -> Result<()> {
    if !app.sync.view().login_required {
        app.apply(Action::Refresh).await;
    }

    while !app.should_quit {
        terminal.draw(|f| ui(f, app))?;

        let event = tokio::task::spawn_blocking(event::read).await??;
        if let Event::Key(key) = event {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                break;
            }
            if let Some(action) = app.handle_key(key) {
                app.apply(action).await;
            }
        }
    }

    Ok(())
}

pub fn ui<T: Transport>(f: &mut Frame, app: &mut App<T>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // List + detail
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(chunks[1]);

    render_list(f, content[0], app);
    render_detail(f, content[1], app);
    render_status_bar(f, chunks[2], app);

    match &app.mode {
        Mode::Browse => {}
        Mode::Form(form) => render_form(f, form, app.form_error.as_deref()),
        Mode::Confirm { prompt, .. } => render_message(f, " Confirm ", prompt, Color::Yellow),
        Mode::Notice(Notice::Info(text)) => render_message(f, " Info ", text, Color::Green),
        Mode::Notice(Notice::Alert(text)) => render_message(f, " Alert ", text, Color::Red),
    }
}

fn render_header<T: Transport>(f: &mut Frame, area: Rect, app: &App<T>) {
    let view = app.sync.view();
    let user = app.sync.gate().username().unwrap_or("not logged in");

    let spans = vec![
        Span::styled(
            "Entity Tracker",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::styled(format!("Entities: {}", view.list.rows().len()), Style::default().fg(Color::White)),
        Span::raw("  |  "),
        Span::styled(format!("User: {}", user), Style::default().fg(Color::Cyan)),
    ];

    let header = Paragraph::new(vec![Line::from(spans)])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::White)
    }
}

fn render_list<T: Transport>(f: &mut Frame, area: Rect, app: &mut App<T>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(app.focus == Focus::List))
        .title(" Entities ");

    let rows = match &app.sync.view().list {
        ListPane::Loaded(rows) => rows,
        other => {
            let lines: Vec<Line> = other
                .text_lines()
                .into_iter()
                .map(|l| Line::from(Span::styled(l, Style::default().fg(Color::DarkGray))))
                .collect();
            f.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: true }), area);
            return;
        }
    };

    let items: Vec<ListItem> = rows
        .iter()
        .map(|row| {
            let title_style = if row.active {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };
            ListItem::new(vec![
                Line::from(Span::styled(row.title.clone(), title_style)),
                Line::from(Span::styled(row.subtitle.clone(), Style::default().fg(Color::DarkGray))),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("→ ");

    f.render_stateful_widget(list, area, &mut app.list_state);
}

fn tone_style(tone: StatusTone) -> Style {
    let color = match tone {
        StatusTone::Active => Color::Green,
        StatusTone::Inactive => Color::Yellow,
        StatusTone::Other => Color::Red,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

fn render_detail<T: Transport>(f: &mut Frame, area: Rect, app: &App<T>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(app.focus == Focus::Detail))
        .title(" Details ");

    let lines = match &app.sync.view().detail {
        DetailPane::Loaded(view) => {
            let focused = (app.focus == Focus::Detail).then(|| app.focused_card()).flatten();
            detail_lines(view, focused)
        }
        DetailPane::Error(message) => vec![Line::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Red),
        ))],
        DetailPane::Welcome => vec![
            Line::from(""),
            Line::from(Span::styled(
                "  Select an entity and press Enter",
                Style::default().fg(Color::DarkGray),
            )),
        ],
    };

    f.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
}

fn detail_lines(view: &DetailView, focused: Option<(ResourceKind, i64)>) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            view.title.clone(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(view.description.clone()),
    ];

    for fact in &view.facts {
        lines.push(Line::from(vec![
            Span::styled(format!("{}: ", fact.label), Style::default().fg(Color::Yellow)),
            Span::raw(fact.value.clone()),
        ]));
    }
    if let Some(badge) = &view.status {
        lines.push(Line::from(vec![
            Span::styled("Status: ", Style::default().fg(Color::Yellow)),
            Span::styled(badge.label.clone(), tone_style(badge.tone)),
        ]));
    }

    let kinds = [ResourceKind::Account, ResourceKind::Task, ResourceKind::Document];
    for (section, kind) in view.sections().into_iter().zip(kinds) {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            section.title(),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )));

        if section.cards.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("  {}", section.empty_message),
                Style::default().fg(Color::DarkGray),
            )));
        }

        for card in &section.cards {
            let is_focused = focused == Some((kind, card.id));
            let marker = if is_focused { "→ " } else { "  " };
            let title_style = if is_focused {
                Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };

            let mut title = vec![Span::raw(marker), Span::styled(card.title.clone(), title_style)];
            for action in &card.actions {
                let label = match action {
                    CardAction::View => " [v:view]",
                    CardAction::Download => " [s:download]",
                    CardAction::Delete => " [d:delete]",
                };
                title.push(Span::styled(label, Style::default().fg(Color::DarkGray)));
            }
            lines.push(Line::from(title));
            lines.extend(card.lines.iter().map(|l| Line::from(format!("    {}", l))));
        }
    }

    lines
}

fn render_status_bar<T: Transport>(f: &mut Frame, area: Rect, app: &App<T>) {
    let hints: &[(&str, &str)] = match app.focus {
        Focus::List => &[
            ("Enter", "Open"),
            ("n", "New"),
            ("e", "Edit"),
            ("d", "Delete"),
            ("Tab", "Detail"),
        ],
        Focus::Detail => &[
            ("a", "Account"),
            ("t", "Task"),
            ("u", "Upload"),
            ("s", "Save"),
            ("e", "Edit"),
            ("d", "Delete"),
            ("p", "Passwords"),
            ("Tab", "List"),
        ],
    };

    let mut spans = Vec::new();
    for (key, label) in hints {
        spans.push(Span::styled(*key, Style::default().fg(Color::Yellow)));
        spans.push(Span::raw(format!(" {} | ", label)));
    }
    spans.push(Span::styled("r", Style::default().fg(Color::Yellow)));
    spans.push(Span::raw(" Refresh | "));
    spans.push(Span::styled("q", Style::default().fg(Color::Red)));
    spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(vec![Line::from(spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_form(f: &mut Frame, form: &Form, error: Option<&str>) {
    let area = centered(f.size(), 70, form.fields.len() as u16 + 6);

    let mut lines = Vec::new();
    for (i, field) in form.fields.iter().enumerate() {
        let focused = i == form.focus;
        let value = if field.secret {
            "•".repeat(field.value.chars().count())
        } else {
            field.value.clone()
        };
        let label_style = if focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let cursor = if focused { "▏" } else { "" };
        lines.push(Line::from(vec![
            Span::styled(format!("{:>24}: ", field.label), label_style),
            Span::raw(value),
            Span::styled(cursor, Style::default().fg(Color::Yellow)),
        ]));
    }

    lines.push(Line::from(""));
    match error {
        Some(message) => lines.push(Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(Color::Red),
        ))),
        None => {
            let hint = if matches!(form.kind, FormKind::Login | FormKind::Register) {
                "Enter submit | Tab next field | F2 login/register | Esc quit"
            } else {
                "Enter submit | Tab next field | Esc cancel"
            };
            lines.push(Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))));
        }
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ", form.title()));

    f.render_widget(Clear, area);
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_message(f: &mut Frame, title: &str, text: &str, color: Color) {
    let area = centered(f.size(), 60, 5);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(title.to_string());

    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(text.to_string())
            .block(block)
            .wrap(Wrap { trim: true }),
        area,
    );
}
