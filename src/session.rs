// 🔐 Session - durable token storage and the authentication gate
//
// LoggedOut --(login success)--> LoggedIn --(logout | 401)--> LoggedOut
//
// Token and username live in a small SQLite key/value table so a restart
// restores the session, the way a browser keeps them in local storage.

use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use tracing::info;

use crate::error::ClientResult;

pub const TOKEN_KEY: &str = "auth_token";
pub const USERNAME_KEY: &str = "username";

// ============================================================================
// SESSION STORE
// ============================================================================

pub struct SessionStore {
    conn: Connection,
}

impl SessionStore {
    pub fn open(path: &Path) -> ClientResult<Self> {
        let conn = Connection::open(path)?;
        Self::setup(conn)
    }

    pub fn in_memory() -> ClientResult<Self> {
        Self::setup(Connection::open_in_memory()?)
    }

    fn setup(conn: Connection) -> ClientResult<Self> {
        // WAL for crash safety; in-memory databases report "memory" instead
        let _mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS session (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )",
            [],
        )?;

        Ok(SessionStore { conn })
    }

    pub fn get(&self, key: &str) -> ClientResult<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM session WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    pub fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        self.conn.execute(
            "INSERT INTO session (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn remove(&self, key: &str) -> ClientResult<()> {
        self.conn
            .execute("DELETE FROM session WHERE key = ?1", params![key])?;
        Ok(())
    }
}

// ============================================================================
// AUTH GATE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    LoggedOut,
    LoggedIn { token: String, username: String },
}

pub struct AuthGate {
    state: AuthState,
    store: SessionStore,
}

impl AuthGate {
    /// Restore `LoggedIn` when both token and username were persisted
    pub fn restore(store: SessionStore) -> ClientResult<Self> {
        let token = store.get(TOKEN_KEY)?;
        let username = store.get(USERNAME_KEY)?;

        let state = match (token, username) {
            (Some(token), Some(username)) if !token.is_empty() => {
                info!(%username, "restored saved session");
                AuthState::LoggedIn { token, username }
            }
            _ => AuthState::LoggedOut,
        };

        Ok(AuthGate { state, store })
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn is_logged_in(&self) -> bool {
        matches!(self.state, AuthState::LoggedIn { .. })
    }

    pub fn token(&self) -> Option<&str> {
        match &self.state {
            AuthState::LoggedIn { token, .. } => Some(token),
            AuthState::LoggedOut => None,
        }
    }

    pub fn username(&self) -> Option<&str> {
        match &self.state {
            AuthState::LoggedIn { username, .. } => Some(username),
            AuthState::LoggedOut => None,
        }
    }

    /// Persist first, then transition, so a storage failure leaves us logged out
    pub fn login_succeeded(&mut self, token: String, username: String) -> ClientResult<()> {
        self.store.set(TOKEN_KEY, &token)?;
        self.store.set(USERNAME_KEY, &username)?;
        info!(%username, "logged in");
        self.state = AuthState::LoggedIn { token, username };
        Ok(())
    }

    /// Used for explicit logout and for any 401 response
    pub fn logout(&mut self) -> ClientResult<()> {
        self.state = AuthState::LoggedOut;
        self.store.remove(TOKEN_KEY)?;
        self.store.remove(USERNAME_KEY)?;
        info!("logged out");
        Ok(())
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }
}
