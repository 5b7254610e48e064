// ⚙️ Configuration - environment variables with defaults

use std::env;
use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_SESSION_DB: &str = "entity_tracker_session.db";
pub const DEFAULT_EMPTY_MESSAGE: &str = "No entities yet. Create one!";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the REST API, including the `/api` prefix
    pub api_url: String,

    /// SQLite file holding the durable session (token + username)
    pub session_path: PathBuf,

    /// Message shown when the entity collection is empty
    pub empty_message: String,

    /// Emit logs as JSON lines instead of the human format
    pub log_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: DEFAULT_API_URL.to_string(),
            session_path: PathBuf::from(DEFAULT_SESSION_DB),
            empty_message: DEFAULT_EMPTY_MESSAGE.to_string(),
            log_json: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from an arbitrary variable source; blank values fall back to defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Config {
            api_url: non_empty("ENTITY_TRACKER_API_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_url),
            session_path: non_empty("ENTITY_TRACKER_SESSION_DB")
                .map(PathBuf::from)
                .unwrap_or(defaults.session_path),
            empty_message: non_empty("ENTITY_TRACKER_EMPTY_MESSAGE")
                .unwrap_or(defaults.empty_message),
            log_json: parse_bool(lookup("ENTITY_TRACKER_LOG_JSON").as_deref(), defaults.log_json),
        }
    }
}

fn parse_bool(value: Option<&str>, default: bool) -> bool {
    value
        .and_then(|v| match v {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}
