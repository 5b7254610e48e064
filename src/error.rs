// ⚠️ Client errors
// Every failure the synchronizer can surface, caught at the call site

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level failure (DNS, refused connection, broken body)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx response other than 401
    #[error("server responded {status}: {message}")]
    Status { status: u16, message: String },

    /// 401 from any endpoint; the session is no longer valid
    #[error("unauthorized")]
    Unauthorized,

    /// No token available, the call was never issued
    #[error("login required")]
    LoginRequired,

    /// Client-side required field check
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("session storage: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Server-provided detail worth appending to an alert, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Status { message, .. } if !message.is_empty() => Some(message),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized)
    }
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message_only_for_status_errors() {
        let err = ClientError::Status {
            status: 400,
            message: "title required".to_string(),
        };
        assert_eq!(err.server_message(), Some("title required"));

        let empty = ClientError::Status {
            status: 500,
            message: String::new(),
        };
        assert_eq!(empty.server_message(), None);
        assert_eq!(ClientError::Unauthorized.server_message(), None);
    }

    #[test]
    fn test_unauthorized_detection() {
        assert!(ClientError::Unauthorized.is_unauthorized());
        assert!(!ClientError::LoginRequired.is_unauthorized());
    }
}
