// 💳 Account - a financial or service account owned by one entity
//
// Accounts may carry portal credentials (username/password/url). The server
// owns how those are stored; the client only masks the password on screen.

use serde::{Deserialize, Serialize};

use super::null_as_default;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,

    /// Owning entity (echoed by the server, absent in some payloads)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<i64>,

    pub account_name: String,

    #[serde(default)]
    pub account_number: Option<String>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub balance: f64,

    /// checking, savings, credit, ...
    #[serde(default)]
    pub account_type: Option<String>,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    #[serde(default)]
    pub account_url: Option<String>,

    #[serde(default)]
    pub notes: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Account {
    /// Password as it should appear on screen
    pub fn display_password(&self, reveal: bool) -> Option<String> {
        self.password.as_deref().map(|p| {
            if reveal {
                p.to_string()
            } else {
                mask_secret(p)
            }
        })
    }

    pub fn has_credentials(&self) -> bool {
        self.username.is_some() || self.password.is_some() || self.account_url.is_some()
    }
}

/// One bullet per character, capped so long secrets don't leak their length
pub fn mask_secret(secret: &str) -> String {
    "•".repeat(secret.chars().count().min(8))
}

/// Body of `POST /entities/{id}/accounts` and `PUT /accounts/{id}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountPayload {
    pub account_name: String,
    pub account_number: Option<String>,
    pub balance: f64,
    pub account_type: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub account_url: Option<String>,
    pub notes: Option<String>,
}

impl AccountPayload {
    pub fn new(account_name: impl Into<String>) -> Self {
        AccountPayload {
            account_name: account_name.into(),
            ..Default::default()
        }
    }

    pub fn from_account(account: &Account) -> Self {
        AccountPayload {
            account_name: account.account_name.clone(),
            account_number: account.account_number.clone(),
            balance: account.balance,
            account_type: account.account_type.clone(),
            username: account.username.clone(),
            password: account.password.clone(),
            account_url: account.account_url.clone(),
            notes: account.notes.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_account(password: Option<&str>) -> Account {
        Account {
            id: 1,
            entity_id: Some(7),
            account_name: "Main Checking".to_string(),
            account_number: Some("CHK001".to_string()),
            balance: 50000.0,
            account_type: Some("checking".to_string()),
            username: Some("acme-ops".to_string()),
            password: password.map(str::to_string),
            account_url: None,
            notes: None,
            created_at: None,
        }
    }

    #[test]
    fn test_account_decodes_server_shape() {
        let account: Account = serde_json::from_str(
            r#"{"id": 4, "entity_id": 2, "account_name": "Payroll", "account_number": null,
                "balance": 1250.5, "account_type": "checking", "created_at": "2024-03-01T00:00:00"}"#,
        )
        .unwrap();

        assert_eq!(account.account_name, "Payroll");
        assert_eq!(account.balance, 1250.5);
        assert_eq!(account.entity_id, Some(2));
        assert!(!account.has_credentials());
    }

    #[test]
    fn test_missing_balance_is_zero() {
        let account: Account =
            serde_json::from_str(r#"{"id": 4, "account_name": "Petty cash"}"#).unwrap();
        assert_eq!(account.balance, 0.0);
    }

    #[test]
    fn test_password_masked_unless_revealed() {
        let account = create_test_account(Some("hunter2"));
        assert_eq!(account.display_password(false).unwrap(), "•••••••");
        assert_eq!(account.display_password(true).unwrap(), "hunter2");
        assert!(account.has_credentials());

        let no_password = create_test_account(None);
        assert_eq!(no_password.display_password(false), None);
    }

    #[test]
    fn test_mask_caps_length() {
        assert_eq!(mask_secret("a-very-long-secret-value").chars().count(), 8);
        assert_eq!(mask_secret(""), "");
    }

    #[test]
    fn test_payload_from_account() {
        let payload = AccountPayload::from_account(&create_test_account(Some("pw")));
        assert_eq!(payload.account_name, "Main Checking");
        assert_eq!(payload.balance, 50000.0);
        assert_eq!(payload.password.as_deref(), Some("pw"));
    }
}
