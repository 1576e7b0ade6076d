#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use http::header::{AUTHORIZATION, HeaderMap, HeaderValue};

use cc_server::AppState;
use cc_server::auth::password::hash_password;
use cc_server::auth::{AuthSettings, TokenIssuer, TokenKeys};
use cc_server::database::{Account, MemoryAccountStore};
use cc_server::notifier::{Mail, Notifier, NotifyError};
use cc_shared::types::AccessLevel;

pub const SESSION_SECRET: &str = "session-secret-0123456789abcdefghijkl";
pub const VERIFY_SECRET: &str = "verify-secret-0123456789abcdefghijklm";
pub const RESET_SECRET: &str = "reset-secret-0123456789abcdefghijklmn";
pub const PASSWORD: &str = "correct-horse";

pub fn settings() -> AuthSettings {
    AuthSettings::new(
        "cc-admin",
        6 * 3600,
        "localhost:3000",
        SESSION_SECRET,
        VERIFY_SECRET,
        RESET_SECRET,
    )
}

/// Keeps every mail it is asked to send.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Mail>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<Mail> {
        self.sent.lock().unwrap().clone()
    }

    /// Token at the end of the most recent mail's link.
    pub fn last_token(&self) -> String {
        let sent = self.sent.lock().unwrap();
        let mail = sent.last().expect("no mail sent");
        mail.body.rsplit('/').next().unwrap().to_string()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, mail: Mail) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(mail);
        Ok(())
    }
}

/// Always fails to deliver.
#[derive(Debug, Default)]
pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn send(&self, _mail: Mail) -> Result<(), NotifyError> {
        Err(NotifyError::Delivery("smtp unreachable".into()))
    }
}

pub struct Harness {
    pub state: AppState,
    pub store: Arc<MemoryAccountStore>,
    pub notifier: Arc<RecordingNotifier>,
    /// Signs with the same secrets as `state`; used to mint tokens at a
    /// chosen time.
    pub issuer: TokenIssuer,
}

impl Harness {
    pub fn new() -> Self {
        let store = Arc::new(MemoryAccountStore::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let state = AppState::new(settings(), store.clone(), notifier.clone());
        let keys = Arc::new(TokenKeys::from_settings(&settings()));
        Self {
            state,
            store,
            notifier,
            issuer: TokenIssuer::new(keys, &settings()),
        }
    }

    /// Insert a verified account without a usable password.
    pub async fn seed(&self, id: i64, access_level: AccessLevel) -> Account {
        self.store
            .insert(Account {
                id,
                email: format!("user{id}@example.com"),
                password_hash: String::new(),
                access_level,
                verified: true,
                change_password_requested: false,
            })
            .await
    }

    /// Insert an account whose password is [`PASSWORD`].
    pub async fn seed_with_password(&self, id: i64, verified: bool) -> Account {
        self.store
            .insert(Account {
                id,
                email: format!("user{id}@example.com"),
                password_hash: hash_password(PASSWORD).unwrap(),
                access_level: AccessLevel::USER,
                verified,
                change_password_requested: false,
            })
            .await
    }

    pub fn session_for(&self, account: &Account) -> String {
        self.issuer.issue_session(account).unwrap()
    }
}

pub fn bearer(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
    );
    headers
}
