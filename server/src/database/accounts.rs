use async_trait::async_trait;
use thiserror::Error;

use cc_shared::types::{AccessLevel, AccountSummary};

/// A stored account row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: i64,
    /// Always lowercase.
    pub email: String,
    pub password_hash: String,
    pub access_level: AccessLevel,
    pub verified: bool,
    /// Set while a reset link is outstanding; cleared by `set_password`.
    pub change_password_requested: bool,
}

/// Data required to INSERT a new account row.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password_hash: String,
    pub access_level: AccessLevel,
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("email address already in use")]
    DuplicateEmail,

    #[error("stored access level is invalid: {0}")]
    CorruptAccessLevel(i32),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Account {
    pub fn summary(&self) -> AccountSummary {
        AccountSummary {
            id: self.id,
            email: self.email.clone(),
            access_level: self.access_level,
            verified: self.verified,
        }
    }
}

/// The persistence operations the auth core relies on.
///
/// Lookups return `Ok(None)` on a miss; mutations on a missing id are a
/// silent no-op, matching an `UPDATE ... WHERE id = ?` that touches no row.
/// Callers pass emails already lowercased.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn get_by_id(&self, id: i64) -> Result<Option<Account>, StoreError>;

    async fn get_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    async fn count(&self) -> Result<i64, StoreError>;

    /// Insert a new, unverified account. Fails with
    /// [`StoreError::DuplicateEmail`] when the email is taken.
    async fn create(&self, account: NewAccount) -> Result<Account, StoreError>;

    /// Insert a new, unverified account whose level is decided in the same
    /// write: Admin when the store is empty, User otherwise. At most one
    /// account is ever created as Admin this way.
    async fn create_bootstrapping(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<Account, StoreError>;

    async fn set_access_level(&self, id: i64, level: AccessLevel) -> Result<(), StoreError>;

    async fn set_verified(&self, id: i64) -> Result<(), StoreError>;

    /// Replace the password hash and clear `change_password_requested` in the
    /// same write.
    async fn set_password(&self, id: i64, password_hash: &str) -> Result<(), StoreError>;

    async fn set_change_password_requested(
        &self,
        id: i64,
        requested: bool,
    ) -> Result<(), StoreError>;
}
