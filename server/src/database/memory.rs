use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use cc_shared::types::AccessLevel;

use super::accounts::{Account, AccountStore, NewAccount, StoreError};

/// Process-local account store; used by tests and throwaway dev runs.
#[derive(Debug, Default)]
pub struct MemoryAccountStore {
    inner: RwLock<Accounts>,
}

#[derive(Debug, Default)]
struct Accounts {
    next_id: i64,
    by_id: HashMap<i64, Account>,
}

impl Accounts {
    fn push(&mut self, new: NewAccount) -> Result<Account, StoreError> {
        let email = new.email.to_lowercase();
        if self.by_id.values().any(|a| a.email == email) {
            return Err(StoreError::DuplicateEmail);
        }

        self.next_id += 1;
        let account = Account {
            id: self.next_id,
            email,
            password_hash: new.password_hash,
            access_level: new.access_level,
            verified: false,
            change_password_requested: false,
        };
        self.by_id.insert(account.id, account.clone());
        Ok(account)
    }
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully-formed row, bypassing registration. Handy for seeding
    /// verified or privileged accounts in tests.
    pub async fn insert(&self, mut account: Account) -> Account {
        let mut accounts = self.inner.write().await;
        accounts.next_id = accounts.next_id.max(account.id);
        account.email = account.email.to_lowercase();
        accounts.by_id.insert(account.id, account.clone());
        account
    }

    async fn update(&self, id: i64, f: impl FnOnce(&mut Account) + Send) {
        if let Some(account) = self.inner.write().await.by_id.get_mut(&id) {
            f(account);
        }
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn get_by_id(&self, id: i64) -> Result<Option<Account>, StoreError> {
        Ok(self.inner.read().await.by_id.get(&id).cloned())
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let email = email.to_lowercase();
        Ok(self
            .inner
            .read()
            .await
            .by_id
            .values()
            .find(|a| a.email == email)
            .cloned())
    }

    async fn count(&self) -> Result<i64, StoreError> {
        Ok(self.inner.read().await.by_id.len() as i64)
    }

    async fn create(&self, new: NewAccount) -> Result<Account, StoreError> {
        let mut accounts = self.inner.write().await;
        accounts.push(new)
    }

    async fn create_bootstrapping(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<Account, StoreError> {
        let mut accounts = self.inner.write().await;
        let access_level = if accounts.by_id.is_empty() {
            AccessLevel::ADMIN
        } else {
            AccessLevel::USER
        };
        accounts.push(NewAccount {
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            access_level,
        })
    }

    async fn set_access_level(&self, id: i64, level: AccessLevel) -> Result<(), StoreError> {
        self.update(id, |a| a.access_level = level).await;
        Ok(())
    }

    async fn set_verified(&self, id: i64) -> Result<(), StoreError> {
        self.update(id, |a| a.verified = true).await;
        Ok(())
    }

    async fn set_password(&self, id: i64, password_hash: &str) -> Result<(), StoreError> {
        let hash = password_hash.to_string();
        self.update(id, move |a| {
            a.password_hash = hash;
            a.change_password_requested = false;
        })
        .await;
        Ok(())
    }

    async fn set_change_password_requested(
        &self,
        id: i64,
        requested: bool,
    ) -> Result<(), StoreError> {
        self.update(id, |a| a.change_password_requested = requested)
            .await;
        Ok(())
    }
}
