use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::{debug, info};

use cc_shared::types::AccessLevel;

use super::accounts::{Account, AccountStore, NewAccount, StoreError};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS accounts (
        id                        INTEGER PRIMARY KEY AUTOINCREMENT,
        email                     TEXT    NOT NULL UNIQUE,
        password_hash             TEXT    NOT NULL,
        access_level              INTEGER NOT NULL,
        verified                  INTEGER NOT NULL DEFAULT 0,
        change_password_requested INTEGER NOT NULL DEFAULT 0
    )";

const SELECT_ACCOUNT: &str = "
    SELECT id, email, password_hash, access_level, verified, change_password_requested
    FROM accounts";

/// `AccountStore` backed by an sqlx SQLite pool.
#[derive(Debug, Clone)]
pub struct SqliteAccountStore {
    pool: SqlitePool,
}

#[derive(Debug, sqlx::FromRow)]
struct AccountRow {
    id: i64,
    email: String,
    password_hash: String,
    access_level: i32,
    verified: bool,
    change_password_requested: bool,
}

impl TryFrom<AccountRow> for Account {
    type Error = StoreError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let access_level = AccessLevel::try_from(row.access_level)
            .map_err(|e| StoreError::CorruptAccessLevel(e.0))?;
        Ok(Account {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            access_level,
            verified: row.verified,
            change_password_requested: row.change_password_requested,
        })
    }
}

impl SqliteAccountStore {
    /// Open a pool on `url` and make sure the accounts table exists.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, StoreError> {
        info!("Opening account store");
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await?;
        let store = Self::from_pool(pool);
        store.ensure_schema().await?;
        Ok(store)
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Idempotent; safe to run on every start.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(SCHEMA).execute(&self.pool).await?;
        debug!("accounts table ready");
        Ok(())
    }
}

fn into_account(row: Option<AccountRow>) -> Result<Option<Account>, StoreError> {
    row.map(Account::try_from).transpose()
}

fn insert_error(e: sqlx::Error) -> StoreError {
    match e {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::DuplicateEmail,
        other => StoreError::Database(other),
    }
}

#[async_trait]
impl AccountStore for SqliteAccountStore {
    async fn get_by_id(&self, id: i64) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!("{SELECT_ACCOUNT} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        into_account(row)
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let row =
            sqlx::query_as::<_, AccountRow>(&format!("{SELECT_ACCOUNT} WHERE email = ?1"))
                .bind(email.to_lowercase())
                .fetch_optional(&self.pool)
                .await?;
        into_account(row)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM accounts")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn create(&self, new: NewAccount) -> Result<Account, StoreError> {
        let email = new.email.to_lowercase();
        let result = sqlx::query(
            "INSERT INTO accounts (email, password_hash, access_level) VALUES (?1, ?2, ?3)",
        )
        .bind(&email)
        .bind(&new.password_hash)
        .bind(new.access_level.value())
        .execute(&self.pool)
        .await
        .map_err(insert_error)?;

        info!("New account stored! {}", email);

        Ok(Account {
            id: result.last_insert_rowid(),
            email,
            password_hash: new.password_hash,
            access_level: new.access_level,
            verified: false,
            change_password_requested: false,
        })
    }

    async fn create_bootstrapping(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<Account, StoreError> {
        // The emptiness check and the insert are one statement.
        let row = sqlx::query_as::<_, AccountRow>(
            "INSERT INTO accounts (email, password_hash, access_level)
             SELECT ?1, ?2, CASE WHEN EXISTS (SELECT 1 FROM accounts) THEN ?3 ELSE ?4 END
             RETURNING id, email, password_hash, access_level, verified, change_password_requested",
        )
        .bind(email.to_lowercase())
        .bind(password_hash)
        .bind(AccessLevel::USER.value())
        .bind(AccessLevel::ADMIN.value())
        .fetch_one(&self.pool)
        .await
        .map_err(insert_error)?;

        let account = Account::try_from(row)?;
        info!("New account stored! {} level:{}", account.email, account.access_level);
        Ok(account)
    }

    async fn set_access_level(&self, id: i64, level: AccessLevel) -> Result<(), StoreError> {
        sqlx::query("UPDATE accounts SET access_level = ?1 WHERE id = ?2")
            .bind(level.value())
            .bind(id)
            .execute(&self.pool)
            .await?;
        info!("Access level updated! user:{} level:{}", id, level);
        Ok(())
    }

    async fn set_verified(&self, id: i64) -> Result<(), StoreError> {
        sqlx::query("UPDATE accounts SET verified = 1 WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn set_password(&self, id: i64, password_hash: &str) -> Result<(), StoreError> {
        sqlx::query(
            "UPDATE accounts SET password_hash = ?1, change_password_requested = 0 WHERE id = ?2",
        )
        .bind(password_hash)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn set_change_password_requested(
        &self,
        id: i64,
        requested: bool,
    ) -> Result<(), StoreError> {
        sqlx::query("UPDATE accounts SET change_password_requested = ?1 WHERE id = ?2")
            .bind(requested)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
