use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;

use crate::accounts::repo_types::{Account, AccountChanges, NewAccount};
use crate::error::ApiError;

/// Store failures the lifecycle layer cares about. Uniqueness violations
/// are surfaced as typed variants so the constraint stays the authoritative
/// duplicate check even when a pre-check passed.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("username is already taken")]
    DuplicateUsername,

    #[error("email is already registered")]
    DuplicateEmail,

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateUsername => ApiError::DuplicateUsername,
            StoreError::DuplicateEmail => ApiError::DuplicateEmail,
            StoreError::Backend(e) => ApiError::Internal(e),
        }
    }
}

/// Capability set the lifecycle layer needs from any storage backend.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, StoreError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;
    async fn insert(&self, account: NewAccount) -> Result<Account, StoreError>;
    async fn update_fields(
        &self,
        id: i64,
        changes: AccountChanges,
    ) -> Result<Option<Account>, StoreError>;
}

pub struct PgAccountStore {
    db: PgPool,
}

impl PgAccountStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

fn map_sqlx(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        // 23505 = unique_violation; the index name says which invariant broke.
        if db_err.code().as_deref() == Some("23505") {
            match db_err.constraint() {
                Some(c) if c.contains("username") => return StoreError::DuplicateUsername,
                Some(c) if c.contains("email") => return StoreError::DuplicateEmail,
                _ => {}
            }
        }
    }
    StoreError::Backend(err.into())
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, StoreError> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, username, email, password_hash,
                   is_verified, is_active, is_logged_in, created_at, updated_at
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .map_err(map_sqlx)?;
        Ok(account)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, username, email, password_hash,
                   is_verified, is_active, is_logged_in, created_at, updated_at
            FROM accounts
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await
        .map_err(map_sqlx)?;
        Ok(account)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            SELECT id, username, email, password_hash,
                   is_verified, is_active, is_logged_in, created_at, updated_at
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .map_err(map_sqlx)?;
        Ok(account)
    }

    async fn insert(&self, account: NewAccount) -> Result<Account, StoreError> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (username, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, password_hash,
                      is_verified, is_active, is_logged_in, created_at, updated_at
            "#,
        )
        .bind(account.username)
        .bind(account.email)
        .bind(account.password_hash)
        .fetch_one(&self.db)
        .await
        .map_err(map_sqlx)?;
        Ok(account)
    }

    // Single statement, so a request abandoned mid-flight either wrote the
    // whole change or nothing.
    async fn update_fields(
        &self,
        id: i64,
        changes: AccountChanges,
    ) -> Result<Option<Account>, StoreError> {
        let account = sqlx::query_as::<_, Account>(
            r#"
            UPDATE accounts
            SET username      = COALESCE($2, username),
                email         = COALESCE($3, email),
                password_hash = COALESCE($4, password_hash),
                updated_at    = now()
            WHERE id = $1
            RETURNING id, username, email, password_hash,
                      is_verified, is_active, is_logged_in, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(changes.username)
        .bind(changes.email)
        .bind(changes.password_hash)
        .fetch_optional(&self.db)
        .await
        .map_err(map_sqlx)?;
        Ok(account)
    }
}
