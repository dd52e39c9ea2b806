//! Shared helpers for the router integration tests: an in-memory
//! `AccountStore` that mirrors the Postgres defaults and unique
//! constraints, plus app/state builders.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use time::OffsetDateTime;

use accounthub::accounts::repo::{AccountStore, StoreError};
use accounthub::accounts::repo_types::{Account, AccountChanges, NewAccount};
use accounthub::app::build_app;
use accounthub::config::{AppConfig, JwtConfig};
use accounthub::state::AppState;

#[derive(Default)]
struct MemInner {
    next_id: i64,
    rows: HashMap<i64, Account>,
}

#[derive(Default)]
pub struct MemAccountStore {
    inner: Mutex<MemInner>,
}

#[async_trait]
impl AccountStore for MemAccountStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.rows.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.rows.values().find(|a| a.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .rows
            .values()
            .find(|a| a.email.as_deref() == Some(email))
            .cloned())
    }

    async fn insert(&self, account: NewAccount) -> Result<Account, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.rows.values().any(|a| a.username == account.username) {
            return Err(StoreError::DuplicateUsername);
        }
        if let Some(email) = account.email.as_deref() {
            if inner.rows.values().any(|a| a.email.as_deref() == Some(email)) {
                return Err(StoreError::DuplicateEmail);
            }
        }
        inner.next_id += 1;
        let row = Account {
            id: inner.next_id,
            username: account.username,
            email: account.email,
            password_hash: account.password_hash,
            is_verified: false,
            is_active: true,
            is_logged_in: true,
            created_at: OffsetDateTime::now_utc(),
            updated_at: None,
        };
        inner.rows.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_fields(
        &self,
        id: i64,
        changes: AccountChanges,
    ) -> Result<Option<Account>, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.rows.contains_key(&id) {
            return Ok(None);
        }
        if let Some(username) = changes.username.as_deref() {
            if inner
                .rows
                .values()
                .any(|a| a.id != id && a.username == username)
            {
                return Err(StoreError::DuplicateUsername);
            }
        }
        if let Some(email) = changes.email.as_deref() {
            if inner
                .rows
                .values()
                .any(|a| a.id != id && a.email.as_deref() == Some(email))
            {
                return Err(StoreError::DuplicateEmail);
            }
        }
        let row = inner.rows.get_mut(&id).unwrap();
        if let Some(username) = changes.username {
            row.username = username;
        }
        if let Some(email) = changes.email {
            row.email = Some(email);
        }
        if let Some(password_hash) = changes.password_hash {
            row.password_hash = password_hash;
        }
        row.updated_at = Some(OffsetDateTime::now_utc());
        Ok(Some(row.clone()))
    }
}

pub fn test_state() -> AppState {
    let config = Arc::new(AppConfig {
        database_url: "postgres://unused.local/accounthub".into(),
        jwt: JwtConfig {
            secret: "test-secret".into(),
            issuer: "accounthub".into(),
            audience: "accounthub-clients".into(),
            ttl_minutes: 5,
        },
    });
    AppState::from_parts(Arc::new(MemAccountStore::default()), config)
}

pub fn test_app() -> (Router, AppState) {
    let state = test_state();
    (build_app(state.clone()), state)
}
