use tracing::{info, warn};

use crate::accounts::dto::{
    AccountInResponse, AccountUpdateRequest, AccountWithToken, SigninRequest, SignupRequest,
};
use crate::accounts::repo_types::{Account, AccountChanges, NewAccount};
use crate::auth::jwt::JwtKeys;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::policy::ensure_owner;
use crate::error::ApiError;
use crate::state::AppState;

pub async fn signup(state: &AppState, req: SignupRequest) -> Result<AccountInResponse, ApiError> {
    // Pre-checks give the username/email error precedence; the store's
    // unique constraints remain the authoritative check under races.
    if state.store.find_by_username(&req.username).await?.is_some() {
        warn!(username = %req.username, "signup username already taken");
        return Err(ApiError::DuplicateUsername);
    }
    if state.store.find_by_email(&req.email).await?.is_some() {
        warn!("signup email already registered");
        return Err(ApiError::DuplicateEmail);
    }

    let password_hash = hash_blocking(req.password).await?;

    let account = state
        .store
        .insert(NewAccount {
            username: req.username,
            email: Some(req.email),
            password_hash,
        })
        .await?;

    info!(account_id = account.id, username = %account.username, "account created");
    authorized_response(state, account)
}

pub async fn signin(state: &AppState, req: SigninRequest) -> Result<AccountInResponse, ApiError> {
    let account = match (req.username.as_deref(), req.email.as_deref()) {
        (Some(username), email) => {
            let account = state
                .store
                .find_by_username(username)
                .await?
                .ok_or_else(|| {
                    warn!(username = %username, "signin unknown username");
                    ApiError::InvalidCredentials
                })?;
            // Both identifiers must name the same account.
            if let Some(email) = email {
                if account.email.as_deref() != Some(email) {
                    warn!(account_id = account.id, "signin email does not match username");
                    return Err(ApiError::InvalidCredentials);
                }
            }
            account
        }
        (None, Some(email)) => state.store.find_by_email(email).await?.ok_or_else(|| {
            warn!("signin unknown email");
            ApiError::InvalidCredentials
        })?,
        (None, None) => return Err(ApiError::InvalidCredentials),
    };

    let hash = account.password_hash.clone();
    if !verify_blocking(req.password, hash).await? {
        warn!(account_id = account.id, "signin invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    info!(account_id = account.id, username = %account.username, "signin succeeded");
    authorized_response(state, account)
}

pub async fn get_account(
    state: &AppState,
    principal: &Account,
    id: i64,
) -> Result<AccountInResponse, ApiError> {
    ensure_owner(principal, id)?;

    // Defensive: the principal was just resolved, so the row should exist.
    let account = state
        .store
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound(id))?;

    authorized_response(state, account)
}

pub async fn update_account(
    state: &AppState,
    principal: &Account,
    id: i64,
    req: AccountUpdateRequest,
) -> Result<AccountInResponse, ApiError> {
    ensure_owner(principal, id)?;

    let password_hash = match req.password {
        Some(password) => Some(hash_blocking(password).await?),
        None => None,
    };

    let account = state
        .store
        .update_fields(
            id,
            AccountChanges {
                username: req.username,
                email: req.email,
                password_hash,
            },
        )
        .await?
        .ok_or(ApiError::NotFound(id))?;

    info!(account_id = account.id, "account updated");
    authorized_response(state, account)
}

/// Assemble the account summary with a freshly issued token. Reads
/// re-issue too; that keeps tokens short-lived across long client
/// sessions.
fn authorized_response(state: &AppState, account: Account) -> Result<AccountInResponse, ApiError> {
    let keys = JwtKeys::new(&state.config.jwt);
    let token = keys.issue(&account)?;
    Ok(AccountInResponse {
        id: account.id,
        authorized_account: AccountWithToken {
            token,
            username: account.username,
            email: account.email,
            is_verified: account.is_verified,
            is_active: account.is_active,
            is_logged_in: account.is_logged_in,
            created_at: account.created_at,
            updated_at: account.updated_at,
        },
    })
}

// Argon2 is CPU-bound; keep it off the request executor.

async fn hash_blocking(password: String) -> Result<String, ApiError> {
    let hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| anyhow::anyhow!("hashing task failed: {e}"))??;
    Ok(hash)
}

async fn verify_blocking(password: String, hash: String) -> Result<bool, ApiError> {
    let ok = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| anyhow::anyhow!("verification task failed: {e}"))?;
    Ok(ok)
}
