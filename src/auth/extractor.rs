use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;

use crate::accounts::repo_types::Account;
use crate::auth::jwt::JwtKeys;
use crate::error::ApiError;
use crate::state::AppState;

/// The account resolved from a validated bearer token; lives for one
/// request. Any identity failure (missing header, bad token, stale
/// subject) collapses to `Unauthenticated` so callers cannot probe
/// whether an account id exists.
pub struct CurrentAccount(pub Account);

#[async_trait]
impl FromRequestParts<AppState> for CurrentAccount {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or(ApiError::Unauthenticated)?;

        // Expect "Bearer <token>"
        let token = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            .ok_or(ApiError::Unauthenticated)?;

        let keys = JwtKeys::from_ref(state);
        let decoded = keys.decode(token).map_err(|e| {
            warn!(error = %e, "token rejected");
            ApiError::Unauthenticated
        })?;

        // A token that outlived its account is indistinguishable from a
        // bad token. Store failure is infrastructure, not identity.
        let account = state
            .store
            .find_by_id(decoded.account_id)
            .await
            .map_err(ApiError::from)?
            .ok_or_else(|| {
                warn!(account_id = decoded.account_id, "token subject no longer exists");
                ApiError::Unauthenticated
            })?;

        Ok(CurrentAccount(account))
    }
}
