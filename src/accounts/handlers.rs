use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use crate::accounts::dto::{
    AccountInResponse, AccountUpdateRequest, SigninRequest, SignupRequest,
};
use crate::accounts::services;
use crate::auth::extractor::CurrentAccount;
use crate::error::ApiError;
use crate::state::AppState;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/signin", post(signin))
}

pub fn account_routes() -> Router<AppState> {
    Router::new().route("/accounts/:id", get(get_account).patch(update_account))
}

#[instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AccountInResponse>), ApiError> {
    let response = services::signup(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[instrument(skip(state, payload))]
pub async fn signin(
    State(state): State<AppState>,
    Json(payload): Json<SigninRequest>,
) -> Result<(StatusCode, Json<AccountInResponse>), ApiError> {
    let response = services::signin(&state, payload).await?;
    Ok((StatusCode::ACCEPTED, Json(response)))
}

#[instrument(skip(state, principal))]
pub async fn get_account(
    State(state): State<AppState>,
    CurrentAccount(principal): CurrentAccount,
    Path(id): Path<i64>,
) -> Result<Json<AccountInResponse>, ApiError> {
    let response = services::get_account(&state, &principal, id).await?;
    Ok(Json(response))
}

#[instrument(skip(state, principal, payload))]
pub async fn update_account(
    State(state): State<AppState>,
    CurrentAccount(principal): CurrentAccount,
    Path(id): Path<i64>,
    Json(payload): Json<AccountUpdateRequest>,
) -> Result<Json<AccountInResponse>, ApiError> {
    let response = services::update_account(&state, &principal, id, payload).await?;
    Ok(Json(response))
}
