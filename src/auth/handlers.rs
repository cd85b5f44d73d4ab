use axum::{
    extract::{rejection::JsonRejection, FromRef, State},
    routing::post,
    Json, Router,
};
use tracing::instrument;

use super::dto::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use super::jwt::JwtKeys;
use super::services;
use crate::{
    error::{invalid_endpoint, AppResult},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register).fallback(invalid_endpoint))
        .route("/auth/login", post(login).fallback(invalid_endpoint))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AppResult<Json<RegisterResponse>> {
    let Json(payload) = payload?;
    services::register(state.store.as_ref(), payload).await?;
    Ok(Json(RegisterResponse {
        success: true,
        message: "User registered",
    }))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<LoginResponse>> {
    let Json(payload) = payload?;
    let keys = JwtKeys::from_ref(&state);
    let token = services::login(state.store.as_ref(), &keys, payload).await?;
    Ok(Json(LoginResponse {
        success: true,
        token,
    }))
}
