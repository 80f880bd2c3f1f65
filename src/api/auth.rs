use axum::{Router, extract::State, response::IntoResponse, routing::post};
use serde_json::json;

use super::{ApiJson, AppState, blocking, created, ok};
use crate::auth::AuthUser;
use crate::error::Result;
use crate::models::UserResponse;
use crate::models::user::{LoginRequest, RefreshRequest, RegisterRequest};

async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<impl IntoResponse> {
    let auth = state.auth.clone();
    let user = blocking(move || auth.register(&req)).await?;
    Ok(created(UserResponse::from(user)))
}

async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse> {
    let auth = state.auth.clone();
    let session = blocking(move || auth.login(&req)).await?;
    Ok(ok(session))
}

async fn refresh(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RefreshRequest>,
) -> Result<impl IntoResponse> {
    let session = state.auth.refresh(&req.refresh_token)?;
    Ok(ok(session))
}

async fn logout(
    AuthUser(principal): AuthUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    state.auth.logout(&principal)?;
    Ok(ok(json!({ "logged_out": true })))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
}
