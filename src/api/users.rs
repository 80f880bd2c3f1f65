use axum::{
    Router,
    extract::State,
    response::IntoResponse,
    routing::{get, put},
};

use super::{ApiJson, AppState, blocking, ok};
use crate::auth::AuthUser;
use crate::error::{AppError, Result};
use crate::models::UserResponse;
use crate::models::user::{ChangePasswordRequest, UpdateProfileRequest};

async fn me(AuthUser(principal): AuthUser, State(state): State<AppState>) -> Result<impl IntoResponse> {
    let user = state
        .store
        .find_user(principal.user_id)?
        .ok_or(AppError::Unauthorized)?;
    Ok(ok(UserResponse::from(user)))
}

async fn update_me(
    AuthUser(principal): AuthUser,
    State(state): State<AppState>,
    ApiJson(req): ApiJson<UpdateProfileRequest>,
) -> Result<impl IntoResponse> {
    let user = state.auth.update_email(&principal, &req)?;
    Ok(ok(UserResponse::from(user)))
}

async fn change_password(
    AuthUser(principal): AuthUser,
    State(state): State<AppState>,
    ApiJson(req): ApiJson<ChangePasswordRequest>,
) -> Result<impl IntoResponse> {
    let auth = state.auth.clone();
    let session = blocking(move || auth.change_password(&principal, &req)).await?;
    Ok(ok(session))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users/me", get(me).put(update_me))
        .route("/users/me/password", put(change_password))
}
