use axum::{
    Router,
    extract::State,
    response::IntoResponse,
    routing::{get, put},
};
use serde_json::json;

use super::{ApiJson, ApiPath, AppState, ok};
use crate::auth::AdminUser;
use crate::error::{AppError, Result};
use crate::models::UserResponse;
use crate::models::user::UpdateRoleRequest;

async fn list_users(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> Result<impl IntoResponse> {
    let users: Vec<UserResponse> = state
        .store
        .list_users()?
        .into_iter()
        .map(UserResponse::from)
        .collect();
    Ok(ok(users))
}

async fn get_user(
    _admin: AdminUser,
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<i64>,
) -> Result<impl IntoResponse> {
    let user = state
        .store
        .find_user(user_id)?
        .ok_or(AppError::UserNotFound { id: user_id })?;
    Ok(ok(UserResponse::from(user)))
}

async fn update_user_role(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<i64>,
    ApiJson(req): ApiJson<UpdateRoleRequest>,
) -> Result<impl IntoResponse> {
    let user = state.auth.set_role(&admin, user_id, req.role)?;
    Ok(ok(UserResponse::from(user)))
}

async fn delete_user(
    AdminUser(admin): AdminUser,
    State(state): State<AppState>,
    ApiPath(user_id): ApiPath<i64>,
) -> Result<impl IntoResponse> {
    let cards = state.auth.delete_user(admin.user_id, user_id)?;
    Ok(ok(json!({
        "id": user_id,
        "deleted": true,
        "flashcards_deleted": cards
    })))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/users", get(list_users))
        .route("/admin/users/{user_id}", get(get_user).delete(delete_user))
        .route("/admin/users/{user_id}/role", put(update_user_role))
}
