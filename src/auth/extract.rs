use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use super::service::{ADMIN_CHAIN, Principal, USER_CHAIN};
use crate::api::AppState;
use crate::error::AppError;

/// Any authenticated caller
#[derive(Debug, Clone, Copy)]
pub struct AuthUser(pub Principal);

/// An authenticated caller holding the admin role
#[derive(Debug, Clone, Copy)]
pub struct AdminUser(pub Principal);

/// Token from an `Authorization: Bearer <token>` header
fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        state
            .auth
            .authorize(bearer_token(parts), USER_CHAIN)
            .map(AuthUser)
    }
}

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        state
            .auth
            .authorize(bearer_token(parts), ADMIN_CHAIN)
            .map(AdminUser)
    }
}
