//! HTTP layer: routes, shared state and the JSON response envelope.
//!
//! Success bodies are `{"success": true, "data": ...}`; failures are
//! rendered by [`AppError`]'s `IntoResponse` impl.

pub mod admin;
pub mod auth;
pub mod flashcards;
pub mod users;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{FromRequest, FromRequestParts},
    http::StatusCode,
    routing::get,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::auth::{AuthService, JwtConfig};
use crate::database::Store;
use crate::error::{AppError, Result};
use crate::models::SchedulerConfig;

/// Shared application state, built once at startup
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub auth: Arc<AuthService>,
    pub scheduler: SchedulerConfig,
}

impl AppState {
    pub fn new(store: Store, jwt: JwtConfig, scheduler: SchedulerConfig) -> Self {
        Self {
            auth: Arc::new(AuthService::new(store.clone(), jwt)),
            store,
            scheduler,
        }
    }
}

/// JSON body extractor whose rejections use the API error envelope
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Path parameters; a malformed id is a validation error
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// Query string; same envelope as [`ApiJson`] on rejection
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

pub fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        success: true,
        data,
    })
}

pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<ApiResponse<T>>) {
    (StatusCode::CREATED, ok(data))
}

/// Runs password hashing and other CPU-heavy work off the async workers
pub(crate) async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal {
            reason: e.to_string(),
        })?
}

async fn health() -> &'static str {
    "ok"
}

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .merge(auth::router())
        .merge(users::router())
        .merge(flashcards::router())
        .merge(admin::router());

    Router::new()
        .route("/healthz", get(health))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
