//! Error type shared by the store, the auth service and the HTTP layer.
//!
//! Every variant maps to a stable error code and an HTTP status; the
//! `IntoResponse` impl renders the `{success: false, error, message}`
//! envelope. Internal causes are logged and never sent to the client.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

pub type Result<T, E = AppError> = std::result::Result<T, E>;

/// One rejected request field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error("Missing, invalid or expired token")]
    Unauthorized,

    #[error("Admin rights required")]
    Forbidden,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Email already registered: {email}")]
    DuplicateEmail { email: String },

    #[error("User not found: {id}")]
    UserNotFound { id: i64 },

    #[error("Flashcard not found: {id}")]
    FlashcardNotFound { id: i64 },

    #[error("Cannot delete your own account")]
    CannotDeleteSelf,

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Password hashing failed: {reason}")]
    PasswordHash { reason: String },

    #[error("Token encoding failed: {0}")]
    TokenEncoding(#[source] jsonwebtoken::errors::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal error: {reason}")]
    Internal { reason: String },
}

impl AppError {
    /// Shorthand for a validation failure on a single field.
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Validation(vec![FieldError::new(field, message)])
    }

    /// Stable machine-readable code sent to clients.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) | AppError::MalformedBody(_) => "VALIDATION_ERROR",
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Forbidden => "FORBIDDEN",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::DuplicateEmail { .. } => "DUPLICATE_EMAIL",
            AppError::UserNotFound { .. } => "USER_NOT_FOUND",
            AppError::FlashcardNotFound { .. } => "FLASHCARD_NOT_FOUND",
            AppError::CannotDeleteSelf => "CANNOT_DELETE_SELF",
            AppError::Database(_)
            | AppError::PasswordHash { .. }
            | AppError::TokenEncoding(_)
            | AppError::Io(_)
            | AppError::Json(_)
            | AppError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::MalformedBody(_) | AppError::CannotDeleteSelf => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unauthorized | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::UserNotFound { .. } | AppError::FlashcardNotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            AppError::DuplicateEmail { .. } => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn is_internal(&self) -> bool {
        self.status() == StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::MalformedBody(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::MalformedBody(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::MalformedBody(rejection.body_text())
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    success: bool,
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields: Option<&'a [FieldError]>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = if self.is_internal() {
            tracing::error!(error = %self, "request failed");
            "Internal server error".to_string()
        } else {
            tracing::debug!(code = self.code(), error = %self, "request rejected");
            self.to_string()
        };

        let fields = match &self {
            AppError::Validation(fields) => Some(fields.as_slice()),
            _ => None,
        };

        let body = ErrorBody {
            success: false,
            error: self.code(),
            message,
            fields,
        };
        (self.status(), Json(body)).into_response()
    }
}
