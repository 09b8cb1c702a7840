//! Centralized error handling.
//!
//! One error type for the whole service. Lifecycle failures
//! (`InvalidEmailFormat`, `UserAlreadyExists`, `UserDoesNotExist`) are client
//! errors. Anything coming out of storage is fatal and never retried.

use axum::{
    http::{header::WWW_AUTHENTICATE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // User lifecycle
    #[error("Invalid email format")]
    InvalidEmailFormat,

    #[error("User already exists")]
    UserAlreadyExists,

    #[error("User does not exist")]
    UserDoesNotExist,

    // Precondition failures on caller input
    #[error("{0}")]
    Validation(String),

    // Authentication & Authorization
    #[error("Incorrect username or password")]
    InvalidCredentials,

    #[error("Could not validate credentials")]
    Unauthorized,

    #[error("Not enough permissions")]
    InsufficientScope,

    #[error("Inactive user")]
    InactiveUser,

    // External service errors
    #[error("Database error")]
    Database(#[from] DbErr),

    #[error("Token error")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    // Internal
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal server error")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

impl AppError {
    /// Get error code for client
    pub fn code(&self) -> &'static str {
        match self {
            AppError::InvalidEmailFormat => "INVALID_EMAIL_FORMAT",
            AppError::UserAlreadyExists => "USER_ALREADY_EXISTS",
            AppError::UserDoesNotExist => "USER_DOES_NOT_EXIST",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::InsufficientScope => "INSUFFICIENT_SCOPE",
            AppError::InactiveUser => "INACTIVE_USER",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Jwt(_) => "AUTH_ERROR",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidEmailFormat | AppError::Validation(_) | AppError::InactiveUser => {
                StatusCode::BAD_REQUEST
            }
            AppError::UserAlreadyExists => StatusCode::CONFLICT,
            AppError::UserDoesNotExist => StatusCode::NOT_FOUND,
            AppError::InvalidCredentials
            | AppError::Unauthorized
            | AppError::InsufficientScope
            | AppError::Jwt(_) => StatusCode::UNAUTHORIZED,
            AppError::Database(_) | AppError::Configuration(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get user-facing message (hides internal details)
    fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),

            // Hide details for internal/security errors
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            AppError::Jwt(e) => {
                tracing::debug!("JWT error: {:?}", e);
                "Could not validate credentials".to_string()
            }
            AppError::Configuration(msg) | AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }

            _ => self.to_string(),
        }
    }

    /// Translate storage errors that carry lifecycle meaning.
    ///
    /// The email primary key is the authority on uniqueness, so a constraint
    /// violation on insert is reported as `UserAlreadyExists`.
    pub fn from_db(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => AppError::UserAlreadyExists,
            _ => match err {
                DbErr::RecordNotUpdated | DbErr::RecordNotFound(_) => AppError::UserDoesNotExist,
                other => AppError::Database(other),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code().to_string(),
                message: self.user_message(),
            },
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Extension trait for Option -> AppError conversion
pub trait OptionExt<T> {
    fn ok_or_not_found(self) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self) -> AppResult<T> {
        self.ok_or(AppError::UserDoesNotExist)
    }
}

/// Convenience constructors
impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        AppError::Configuration(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
