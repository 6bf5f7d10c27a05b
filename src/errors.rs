//! Centralized error handling.
//!
//! Provides a unified error type for the entire application,
//! with automatic HTTP response conversion. Every failure in the
//! auth subsystem is a per-request value; nothing here panics.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication & Authorization
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Account is not activated")]
    AccountInactive,

    #[error("Invalid or expired token")]
    InvalidOrExpiredToken,

    // Account lifecycle
    #[error("An account with this email already exists")]
    DuplicateEmail,

    #[error("Invalid activation code")]
    ActivationCodeNotFound,

    // Resource errors
    #[error("Resource not found")]
    NotFound,

    // Validation
    #[error("{0}")]
    Validation(String),

    // External service errors
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    // Internal
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
            AppError::Unauthenticated => "UNAUTHENTICATED",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::AccountInactive => "ACCOUNT_INACTIVE",
            AppError::InvalidOrExpiredToken => "INVALID_TOKEN",
            AppError::DuplicateEmail => "DUPLICATE_EMAIL",
            AppError::ActivationCodeNotFound => "ACTIVATION_CODE_NOT_FOUND",
            AppError::NotFound => "NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Database(_) => "DATABASE_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Get HTTP status code
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated
            | AppError::InvalidCredentials
            | AppError::InvalidOrExpiredToken => StatusCode::UNAUTHORIZED,
            AppError::AccountInactive => StatusCode::FORBIDDEN,
            AppError::NotFound | AppError::ActivationCodeNotFound => StatusCode::NOT_FOUND,
            AppError::DuplicateEmail => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get user-facing message (hides internal details)
    fn user_message(&self) -> String {
        match self {
            // Show full message for client errors
            AppError::Validation(msg) => msg.clone(),

            // Messages the frontend surfaces verbatim
            AppError::InvalidCredentials => "Invalid email or password.".to_string(),
            AppError::AccountInactive => {
                "Account is not activated. Please check your email for activation link."
                    .to_string()
            }
            AppError::ActivationCodeNotFound => "Invalid activation code.".to_string(),

            // Hide details for internal/security errors
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }

            // Use default message for others
            _ => self.to_string(),
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

        (status, Json(body)).into_response()
    }
}

/// Result type alias
pub type AppResult<T> = Result<T, AppError>;

/// Convenience constructors
impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_failures_map_to_401() {
        assert_eq!(AppError::Unauthenticated.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            AppError::InvalidCredentials.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::InvalidOrExpiredToken.status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn lifecycle_failures_map_to_distinct_statuses() {
        assert_eq!(AppError::AccountInactive.status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::DuplicateEmail.status(), StatusCode::CONFLICT);
        assert_eq!(
            AppError::ActivationCodeNotFound.status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(AppError::NotFound.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn codes_are_stable() {
        assert_eq!(AppError::DuplicateEmail.code(), "DUPLICATE_EMAIL");
        assert_eq!(AppError::InvalidOrExpiredToken.code(), "INVALID_TOKEN");
        assert_eq!(AppError::AccountInactive.code(), "ACCOUNT_INACTIVE");
    }

    #[test]
    fn inactive_message_tells_user_to_check_email() {
        let msg = AppError::AccountInactive.user_message();
        assert!(msg.contains("check your email"));
    }
}
