//! # Error Handling for list endpoints
//!
//! Maps failures to HTTP responses without leaking storage details:
//! - Parameter validation failures become 422 with per-field messages
//! - Database errors become 500 with a generic message; the full error is
//!   logged server-side through `tracing`
//! - Any other user-facing message mentioning storage internals is replaced
//!   by [`sanitize_error_message`]
//!
//! ```rust,ignore
//! async fn handler() -> Result<Json<ApiResponse<Vec<Product>>>, ApiError> {
//!     let query = translator.translate(&params, &caller)?; // 422 on bad input
//!     let page = Product::fetch(&db, &query, "created_at").await?; // 500, logged
//!     Ok(Json(ApiResponse::list(page, &query)))
//! }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::validation::ValidationErrors;

/// Message shown to users in place of anything storage-related
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred while processing your request";

/// Substrings that mark a message as coming from the storage layer
const STORAGE_VOCABULARY: [&str; 18] = [
    "sqlstate",
    "sql",
    "syntax error",
    "table",
    "column",
    "constraint",
    "foreign key",
    "duplicate key",
    "unique",
    "violates",
    "relation",
    "database",
    "query",
    "pdo",
    "postgres",
    "mysql",
    "sqlite",
    "mariadb",
];

/// Replace a message that exposes storage internals with a generic one
#[must_use]
pub fn sanitize_error_message(message: &str) -> String {
    let lowered = message.to_lowercase();
    if STORAGE_VOCABULARY.iter().any(|word| lowered.contains(word)) {
        GENERIC_ERROR_MESSAGE.to_string()
    } else {
        message.to_string()
    }
}

/// API error type with automatic logging and sanitized responses
#[derive(Debug)]
pub enum ApiError {
    /// 422 Unprocessable Entity - malformed list parameters
    ValidationFailed {
        /// Per-parameter problems
        errors: ValidationErrors,
    },

    /// 500 Internal Server Error - Database error (details logged, not exposed)
    Database {
        /// User-facing generic message
        message: String,
        /// Internal error (logged, not sent to user)
        internal: DbErr,
    },

    /// 500 Internal Server Error - Generic internal error
    Internal {
        /// User-facing message, already sanitized
        message: String,
        /// Internal error details (logged, not sent to user)
        internal: Option<String>,
    },
}

impl ApiError {
    pub const fn validation_failed(errors: ValidationErrors) -> Self {
        Self::ValidationFailed { errors }
    }

    /// Create a 500 Internal Server Error from a database error
    ///
    /// The database error details are logged but NOT sent to the user.
    pub fn database(err: DbErr) -> Self {
        Self::Database {
            message: GENERIC_ERROR_MESSAGE.to_string(),
            internal: err,
        }
    }

    /// Create a 500 Internal Server Error; `message` is sanitized before use
    ///
    /// # Example
    /// ```rust,ignore
    /// return Err(ApiError::internal("Failed to load products", Some(err.to_string())));
    /// ```
    pub fn internal(message: impl AsRef<str>, internal: Option<String>) -> Self {
        Self::Internal {
            message: sanitize_error_message(message.as_ref()),
            internal,
        }
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::ValidationFailed { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Database { .. } | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the user-facing error message (sanitized)
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::ValidationFailed { .. } => "Validation failed".to_string(),
            Self::Database { message, .. } | Self::Internal { message, .. } => message.clone(),
        }
    }

    /// Log internal error details (not sent to user)
    fn log_internal(&self) {
        match self {
            Self::Database { internal, .. } => {
                tracing::error!(
                    error = ?internal,
                    "Database error occurred"
                );
            }
            Self::Internal { internal: Some(details), .. } => {
                tracing::error!(
                    details = %details,
                    "Internal error occurred"
                );
            }
            Self::Internal { internal: None, message } => {
                tracing::error!(message = %message, "Internal error occurred");
            }
            Self::ValidationFailed { errors } => {
                tracing::debug!(
                    errors = %errors,
                    status = %self.status_code(),
                    "Rejected list parameters"
                );
            }
        }
    }
}

/// Error response sent to users (sanitized)
#[derive(Debug, Serialize)]
struct ErrorResponse {
    success: bool,
    message: String,
    /// Messages keyed by parameter, for validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<BTreeMap<String, Vec<String>>>,
}

impl ErrorResponse {
    fn from_error(error: &ApiError) -> Self {
        Self {
            success: false,
            message: error.user_message(),
            errors: match error {
                ApiError::ValidationFailed { errors } => Some(errors.by_field()),
                _ => None,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Log internal error details (not sent to user)
        self.log_internal();

        let status = self.status_code();
        (status, Json(ErrorResponse::from_error(&self))).into_response()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

impl std::error::Error for ApiError {}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        Self::database(err)
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        Self::validation_failed(errors)
    }
}
