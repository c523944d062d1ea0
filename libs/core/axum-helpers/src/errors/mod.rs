pub mod codes;
pub mod handlers;
pub mod responses;

pub use codes::ErrorCode;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{ConnAcquireErr, DbErr, SqlErr};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

/// Error envelope returned for every failed request.
///
/// ```json
/// {
///   "success": false,
///   "message": "Email already registered",
///   "error": { "code": 1008, "type": "CONFLICT" }
/// }
/// ```
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Always `false`
    pub success: bool,
    /// Human-readable message
    pub message: String,
    pub error: ErrorBody,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Integer error code for logging and monitoring
    pub code: i32,
    /// Machine-readable identifier, e.g. `VALIDATION_ERROR`
    #[serde(rename = "type")]
    pub kind: ErrorCode,
    /// Structured detail such as per-field validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>, details: Option<Value>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: ErrorBody {
                code: code.code(),
                kind: code,
                details,
            },
        }
    }
}

/// Top-level error responder.
///
/// Domain crates convert their own error enums into this type; it is the only
/// place where an error becomes an HTTP status and a JSON body.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        details: Option<Value>,
    },

    #[error("Validation error: {0}")]
    ValidationErrors(#[from] ValidationErrors),

    #[error("JSON extraction error: {0}")]
    JsonExtractorRejection(#[from] JsonRejection),

    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Internal Server Error: {0}")]
    InternalServerError(String),

    #[error("Service Unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            details: None,
        }
    }

    /// Error code this error is reported with.
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Validation { .. } | AppError::ValidationErrors(_) => {
                ErrorCode::ValidationError
            }
            AppError::JsonExtractorRejection(_) => ErrorCode::InvalidJson,
            AppError::InvalidId(_) => ErrorCode::InvalidId,
            AppError::BadRequest(_) => ErrorCode::BadRequest,
            AppError::Unauthorized(_) => ErrorCode::Unauthorized,
            AppError::NotFound(_) => ErrorCode::NotFound,
            AppError::Conflict(_) => ErrorCode::Conflict,
            AppError::Database(e) => db_error_code(e),
            AppError::InternalServerError(_) => ErrorCode::InternalError,
            AppError::ServiceUnavailable(_) => ErrorCode::ServiceUnavailable,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();

        let (message, details) = match self {
            AppError::Validation { message, details } => {
                tracing::info!(error_code = code.code(), "Validation error: {}", message);
                (message, details)
            }
            AppError::ValidationErrors(e) => {
                tracing::info!(error_code = code.code(), "Validation error: {:?}", e);
                (
                    code.default_message().to_string(),
                    Some(validation_details(&e)),
                )
            }
            AppError::JsonExtractorRejection(e) => {
                tracing::warn!(error_code = code.code(), "JSON extraction error: {:?}", e);
                (e.body_text(), None)
            }
            AppError::InvalidId(raw) => {
                tracing::info!(error_code = code.code(), "Invalid id: {}", raw);
                (
                    code.default_message().to_string(),
                    Some(serde_json::json!({ "id": raw })),
                )
            }
            AppError::BadRequest(msg)
            | AppError::Unauthorized(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg) => {
                tracing::info!(error_code = code.code(), error_type = %code, "{}", msg);
                (msg, None)
            }
            AppError::Database(e) => {
                match code {
                    ErrorCode::Conflict => {
                        tracing::warn!(error_code = code.code(), "Constraint violation: {}", e)
                    }
                    _ => tracing::error!(error_code = code.code(), "Database error: {:?}", e),
                }
                (code.default_message().to_string(), None)
            }
            AppError::InternalServerError(msg) => {
                tracing::error!(error_code = code.code(), "Internal server error: {}", msg);
                (code.default_message().to_string(), None)
            }
            AppError::ServiceUnavailable(msg) => {
                tracing::warn!(error_code = code.code(), "Service unavailable: {}", msg);
                (code.default_message().to_string(), None)
            }
        };

        error_response(code.status(), code, message, details)
    }
}

/// Classifies a store error.
///
/// Constraint violations that slipped past a service-level pre-check become
/// conflicts, pool exhaustion becomes 503, anything else is internal.
fn db_error_code(error: &DbErr) -> ErrorCode {
    match error.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_))
        | Some(SqlErr::ForeignKeyConstraintViolation(_)) => return ErrorCode::Conflict,
        _ => {}
    }

    match error {
        DbErr::ConnectionAcquire(ConnAcquireErr::Timeout) => ErrorCode::ServiceUnavailable,
        DbErr::RecordNotFound(_) => ErrorCode::NotFound,
        _ => ErrorCode::InternalError,
    }
}

/// Flattens `validator` errors into `{ field: [{ code, message, params }] }`.
pub fn validation_details(errors: &ValidationErrors) -> Value {
    let details = errors
        .field_errors()
        .iter()
        .map(|(field, errors)| {
            let messages: Vec<Value> = errors
                .iter()
                .map(|err| {
                    serde_json::json!({
                        "code": err.code,
                        "message": err.message,
                        "params": err.params,
                    })
                })
                .collect();
            (field.to_string(), Value::Array(messages))
        })
        .collect::<serde_json::Map<_, _>>();

    Value::Object(details)
}

pub fn error_response(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
    details: Option<Value>,
) -> Response {
    (status, Json(ErrorResponse::new(code, message, details))).into_response()
}
