use axum::response::{IntoResponse, Response};
use axum_helpers::{AppError, TokenError};
use domain_roles::RoleError;
use sea_orm::DbErr;
use thiserror::Error;

pub const ROLE_DOES_NOT_EXIST: &str = "role does not exist";
pub const EMAIL_ALREADY_REGISTERED: &str = "email already registered";

#[derive(Debug, Error)]
pub enum EmployeeError {
    #[error("{0}")]
    Validation(String),

    #[error("role does not exist")]
    RoleNotFound,

    #[error("email already registered: {0}")]
    DuplicateEmail(String),

    #[error("Employee {0} not found")]
    NotFound(i32),

    /// Unknown email or wrong password; deliberately indistinguishable
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Role(#[from] RoleError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

pub type EmployeeResult<T> = Result<T, EmployeeError>;

impl From<EmployeeError> for AppError {
    fn from(err: EmployeeError) -> Self {
        match err {
            EmployeeError::Validation(msg) => AppError::validation(msg),
            EmployeeError::RoleNotFound => AppError::BadRequest(ROLE_DOES_NOT_EXIST.to_string()),
            EmployeeError::DuplicateEmail(_) => {
                AppError::Conflict(EMAIL_ALREADY_REGISTERED.to_string())
            }
            EmployeeError::NotFound(id) => {
                AppError::NotFound(format!("Employee {} not found", id))
            }
            EmployeeError::InvalidCredentials => {
                AppError::Unauthorized("Invalid email or password".to_string())
            }
            EmployeeError::Role(e) => e.into(),
            EmployeeError::Token(e) => AppError::InternalServerError(e.to_string()),
            EmployeeError::PasswordHash(msg) | EmployeeError::Internal(msg) => {
                AppError::InternalServerError(msg)
            }
            EmployeeError::Database(e) => AppError::Database(e),
        }
    }
}

impl IntoResponse for EmployeeError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn maps_to_status_codes() {
        let cases = [
            (EmployeeError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (EmployeeError::RoleNotFound, StatusCode::BAD_REQUEST),
            (
                EmployeeError::DuplicateEmail("a@b.co".into()),
                StatusCode::CONFLICT,
            ),
            (EmployeeError::NotFound(4), StatusCode::NOT_FOUND),
            (EmployeeError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (
                EmployeeError::Role(RoleError::Validation("bad id".into())),
                StatusCode::BAD_REQUEST,
            ),
            (
                EmployeeError::PasswordHash("salt".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
