use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use sea_orm::DbErr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RoleError {
    #[error("{0}")]
    Validation(String),

    #[error("Role '{0}' already exists")]
    DuplicateName(String),

    #[error("Role {0} not found")]
    NotFound(i32),

    /// Delete blocked by the employees foreign key
    #[error("Role {0} is still assigned to employees")]
    InUse(i32),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

pub type RoleResult<T> = Result<T, RoleError>;

impl From<RoleError> for AppError {
    fn from(err: RoleError) -> Self {
        match err {
            RoleError::Validation(msg) => AppError::validation(msg),
            RoleError::DuplicateName(name) => {
                AppError::Conflict(format!("Role '{}' already exists", name))
            }
            RoleError::NotFound(id) => AppError::NotFound(format!("Role {} not found", id)),
            RoleError::InUse(id) => AppError::Conflict(format!(
                "Role {} is assigned to one or more employees",
                id
            )),
            RoleError::Database(e) => AppError::Database(e),
        }
    }
}

impl IntoResponse for RoleError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
