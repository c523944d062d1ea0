use axum::{http::StatusCode, response::Response};

use super::{ErrorCode, error_response};

/// Router fallback rendering the standard error envelope.
pub async fn not_found() -> Response {
    let code = ErrorCode::RouteNotFound;
    error_response(StatusCode::NOT_FOUND, code, code.default_message(), None)
}
