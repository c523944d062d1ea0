use super::jwt::{JwtClaims, SessionDecision, TokenService};
use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderValue, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Sliding-session gate for protected routes.
///
/// Delegates the decision to [`TokenService::renew`]. On `Proceed` the claims
/// are placed in request extensions and the replacement token is returned in
/// the response `Authorization` header. On `Reject` the handler never runs.
///
/// ```ignore
/// let protected = Router::new()
///     .route("/roles", get(list_roles))
///     .layer(axum::middleware::from_fn_with_state(tokens, sliding_session_middleware));
/// ```
pub async fn sliding_session_middleware(
    State(tokens): State<TokenService>,
    mut request: Request,
    next: Next,
) -> Response {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    match tokens.renew(header) {
        SessionDecision::Proceed { claims, token } => {
            request.extensions_mut().insert(claims);
            let mut response = next.run(request).await;
            match HeaderValue::from_str(&format!("Bearer {token}")) {
                Ok(value) => {
                    response.headers_mut().insert(AUTHORIZATION, value);
                }
                Err(e) => tracing::error!(error = %e, "renewed token is not a valid header value"),
            }
            response
        }
        SessionDecision::Reject(reason) => {
            tracing::debug!(?reason, path = %request.uri().path(), "rejected request token");
            AppError::Unauthorized(reason.message().to_string()).into_response()
        }
    }
}

/// Claims of the caller, as accepted by [`sliding_session_middleware`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub JwtClaims);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<JwtClaims>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}
