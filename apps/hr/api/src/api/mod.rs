use axum::{Router, middleware, routing::get};
use axum_helpers::{TokenService, sliding_session_middleware};
use database::DatabaseConnection;
use domain_employees::{CredentialHasher, EmployeeRepository, EmployeeService};
use domain_roles::{RoleRepository, RoleService};
use std::sync::Arc;

pub mod health;

/// Creates the API routes without the `/api` prefix.
/// The `/api` prefix is added by the `create_router` helper.
///
/// `/auth/login` is public; everything else runs behind the sliding session.
pub fn routes<E, R, H>(
    roles: RoleService<R>,
    employees: Arc<EmployeeService<E, R, H>>,
    tokens: TokenService,
) -> Router
where
    E: EmployeeRepository + 'static,
    R: RoleRepository + 'static,
    H: CredentialHasher + 'static,
{
    let protected = Router::new()
        .nest("/roles", domain_roles::handlers::router(roles))
        .nest(
            "/employees",
            domain_employees::handlers::router(employees.clone()),
        )
        .layer(middleware::from_fn_with_state(
            tokens,
            sliding_session_middleware,
        ));

    Router::new()
        .nest("/auth", domain_employees::handlers::auth_router(employees))
        .merge(protected)
}

/// `/ready`, probing the database pool.
pub fn ready_router(db: DatabaseConnection) -> Router {
    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(db)
}
