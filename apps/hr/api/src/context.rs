//! Dependency graph of the running service.

use axum::Router;
use axum_helpers::TokenService;
use database::DatabaseConnection;
use domain_employees::{Argon2Hasher, EmployeeService, PgEmployeeRepository};
use domain_roles::{PgRoleRepository, RoleService};
use std::sync::Arc;

use crate::config::Config;

pub type Roles = RoleService<PgRoleRepository>;
pub type Employees = EmployeeService<PgEmployeeRepository, PgRoleRepository, Argon2Hasher>;

/// Repositories, services and the token service, wired once at startup.
///
/// Cloning is cheap: services share their repositories through `Arc`
/// and the connection is a pool handle.
#[derive(Clone)]
pub struct AppContext {
    pub config: Config,
    pub db: DatabaseConnection,
    pub tokens: TokenService,
    pub roles: Roles,
    pub employees: Arc<Employees>,
}

impl AppContext {
    pub fn build(config: Config, db: DatabaseConnection) -> Self {
        let tokens = TokenService::new(&config.jwt);

        let role_repository = PgRoleRepository::new(db.clone());
        let roles = RoleService::new(role_repository.clone());

        let employees = Arc::new(EmployeeService::new(
            PgEmployeeRepository::new(db.clone()),
            RoleService::new(role_repository),
            Argon2Hasher,
            tokens.clone(),
        ));

        Self {
            config,
            db,
            tokens,
            roles,
            employees,
        }
    }

    /// API routes without the `/api` prefix.
    pub fn routes(&self) -> Router {
        crate::api::routes(
            self.roles.clone(),
            self.employees.clone(),
            self.tokens.clone(),
        )
    }

    /// `/ready` bound to this context's pool.
    pub fn ready_router(&self) -> Router {
        crate::api::ready_router(self.db.clone())
    }
}
