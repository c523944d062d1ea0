//! Roles Domain
//!
//! Job roles that employees are assigned to.
//!
//! ```text
//! handlers  →  RoleService  →  RoleRepository (InMemory | Pg)
//! ```
//!
//! Names are trimmed and unique; role ids are store-assigned positive integers.
//!
//! ```rust,no_run
//! use domain_roles::{handlers, InMemoryRoleRepository, RoleService};
//!
//! let service = RoleService::new(InMemoryRoleRepository::new());
//! let router = handlers::router(service);
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{RoleError, RoleResult};
pub use models::{CreateRole, Role, RoleId, RoleName, UpdateRole};
pub use postgres::PgRoleRepository;
pub use repository::{InMemoryRoleRepository, RoleRepository};
pub use service::RoleService;
