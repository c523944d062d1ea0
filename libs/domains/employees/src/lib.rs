//! Employees Domain
//!
//! Employee records, credential hashing and login.
//!
//! ```text
//! handlers  →  EmployeeService  →  EmployeeRepository (InMemory | Pg)
//!                   │
//!                   ├── RoleService        (role must exist)
//!                   ├── CredentialHasher   (argon2id)
//!                   └── TokenService       (session token on login)
//! ```
//!
//! Emails are normalized to lowercase and unique. Reads join the role name
//! and never expose the stored hash.

pub mod entity;
pub mod error;
pub mod handlers;
pub mod hasher;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{EmployeeError, EmployeeResult};
pub use hasher::{Argon2Hasher, CredentialHasher};
pub use models::{
    CommuteAllowance, CreateEmployee, Email, EmployeeId, EmployeeName, EmployeeView, LoginRequest,
    LoginResponse, Password, UpdateEmployee,
};
pub use postgres::PgEmployeeRepository;
pub use repository::{EmployeeRepository, InMemoryEmployeeRepository};
pub use service::EmployeeService;
