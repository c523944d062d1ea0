//! PostgreSQL access for the HR API.
//!
//! - [`postgres::PostgresConfig`]: bounded pool settings loaded with `core_config::FromEnv`
//! - [`postgres::connect_from_config_with_retry`]: startup connection with backoff
//! - [`postgres::run_migrations`]: applies any `MigratorTrait` implementation
//! - [`postgres::check_health`]: `SELECT 1` readiness probe
//!
//! ```ignore
//! let config = PostgresConfig::from_env()?;
//! let db = postgres::connect_from_config_with_retry(config, None).await?;
//! postgres::run_migrations::<migration::Migrator>(&db, "hr_api").await?;
//! ```

pub mod common;
pub mod postgres;

pub use common::{DatabaseError, DatabaseResult, RetryConfig};
pub use postgres::{DatabaseConnection, PostgresConfig};
