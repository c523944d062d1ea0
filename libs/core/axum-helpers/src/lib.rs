//! # Axum Helpers
//!
//! Shared HTTP plumbing for the HR API.
//!
//! - **[`auth`]**: token service and sliding-session middleware
//! - **[`errors`]**: [`AppError`] and the `{success: false, ...}` error envelope
//! - **[`response`]**: the `{success: true, ...}` success envelope
//! - **[`extractors`]**: [`ValidatedJson`] and [`IdPath`]
//! - **[`server`]**: router assembly, health endpoints, graceful shutdown
//! - **[`http`]**: CORS and security headers
//! - **[`audit`]**: audit events on the `audit` tracing target
//!
//! ```ignore
//! let api = Router::new().nest("/roles", roles).nest("/employees", employees);
//! let router = create_router::<ApiDoc>(api)?.merge(health_router(app_info!()));
//! create_production_app(router, &config.server, Duration::from_secs(30), cleanup).await?;
//! ```

pub mod audit;
pub mod auth;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod response;
pub mod server;

pub use auth::{
    CurrentUser, JwtClaims, JwtConfig, RejectReason, SessionDecision, TokenError, TokenService,
    TokenSubject, sliding_session_middleware,
};

pub use server::{
    CleanupCoordinator, HealthCheckFuture, HealthResponse, ShutdownCoordinator, close_postgres,
    create_production_app, create_router, health_router, run_health_checks,
    shutdown_signal,
};

pub use http::{create_cors_layer, security_headers};

pub use errors::{AppError, ErrorBody, ErrorCode, ErrorResponse};

pub use response::{ApiMessage, ApiResponse};

pub use extractors::{IdPath, ValidatedJson};

pub use audit::{AuditEvent, AuditOutcome, extract_ip_from_headers, extract_user_agent};
