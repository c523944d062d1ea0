//! Token-based authentication.
//!
//! - [`TokenService`] signs and verifies HS256 tokens.
//! - [`sliding_session_middleware`] gates protected routes and hands a renewed
//!   token back on every accepted request.
//! - [`CurrentUser`] exposes the accepted claims to handlers.

pub mod config;
pub mod jwt;
pub mod middleware;

pub use config::JwtConfig;
pub use jwt::{JwtClaims, RejectReason, SessionDecision, TokenError, TokenService, TokenSubject};
pub use middleware::{CurrentUser, sliding_session_middleware};
