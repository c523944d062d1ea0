//! HR API service: configuration, wiring and route composition.
//!
//! The binary in `main.rs` connects to PostgreSQL, runs migrations, seeds the
//! optional administrator and serves [`context::AppContext::routes`] under `/api`.

pub mod api;
pub mod config;
pub mod context;
pub mod openapi;
pub mod seed;
