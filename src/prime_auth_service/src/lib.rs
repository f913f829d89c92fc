//! Runnable assembly of the identity and access-control core: wiring,
//! HTTP router, telemetry and database helpers.

pub mod auth_service;
pub mod helpers;
pub mod telemetry;

pub use auth_service::AuthService;
pub use helpers::{build_app_state, configure_postgresql, get_postgres_pool};
pub use telemetry::init_tracing;
