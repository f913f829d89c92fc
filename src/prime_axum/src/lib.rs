//! Axum integration for the identity and access-control core.
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │  prime_core: AuthRequest, RoutePolicy    │
//! └──────────────┬───────────────────────────┘
//!                │
//!                ▼
//! ┌──────────────────────────────────────────┐
//! │  prime_axum: Axum implementations        │
//! │  - AxumRequest newtype wrapper           │
//! │  - access_control middleware             │
//! │  - AuthenticatedPrincipal extractor      │
//! │  - /auth route handlers                  │
//! └──────────────────────────────────────────┘
//! ```

pub mod adapters;
pub mod middleware;
pub mod routes;
pub mod state;

pub use adapters::AxumRequest;
pub use middleware::{AuthenticatedPrincipal, access_control};
pub use state::AppState;
