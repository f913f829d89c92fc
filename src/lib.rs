//! # Prime Auth - Identity and Access Control for the Listings Marketplace
//!
//! Facade crate re-exporting the public APIs of the auth components, so a
//! host application can depend on one crate.
//!
//! ## Usage
//!
//! ```toml
//! [dependencies]
//! prime_auth = { path = "../prime_auth" }
//! ```
//!
//! ## Structure
//!
//! - **Core domain types**: `Identity`, `Principal`, `Role`, `Email`, `Password`, ...
//! - **Ports**: `UserDirectory`, `PasswordHasher`, `TokenService`, `AssertionVerifier`
//! - **Use cases**: `CredentialAuthenticator`, `OAuthIdentityResolver`, `RegisterUseCase`, ...
//! - **Adapters**: `PostgresUserDirectory`, `Argon2PasswordHasher`, `JwtTokenService`, ...
//! - **Service**: `AuthService`, the router with every `/auth` route behind the gate

// ============================================================================
// Core Domain Types
// ============================================================================

/// Core domain types and value objects
pub mod core {
    pub use prime_core::*;
}

pub use prime_core::{
    AccessLevel, AuthError, AuthRequest, Email, ExternalId, Identity, IdentityId, Password,
    Principal, Provider, Role, RoutePattern, RoutePolicy, RouteRule, Username,
};

// ============================================================================
// Ports
// ============================================================================

/// Trait seams implemented by the adapters
pub mod ports {
    pub use prime_core::{
        AssertionError, AssertionVerifier, Clock, PasswordHashError, PasswordHasher,
        TokenService, UserDirectory, UserDirectoryError,
    };
}

pub use ports::{AssertionVerifier, PasswordHasher, TokenService, UserDirectory};

// ============================================================================
// Use Cases (Application Layer)
// ============================================================================

pub mod use_cases {
    pub use prime_application::*;
}

pub use prime_application::{
    AccessControlGate, AuthSession, CredentialAuthenticator, GoogleSignInUseCase, LoginUseCase,
    OAuthIdentityResolver, RegisterUseCase, Registration,
};

// ============================================================================
// Adapters (Infrastructure)
// ============================================================================

pub mod adapters {
    pub mod http {
        pub use prime_adapters::http::*;
    }

    pub mod persistence {
        pub use prime_adapters::persistence::*;
    }

    pub mod oauth {
        pub use prime_adapters::oauth::*;
    }

    pub mod config {
        pub use prime_adapters::config::*;
    }
}

pub use prime_adapters::{
    Argon2PasswordHasher, GoogleIdTokenVerifier, HashMapUserDirectory, JwtTokenService,
    PostgresUserDirectory, SystemClock, UnverifiedClaimsDecoder,
};

// ============================================================================
// Axum Integration
// ============================================================================

pub use prime_axum::{AppState, AuthenticatedPrincipal, AxumRequest};

// ============================================================================
// Auth Service (Main Entry Point)
// ============================================================================

pub use prime_auth_service::{AuthService, build_app_state, configure_postgresql};

// ============================================================================
// Re-export common external dependencies
// ============================================================================

/// Re-export async-trait for implementing the port traits
pub use async_trait::async_trait;

/// Re-export secrecy for working with secrets
pub use secrecy::{ExposeSecret, Secret};

pub use http;
