//! Axum handlers for the `/auth` surface.

pub mod health;
pub mod login;
pub mod me;
pub mod oauth_google;
pub mod register;

use axum::{Json, extract::rejection::JsonRejection};
use prime_adapters::AuthApiError;
use prime_application::AuthSession;
use prime_core::{AuthError, Principal};
use serde::Serialize;

pub use health::health;
pub use login::login;
pub use me::me;
pub use oauth_google::oauth_google;
pub use register::register;

/// Body returned by every entry point that signs a caller in.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub principal: Principal,
}

impl From<AuthSession> for AuthResponse {
    fn from(session: AuthSession) -> Self {
        let expires_in = session.token.expires_in_seconds();
        Self {
            token: session.token.token.into_inner(),
            token_type: "Bearer",
            expires_in,
            principal: session.principal,
        }
    }
}

/// Unwraps a JSON body, turning axum's rejection into our 400 envelope.
pub(crate) fn payload<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, AuthApiError> {
    body.map(|Json(inner)| inner)
        .map_err(|rejection| AuthError::Validation(rejection.body_text()).into())
}
