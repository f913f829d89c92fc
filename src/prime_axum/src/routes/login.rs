use axum::{Json, extract::State, extract::rejection::JsonRejection};
use prime_adapters::AuthApiError;
use prime_application::LoginUseCase;
use prime_core::{AuthError, Password};
use secrecy::Secret;
use serde::Deserialize;

use super::{AuthResponse, payload};
use crate::state::AppState;

/// `identifier` may be a username or an email; clients may send either key.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(alias = "username", alias = "email")]
    pub identifier: String,
    pub password: Secret<String>,
}

#[tracing::instrument(name = "Login", skip(state, body))]
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, AuthApiError> {
    let request = payload(body)?;
    // A password that could never have been stored cannot match.
    let password = Password::parse(request.password).map_err(|_| AuthError::InvalidCredentials)?;

    let session = LoginUseCase::new(&*state.directory, &*state.hasher, &*state.tokens)
        .execute(request.identifier.trim(), &password)
        .await?;

    Ok(Json(session.into()))
}
