use axum::{Json, extract::State, extract::rejection::JsonRejection, http::StatusCode};
use prime_adapters::AuthApiError;
use prime_application::{RegisterUseCase, Registration};
use prime_core::{AuthError, Email, Password, Role, Username};
use secrecy::Secret;
use serde::Deserialize;

use super::{AuthResponse, payload};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: String,
    pub password: Secret<String>,
    pub role: Option<String>,
    pub name: Option<String>,
}

impl TryFrom<RegisterRequest> for Registration {
    type Error = AuthError;

    fn try_from(request: RegisterRequest) -> Result<Self, Self::Error> {
        let email = Email::parse(&request.email)?;
        let username = request.username.map(Username::parse).transpose()?;
        let password = Password::parse(request.password)?;
        let role = request
            .role
            .map(|raw| raw.trim().to_ascii_uppercase().parse::<Role>())
            .transpose()?;
        let name = request
            .name
            .map(|name| name.trim().to_owned())
            .filter(|name| !name.is_empty());

        Ok(Registration {
            username,
            email,
            password,
            role,
            name,
        })
    }
}

#[tracing::instrument(name = "Register", skip(state, body))]
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), AuthApiError> {
    let registration = Registration::try_from(payload(body)?)?;

    let session = RegisterUseCase::new(&*state.directory, &*state.hasher, &*state.tokens)
        .execute(registration)
        .await?;

    Ok((StatusCode::CREATED, Json(session.into())))
}
